// Host-side tests for zoom-to-fit geometry.

use clickzoom_core::{
    compute_fit_pose, fit_direction, fit_distance, fit_pose_for_bounds, Aabb, Material, Mesh,
    NodePath, Scene, SceneNode, Transform,
};
use glam::Vec3;

#[test]
fn distance_matches_half_diagonal_over_tan_half_fov() {
    for (d, fov) in [(1.0_f32, 75.0_f32), (3.4641, 60.0), (10.0, 30.0)] {
        let expected = (d / 2.0) / (fov.to_radians() / 2.0).tan();
        assert!((fit_distance(d, fov) - expected).abs() < 1e-5);
    }
}

#[test]
fn direction_at_zero_and_ninety_degrees() {
    assert!(fit_direction(0.0).abs_diff_eq(Vec3::Y, 1e-6));
    assert!(fit_direction(90.0).abs_diff_eq(Vec3::Z, 1e-6));
    let d = fit_direction(70.0);
    let a = 70f32.to_radians();
    assert!(d.abs_diff_eq(Vec3::new(0.0, a.cos(), a.sin()), 1e-6));
}

#[test]
fn unit_cube_at_origin_end_to_end() {
    let mut scene = Scene::new();
    let path = scene.add(SceneNode::mesh(
        "model",
        Mesh::cuboid(Vec3::splat(2.0), Material::default()),
    ));
    let index = scene.index();
    let pose = compute_fit_pose(&scene, &index, &path, 75.0, 70.0).unwrap();

    assert!(pose.target.abs_diff_eq(Vec3::ZERO, 1e-6));
    let distance = pose.position.distance(pose.target);
    let expected = (12f32.sqrt() / 2.0) / 37.5f32.to_radians().tan();
    assert!((distance - expected).abs() < 1e-4, "{distance}");
    assert!((distance - 2.254).abs() < 0.01);
    let dir = (pose.position - pose.target).normalize();
    assert!(dir.abs_diff_eq(fit_direction(70.0), 1e-5));
}

#[test]
fn fit_uses_world_space_bounds() {
    let mut scene = Scene::new();
    let path = scene.add(
        SceneNode::group("model")
            .with_transform(Transform {
                translation: Vec3::new(1.5, 0.5, 0.0),
                scale: Vec3::splat(0.5),
                ..Transform::IDENTITY
            })
            .with_child(SceneNode::mesh(
                "body",
                Mesh::cuboid(Vec3::splat(2.0), Material::default()),
            )),
    );
    let index = scene.index();
    let pose = compute_fit_pose(&scene, &index, &path, 75.0, 45.0).unwrap();
    assert!(pose.target.abs_diff_eq(Vec3::new(1.5, 0.5, 0.0), 1e-5));
    let expected = fit_distance(3f32.sqrt(), 75.0);
    assert!((pose.position.distance(pose.target) - expected).abs() < 1e-4);
}

#[test]
fn fit_is_idempotent() {
    let mut scene = Scene::new();
    let path = scene.add(SceneNode::mesh(
        "model",
        Mesh::cuboid(Vec3::new(1.0, 2.0, 3.0), Material::default()),
    ));
    let index = scene.index();
    let a = compute_fit_pose(&scene, &index, &path, 75.0, 70.0).unwrap();
    let b = compute_fit_pose(&scene, &index, &path, 75.0, 70.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn empty_subtree_fits_at_its_center_with_zero_distance() {
    let pose = fit_pose_for_bounds(&Aabb::EMPTY, 75.0, 70.0);
    assert_eq!(pose.target, Vec3::ZERO);
    assert_eq!(pose.position, Vec3::ZERO);

    let mut scene = Scene::new();
    let path = scene.add(SceneNode::group("model"));
    let index = scene.index();
    let pose = compute_fit_pose(&scene, &index, &path, 75.0, 70.0).unwrap();
    assert!(pose.position.is_finite());
}

#[test]
fn unknown_path_is_an_error() {
    let scene = Scene::new();
    let index = scene.index();
    assert!(compute_fit_pose(&scene, &index, &NodePath::from_indices(&[3]), 75.0, 70.0).is_err());
}
