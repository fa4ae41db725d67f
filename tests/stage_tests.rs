// Host-side tests for stage construction and model placement.

use clickzoom_core::{
    build_lights, build_stage, cylinder_mesh, model_row_x, place_model, populate_scene,
    rgb_from_hex, world_bounds, Light, Material, Mesh, ModelItem, NodeKind, Scene, SceneNode,
    Transform, MODEL_ITEMS, MODEL_NAME, STAGE_NAME,
};
use glam::Vec3;

#[test]
fn cylinder_bounds_and_triangle_count() {
    let mesh = cylinder_mesh(3.5, 0.1, 64, Material::default());
    let b = mesh.local_bounds();
    assert!(b.min.abs_diff_eq(Vec3::new(-3.5, -0.05, -3.5), 1e-4), "{:?}", b);
    assert!(b.max.abs_diff_eq(Vec3::new(3.5, 0.05, 3.5), 1e-4), "{:?}", b);
    // side quads plus two fans
    assert_eq!(mesh.triangle_count(), 64 * 2 + 64 * 2);
    assert_eq!(mesh.normals.len(), mesh.positions.len());
}

#[test]
fn stage_top_sits_at_floor_level() {
    let mut scene = Scene::new();
    let path = scene.add(build_stage());
    let node = scene.node(&path).unwrap();
    assert_eq!(node.name, STAGE_NAME);
    assert!(node.receive_shadow);
    let material = node.mesh.as_ref().unwrap().material;
    assert_eq!(material.color, rgb_from_hex(0x454545));
    assert_eq!((material.metalness, material.roughness), (0.5, 0.5));

    let b = world_bounds(&scene, &scene.index(), &path).unwrap();
    assert!(b.max.y.abs() < 1e-5);
    assert!((b.min.y + 0.1).abs() < 1e-5);
}

#[test]
fn lights_match_the_rig() {
    let lights = build_lights();
    assert_eq!(lights.len(), 3);
    assert_eq!(lights[0].kind, NodeKind::HemisphereLight);
    match lights[0].light {
        Some(Light::Hemisphere { intensity, .. }) => assert_eq!(intensity, 0.4),
        other => panic!("unexpected {other:?}"),
    }
    for l in &lights[1..] {
        assert_eq!(l.kind, NodeKind::DirectionalLight);
        assert_eq!(l.transform.translation.y, 4.0);
    }
    assert_eq!(lights[1].transform.translation.x, -1.5);
    assert_eq!(lights[2].transform.translation.x, 1.5);
    assert!(!lights[1].cast_shadow);
    assert!(lights[2].cast_shadow);
}

#[test]
fn populated_scene_has_lights_then_stage() {
    let mut scene = Scene::new();
    populate_scene(&mut scene);
    assert_eq!(scene.root().children.len(), 4);
    let index = scene.index();
    let stage = index.find_first(STAGE_NAME).unwrap();
    assert_eq!(stage.path.indices(), &[3]);
    assert!(index.find_first(MODEL_NAME).is_none());
}

#[test]
fn row_positions_spread_models() {
    assert_eq!(model_row_x(0, 1), 0.0);
    assert_eq!(model_row_x(0, 2), -1.5);
    assert_eq!(model_row_x(1, 2), 1.5);
    assert_eq!(model_row_x(1, 3), 0.0);
    assert_eq!(model_row_x(0, 0), 0.0);
}

/// A car-like asset: a body floating above the origin and a wheel part.
fn raw_asset() -> SceneNode {
    SceneNode::group("Sketchfab_model")
        .with_child(
            SceneNode::mesh(
                "body",
                Mesh::cuboid(Vec3::new(2.0, 4.0, 2.0), Material::default()),
            )
            .with_transform(Transform::from_translation(Vec3::new(0.0, 3.0, 0.0))),
        )
        .with_child(
            SceneNode::group("front_left_wheel").with_child(
                SceneNode::mesh("tire", Mesh::cuboid(Vec3::splat(10.0), Material::default()))
                    .with_transform(Transform::from_translation(Vec3::new(0.0, -20.0, 0.0))),
            ),
        )
}

const CAR: ModelItem = ModelItem {
    url: "car/scene.gltf",
    removed: "front_left_wheel",
};

#[test]
fn placed_model_is_unit_height_on_the_floor() {
    let node = place_model(raw_asset(), &CAR, 1, 2);
    assert_eq!(node.name, MODEL_NAME);
    assert_eq!(node.children.len(), 1, "wheel removed");
    assert!((node.transform.scale - Vec3::splat(0.25)).length() < 1e-6);
    assert!(node
        .transform
        .translation
        .abs_diff_eq(Vec3::new(1.5, -0.25, 0.0), 1e-6));

    let mut all_flagged = true;
    node.traverse(&mut |n| all_flagged &= n.cast_shadow && n.receive_shadow);
    assert!(all_flagged);

    let mut scene = Scene::new();
    let path = scene.add(node);
    let b = world_bounds(&scene, &scene.index(), &path).unwrap();
    assert!(b.min.y.abs() < 1e-5);
    assert!((b.size().y - 1.0).abs() < 1e-5);
}

#[test]
fn missing_part_still_places_model() {
    let item = ModelItem {
        url: "car/scene.gltf",
        removed: "no_such_part",
    };
    let node = place_model(raw_asset(), &item, 0, 1);
    assert_eq!(node.children.len(), 2);
    assert_eq!(node.name, MODEL_NAME);
    assert_eq!(node.transform.translation.x, 0.0);
}

#[test]
fn configured_models_name_a_part_to_hide() {
    assert_eq!(MODEL_ITEMS.len(), 2);
    for item in MODEL_ITEMS {
        assert!(!item.url.is_empty());
        assert!(!item.removed.is_empty());
    }
}
