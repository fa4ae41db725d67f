// Host-side tests for the scene tree, its index and the debug dump.

use clickzoom_core::{
    world_bounds, Material, Mesh, NodePath, Scene, SceneError, SceneNode, Transform,
};
use glam::Vec3;

fn cube(name: &str, size: f32) -> SceneNode {
    SceneNode::mesh(name, Mesh::cuboid(Vec3::splat(size), Material::default()))
}

/// root
/// ├─a
/// │ ├─a0
/// │ └─shared
/// └─b
///   └─shared
fn sample_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add(
        SceneNode::group("a")
            .with_child(cube("a0", 1.0))
            .with_child(SceneNode::group("shared")),
    );
    scene.add(
        SceneNode::group("b")
            .with_transform(Transform::from_translation(Vec3::new(10.0, 0.0, 0.0)))
            .with_child(cube("shared", 2.0)),
    );
    scene
}

#[test]
fn index_is_pre_order() {
    let scene = sample_scene();
    let index = scene.index();
    let paths: Vec<Vec<usize>> = index
        .entries()
        .iter()
        .map(|e| e.path.indices().to_vec())
        .collect();
    assert_eq!(
        paths,
        vec![
            vec![],
            vec![0],
            vec![0, 0],
            vec![0, 1],
            vec![1],
            vec![1, 0]
        ]
    );
    assert_eq!(index.len(), 6);
}

#[test]
fn find_all_returns_matches_in_traversal_order() {
    let scene = sample_scene();
    let index = scene.index();
    let found: Vec<&[usize]> = index.find_all("shared").map(|e| e.path.indices()).collect();
    assert_eq!(found, vec![&[0, 1][..], &[1, 0][..]]);
    assert_eq!(
        index.find_first("shared").map(|e| e.path.clone()),
        Some(NodePath::from_indices(&[0, 1]))
    );
    assert!(index.find_first("nope").is_none());
}

#[test]
fn world_matrices_accumulate_parent_transforms() {
    let scene = sample_scene();
    let index = scene.index();
    let e = index.get(&NodePath::from_indices(&[1, 0])).unwrap();
    assert!(e
        .world
        .transform_point3(Vec3::ZERO)
        .abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-6));
}

#[test]
fn subtree_is_contiguous_and_bounded() {
    let scene = sample_scene();
    let index = scene.index();
    let sub: Vec<Vec<usize>> = index
        .subtree(&NodePath::from_indices(&[0]))
        .iter()
        .map(|e| e.path.indices().to_vec())
        .collect();
    assert_eq!(sub, vec![vec![0], vec![0, 0], vec![0, 1]]);
    assert!(index.subtree(&NodePath::from_indices(&[7])).is_empty());
}

#[test]
fn world_bounds_union_meshes_under_a_node() {
    let scene = sample_scene();
    let index = scene.index();
    let b = world_bounds(&scene, &index, &NodePath::from_indices(&[1])).unwrap();
    assert!(b.min.abs_diff_eq(Vec3::new(9.0, -1.0, -1.0), 1e-5));
    assert!(b.max.abs_diff_eq(Vec3::new(11.0, 1.0, 1.0), 1e-5));

    let all = world_bounds(&scene, &index, &NodePath::root()).unwrap();
    assert!(all.min.abs_diff_eq(Vec3::new(-0.5, -1.0, -1.0), 1e-5));
    assert!(all.max.abs_diff_eq(Vec3::new(11.0, 1.0, 1.0), 1e-5));
}

#[test]
fn invalid_paths_are_errors() {
    let scene = sample_scene();
    let index = scene.index();
    let bad = NodePath::from_indices(&[0, 9]);
    assert_eq!(
        scene.node(&bad).err(),
        Some(SceneError::InvalidPath(vec![0, 9]))
    );
    assert!(matches!(
        world_bounds(&scene, &index, &bad),
        Err(SceneError::InvalidPath(_))
    ));
}

#[test]
fn revision_tracks_structural_changes() {
    let mut scene = Scene::new();
    let r0 = scene.revision();
    let path = scene.add(SceneNode::group("g"));
    assert_eq!(path, NodePath::from_indices(&[0]));
    assert!(scene.revision() > r0);
    let r1 = scene.revision();
    scene.node_mut(&path).unwrap().name = "renamed".into();
    assert!(scene.revision() > r1);
    assert_eq!(scene.node(&path).unwrap().name, "renamed");
}

#[test]
fn remove_descendant_takes_first_match_only() {
    let mut root = SceneNode::group("root")
        .with_child(SceneNode::group("wheel").with_child(SceneNode::group("hub")))
        .with_child(SceneNode::group("body").with_child(SceneNode::group("wheel")));
    let removed = root.remove_descendant("wheel").expect("wheel present");
    assert_eq!(removed.children.len(), 1);
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].children[0].name, "wheel");
    assert!(root.remove_descendant("root").is_none());
}

#[test]
fn dump_tree_draws_branches() {
    let scene = sample_scene();
    let lines = scene.dump_tree();
    assert_eq!(
        lines,
        vec![
            "*no-name* [Scene]",
            "  ├─a [Group]",
            "  │ ├─a0 [Mesh]",
            "  │ └─shared [Group]",
            "  └─b [Group]",
            "    └─shared [Mesh]",
        ]
    );
}

#[test]
fn generated_normals_and_indices() {
    let mesh = Mesh::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        None,
        None,
        Material::default(),
    );
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.triangle_count(), 1);
    for n in &mesh.normals {
        assert!(Vec3::from_array(*n).abs_diff_eq(Vec3::Z, 1e-6));
    }
}

#[test]
fn cuboid_faces_point_outward() {
    let mesh = Mesh::cuboid(Vec3::new(2.0, 4.0, 6.0), Material::default());
    assert_eq!(mesh.triangle_count(), 12);
    let b = mesh.local_bounds();
    assert_eq!(b.min, Vec3::new(-1.0, -2.0, -3.0));
    assert_eq!(b.max, Vec3::new(1.0, 2.0, 3.0));
    for [a, b, c] in mesh.triangles() {
        let n = (b - a).cross(c - a);
        let centroid = (a + b + c) / 3.0;
        assert!(n.dot(centroid) > 0.0);
    }
}
