use crate::camera::PerspectiveCamera;
use crate::constants::{MODEL_NAME, STAGE_NAME};
use crate::error::SceneError;
use crate::ray::{pixel_to_ndc, Ray};
use crate::scene::{NodePath, Scene, SceneIndex};
use glam::Vec2;

/// How to choose among several intersected models.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PickPolicy {
    /// First model in scene traversal order with any hit; later models are
    /// not tested.
    #[default]
    FirstInTraversal,
    /// Model with the closest hit along the ray.
    Nearest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    Model,
    Stage,
}

/// Pointer position in CSS pixels relative to the viewport element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PointerSample {
    pub fn ndc(&self) -> Vec2 {
        pixel_to_ndc(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pick {
    pub path: NodePath,
    pub kind: TargetKind,
    /// Hit distance for models; `None` for the stage fallback.
    pub distance: Option<f32>,
}

/// Closest hit distance between `ray` and any mesh in the subtree at `path`.
pub fn intersect_subtree(
    scene: &Scene,
    index: &SceneIndex,
    path: &NodePath,
    ray: &Ray,
) -> Result<Option<f32>, SceneError> {
    let mut best: Option<f32> = None;
    for entry in index.subtree(path) {
        let Some(mesh) = &scene.node(&entry.path)?.mesh else {
            continue;
        };
        let world_box = mesh.local_bounds().transformed(&entry.world);
        match ray.intersect_aabb(&world_box) {
            Some(t) if best.map_or(true, |b| t <= b) => {}
            _ => continue,
        }
        for [a, b, c] in mesh.triangles() {
            let a = entry.world.transform_point3(a);
            let b = entry.world.transform_point3(b);
            let c = entry.world.transform_point3(c);
            if let Some(t) = ray.intersect_triangle(a, b, c) {
                if best.map_or(true, |bt| t < bt) {
                    best = Some(t);
                }
            }
        }
    }
    Ok(best)
}

/// Resolve which node a ray targets: a model (per `policy`) or the stage.
pub fn pick_with_ray(
    scene: &Scene,
    index: &SceneIndex,
    ray: &Ray,
    policy: PickPolicy,
) -> Result<Pick, SceneError> {
    let mut chosen: Option<(NodePath, f32)> = None;
    for candidate in index.find_all(MODEL_NAME) {
        let Some(t) = intersect_subtree(scene, index, &candidate.path, ray)? else {
            continue;
        };
        match policy {
            PickPolicy::FirstInTraversal => {
                chosen = Some((candidate.path.clone(), t));
                break;
            }
            PickPolicy::Nearest => {
                if chosen.as_ref().map_or(true, |(_, bt)| t < *bt) {
                    chosen = Some((candidate.path.clone(), t));
                }
            }
        }
    }
    if let Some((path, t)) = chosen {
        return Ok(Pick {
            path,
            kind: TargetKind::Model,
            distance: Some(t),
        });
    }
    let stage = index
        .find_first(STAGE_NAME)
        .ok_or_else(|| SceneError::MissingNode(STAGE_NAME.to_string()))?;
    Ok(Pick {
        path: stage.path.clone(),
        kind: TargetKind::Stage,
        distance: None,
    })
}

/// Pick from a pointer position. Builds the scene index once and uses it
/// for both the model and the stage lookups.
pub fn pick_target(
    scene: &Scene,
    camera: &PerspectiveCamera,
    pointer: PointerSample,
    policy: PickPolicy,
) -> Result<(Pick, SceneIndex), SceneError> {
    let index = scene.index();
    let ray = camera.ray_through_ndc(pointer.ndc());
    let pick = pick_with_ray(scene, &index, &ray, policy)?;
    Ok((pick, index))
}
