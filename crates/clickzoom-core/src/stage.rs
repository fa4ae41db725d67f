use crate::constants::*;
use crate::scene::{rgb_from_hex, Light, Material, Mesh, Scene, SceneNode, Transform};
use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

/// A model to load and the name of a sub-part hidden before display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelItem {
    pub url: &'static str,
    pub removed: &'static str,
}

/// Hemisphere fill light plus two overhead key lights.
pub fn build_lights() -> Vec<SceneNode> {
    let mut lights = vec![SceneNode::light(
        "",
        Light::Hemisphere {
            sky: rgb_from_hex(HEMI_SKY_COLOR),
            ground: rgb_from_hex(HEMI_GROUND_COLOR),
            intensity: HEMI_INTENSITY,
        },
    )];
    for (i, pos) in KEY_LIGHT_POSITIONS.iter().enumerate() {
        let mut key = SceneNode::light(
            "",
            Light::Directional {
                color: rgb_from_hex(KEY_LIGHT_COLOR),
                intensity: KEY_LIGHT_INTENSITY,
            },
        )
        .with_transform(Transform::from_translation(Vec3::from_array(*pos)));
        key.cast_shadow = i == SHADOW_LIGHT_INDEX;
        lights.push(key);
    }
    lights
}

/// Closed cylinder along Y centered on the origin.
pub fn cylinder_mesh(radius: f32, height: f32, radial_segments: u32, material: Material) -> Mesh {
    let segs = radial_segments.max(3);
    let half = height * 0.5;
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    // Side wall: two rings sharing angle, duplicated seam vertex.
    for y in [half, -half] {
        for x in 0..=segs {
            let theta = x as f32 / segs as f32 * TAU;
            let (s, c) = theta.sin_cos();
            positions.push([radius * s, y, radius * c]);
            normals.push([s, 0.0, c]);
        }
    }
    let ring = segs + 1;
    for x in 0..segs {
        let a = x;
        let b = ring + x;
        let c = ring + x + 1;
        let d = x + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    // Caps: a center vertex fanned to its own ring so normals stay flat.
    for (y, ny) in [(half, 1.0_f32), (-half, -1.0_f32)] {
        let center = positions.len() as u32;
        positions.push([0.0, y, 0.0]);
        normals.push([0.0, ny, 0.0]);
        let first = positions.len() as u32;
        for x in 0..=segs {
            let theta = x as f32 / segs as f32 * TAU;
            let (s, c) = theta.sin_cos();
            positions.push([radius * s, y, radius * c]);
            normals.push([0.0, ny, 0.0]);
        }
        for x in 0..segs {
            let (i0, i1) = (first + x, first + x + 1);
            if ny > 0.0 {
                indices.extend_from_slice(&[center, i0, i1]);
            } else {
                indices.extend_from_slice(&[center, i1, i0]);
            }
        }
    }

    Mesh::new(positions, Some(normals), Some(indices), material)
}

/// The round platform models stand on. Named so picking can fall back to it.
pub fn build_stage() -> SceneNode {
    let material = Material::from_hex(STAGE_COLOR, STAGE_METALNESS, STAGE_ROUGHNESS);
    let mut node = SceneNode::mesh(
        STAGE_NAME,
        cylinder_mesh(STAGE_RADIUS, STAGE_HEIGHT, STAGE_SEGMENTS, material),
    )
    .with_transform(Transform::from_translation(Vec3::new(0.0, STAGE_Y, 0.0)));
    node.receive_shadow = true;
    node
}

/// Add lights and the stage platform to an empty scene.
pub fn populate_scene(scene: &mut Scene) {
    for light in build_lights() {
        scene.add(light);
    }
    scene.add(build_stage());
}

/// X position of model `index` out of `count`, spread evenly over the row.
#[inline]
pub fn model_row_x(index: usize, count: usize) -> f32 {
    if count <= 1 {
        return 0.0;
    }
    (index as f32 / (count - 1) as f32 - 0.5) * MODEL_ROW_SPAN
}

/// Prepare a freshly loaded model for the stage: hide the configured part,
/// scale it to unit height, stand it on y = 0 at its row slot and rename the
/// root so picking finds it.
pub fn place_model(mut root: SceneNode, item: &ModelItem, index: usize, count: usize) -> SceneNode {
    if root.remove_descendant(item.removed).is_none() {
        log::warn!("[stage] part `{}` not found in {}", item.removed, item.url);
    }

    let bounds = root.bounds_under(Mat4::IDENTITY);
    let height = bounds.size().y;
    let scale = if height > 0.0 {
        MODEL_TARGET_HEIGHT / height
    } else {
        1.0
    };
    let min_y = if bounds.is_empty() { 0.0 } else { bounds.min.y };
    root.transform.scale = Vec3::splat(scale);
    root.transform.translation = Vec3::new(model_row_x(index, count), -min_y * scale, 0.0);
    root.name = MODEL_NAME.to_string();
    root.traverse_mut(&mut |n| {
        n.cast_shadow = true;
        n.receive_shadow = true;
    });
    root
}
