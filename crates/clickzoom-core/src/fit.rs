//! Zoom-to-fit geometry.
//!
//! The framing radius is half the bounding-box diagonal, so non-cubic
//! targets are over-framed along their short axes.

use crate::bounds::Aabb;
use crate::error::SceneError;
use crate::scene::{world_bounds, NodePath, Scene, SceneIndex};
use glam::{Quat, Vec3};

/// Camera position plus the point it should look at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitPose {
    pub position: Vec3,
    pub target: Vec3,
}

/// World +Y rotated about +X by `view_angle_deg`: 0° is straight up, 90° is +Z.
#[inline]
pub fn fit_direction(view_angle_deg: f32) -> Vec3 {
    Quat::from_axis_angle(Vec3::X, view_angle_deg.to_radians()) * Vec3::Y
}

/// Distance at which a sphere of radius `diagonal / 2` fills the vertical FOV.
#[inline]
pub fn fit_distance(diagonal: f32, fov_y_deg: f32) -> f32 {
    let half_size = diagonal * 0.5;
    let half_fov = (fov_y_deg * 0.5).to_radians();
    half_size / half_fov.tan()
}

pub fn fit_pose_for_bounds(bounds: &Aabb, fov_y_deg: f32, view_angle_deg: f32) -> FitPose {
    let center = bounds.center();
    let distance = fit_distance(bounds.diagonal(), fov_y_deg);
    let direction = fit_direction(view_angle_deg).normalize();
    FitPose {
        position: center + direction * distance,
        target: center,
    }
}

/// Pose that frames the subtree at `target`.
pub fn compute_fit_pose(
    scene: &Scene,
    index: &SceneIndex,
    target: &NodePath,
    fov_y_deg: f32,
    view_angle_deg: f32,
) -> Result<FitPose, SceneError> {
    let bounds = world_bounds(scene, index, target)?;
    Ok(fit_pose_for_bounds(&bounds, fov_y_deg, view_angle_deg))
}
