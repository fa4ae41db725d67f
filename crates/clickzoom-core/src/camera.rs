use crate::ray::Ray;
use glam::{Mat3, Mat4, Quat, Vec2, Vec3};

/// Right-handed perspective camera. Looks down its local -Z with +Y up.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub orientation: Quat,
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl PerspectiveCamera {
    pub fn new(fov_y_deg: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            fov_y_deg,
            aspect,
            znear,
            zfar,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.aspect = width.max(1.0) / height.max(1.0);
    }

    /// Rotate so the camera faces `target`, keeping world +Y as up.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(mut back) = (self.position - target).try_normalize() else {
            return;
        };
        let mut right = Vec3::Y.cross(back);
        if right.length_squared() < 1e-12 {
            // Looking straight up or down: nudge off the pole.
            back.z += 1e-4;
            back = back.normalize();
            right = Vec3::Y.cross(back);
        }
        let right = right.normalize();
        let up = back.cross(right);
        self.orientation = Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize();
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    pub fn fov_y_radians(&self) -> f32 {
        self.fov_y_deg.to_radians()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians(), self.aspect, self.znear, self.zfar)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray from the camera through a point in normalized device
    /// coordinates.
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let p = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray::new(self.position, p - self.position)
    }
}
