//! Mouse-driven orbit camera around a target point.
//!
//! Input handlers only accumulate deltas; `update` applies them once per
//! frame, places the camera on the sphere around `target` and re-aims it.

use crate::camera::PerspectiveCamera;
use crate::constants::{ORBIT_POLAR_EPS, ORBIT_ROTATE_SPEED, ORBIT_ZOOM_SCALE};
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enabled: bool,
    pub rotate_speed: f32,
    pub zoom_scale: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,

    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
    drag: Option<DragMode>,
    last_pointer: Vec2,
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            enabled: true,
            rotate_speed: ORBIT_ROTATE_SPEED,
            zoom_scale: ORBIT_ZOOM_SCALE,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar: 0.0,
            max_polar: PI,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            drag: None,
            last_pointer: Vec2::ZERO,
        }
    }

    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag
    }

    pub fn begin_drag(&mut self, mode: DragMode, x: f32, y: f32) {
        if !self.enabled {
            return;
        }
        self.drag = Some(mode);
        self.last_pointer = Vec2::new(x, y);
    }

    /// Feed a pointer move in CSS pixels; `viewport_height` scales the deltas.
    pub fn drag_to(&mut self, x: f32, y: f32, camera: &PerspectiveCamera, viewport_height: f32) {
        let Some(mode) = self.drag else {
            return;
        };
        let p = Vec2::new(x, y);
        let d = p - self.last_pointer;
        self.last_pointer = p;
        let h = viewport_height.max(1.0);
        match mode {
            DragMode::Rotate => {
                self.rotate_left(TAU * d.x / h * self.rotate_speed);
                self.rotate_up(TAU * d.y / h * self.rotate_speed);
            }
            DragMode::Pan => self.pan(d.x, d.y, camera, h),
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Wheel input: negative `delta_y` moves in, positive moves out.
    pub fn dolly(&mut self, delta_y: f32) {
        if !self.enabled || delta_y == 0.0 {
            return;
        }
        if delta_y < 0.0 {
            self.scale *= self.zoom_scale;
        } else {
            self.scale /= self.zoom_scale;
        }
    }

    /// Shift the target in the camera's screen plane by a pixel delta.
    pub fn pan(&mut self, dx: f32, dy: f32, camera: &PerspectiveCamera, viewport_height: f32) {
        if !self.enabled {
            return;
        }
        let distance = (camera.position - self.target).length();
        let world_height = distance * (camera.fov_y_radians() * 0.5).tan();
        let h = viewport_height.max(1.0);
        let left = -camera.right() * (2.0 * dx * world_height / h);
        let up = camera.up() * (2.0 * dy * world_height / h);
        self.pan_offset += left + up;
    }

    /// Apply pending input. Returns `true` if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let before = (camera.position, camera.orientation);
        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, 0.0)
        };

        theta += self.delta_theta;
        phi += self.delta_phi;
        phi = phi
            .clamp(self.min_polar, self.max_polar)
            .clamp(ORBIT_POLAR_EPS, PI - ORBIT_POLAR_EPS);
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset;

        let sin_phi_r = phi.sin() * radius;
        let offset = Vec3::new(
            sin_phi_r * theta.sin(),
            phi.cos() * radius,
            sin_phi_r * theta.cos(),
        );
        camera.position = self.target + offset;
        camera.look_at(self.target);

        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;

        camera.position.distance_squared(before.0) > 1e-12
            || camera.orientation.dot(before.1).abs() < 1.0 - 1e-6
    }
}
