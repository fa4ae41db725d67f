use crate::bounds::Aabb;
use glam::{Vec2, Vec3};

const TRIANGLE_EPSILON: f32 = 1e-7;

/// Half-line with a unit-length direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test. Returns the entry distance, or 0 when the origin is inside.
    pub fn intersect_aabb(&self, b: &Aabb) -> Option<f32> {
        if b.is_empty() {
            return None;
        }
        let inv = self.direction.recip();
        let t0 = (b.min - self.origin) * inv;
        let t1 = (b.max - self.origin) * inv;
        // NaN from 0 * inf (origin on a slab plane, axis-parallel ray) is
        // discarded by min/max, which treat it as missing.
        let t_near = t0.min(t1).max_element();
        let t_far = t0.max(t1).min_element();
        if t_far < t_near.max(0.0) {
            return None;
        }
        Some(t_near.max(0.0))
    }

    /// Möller–Trumbore, both faces. Returns the hit distance along the ray.
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let e1 = b - a;
        let e2 = c - a;
        let p = self.direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() < TRIANGLE_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(e1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(q) * inv_det;
        (t >= 0.0).then_some(t)
    }
}

/// Convert a pixel offset inside a `width` x `height` viewport to normalized
/// device coordinates. Screen-down maps to NDC-up.
#[inline]
pub fn pixel_to_ndc(px: f32, py: f32, width: f32, height: f32) -> Vec2 {
    let w = width.max(1.0);
    let h = height.max(1.0);
    Vec2::new((px / w) * 2.0 - 1.0, -(py / h) * 2.0 + 1.0)
}
