use crate::camera::PerspectiveCamera;
use crate::fit::FitPose;
use glam::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// `1 - (1 - t)^2`, a gentle deceleration.
    #[default]
    QuadOut,
    CubicOut,
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Time-based interpolation of a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: Vec3,
    to: Vec3,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl Tween {
    pub fn new(from: Vec3, to: Vec3, duration_sec: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration_sec.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn value(&self) -> Vec3 {
        self.from.lerp(self.to, self.easing.apply(self.progress()))
    }

    /// Advance by `dt_sec` and return the new value.
    pub fn step(&mut self, dt_sec: f32) -> Vec3 {
        self.elapsed += dt_sec.max(0.0);
        self.value()
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn end(&self) -> Vec3 {
        self.to
    }
}

/// Camera position and look-at target animated together.
///
/// Both tweens share duration and easing so they land on the same frame.
/// Each step writes the position, then the target, then re-aims the camera
/// at the target value of this step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraAnimation {
    position: Tween,
    target: Tween,
}

impl CameraAnimation {
    pub fn new(from: FitPose, to: FitPose, duration_sec: f32, easing: Easing) -> Self {
        Self {
            position: Tween::new(from.position, to.position, duration_sec, easing),
            target: Tween::new(from.target, to.target, duration_sec, easing),
        }
    }

    /// Returns `true` once the animation has reached its end pose.
    pub fn step(&mut self, dt_sec: f32, camera: &mut PerspectiveCamera, target: &mut Vec3) -> bool {
        camera.position = self.position.step(dt_sec);
        *target = self.target.step(dt_sec);
        camera.look_at(*target);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.position.is_finished() && self.target.is_finished()
    }

    pub fn destination(&self) -> FitPose {
        FitPose {
            position: self.position.end(),
            target: self.target.end(),
        }
    }
}
