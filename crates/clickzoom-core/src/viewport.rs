use crate::camera::PerspectiveCamera;
use crate::constants::*;
use crate::error::SceneError;
use crate::fit::{compute_fit_pose, FitPose};
use crate::orbit::OrbitControls;
use crate::picking::{pick_target, Pick, PickPolicy, PointerSample, TargetKind};
use crate::scene::{NodePath, Scene, SceneIndex};
use crate::tween::{CameraAnimation, Easing};
use glam::Vec3;

/// Tunables for the viewport, defaulting to the shared constants.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportConfig {
    pub fov_y_deg: f32,
    pub znear: f32,
    pub zfar: f32,
    pub start_position: Vec3,
    pub model_view_angle_deg: f32,
    pub stage_view_angle_deg: f32,
    pub fit_duration_sec: f32,
    pub easing: Easing,
    pub pick_policy: PickPolicy,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: CAMERA_FOV_DEG,
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
            start_position: Vec3::from_array(CAMERA_START),
            model_view_angle_deg: MODEL_VIEW_ANGLE_DEG,
            stage_view_angle_deg: STAGE_VIEW_ANGLE_DEG,
            fit_duration_sec: FIT_DURATION_SEC,
            easing: Easing::default(),
            pick_policy: PickPolicy::default(),
        }
    }
}

impl ViewportConfig {
    pub fn view_angle_for(&self, kind: TargetKind) -> f32 {
        match kind {
            TargetKind::Model => self.model_view_angle_deg,
            TargetKind::Stage => self.stage_view_angle_deg,
        }
    }
}

/// Camera, orbit controls and the in-flight zoom animation for one viewport.
///
/// Picking and fitting read the camera from here instead of shared globals;
/// `advance` is called once per frame after rendering.
pub struct ViewportController {
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    config: ViewportConfig,
    animation: Option<CameraAnimation>,
}

impl ViewportController {
    pub fn new(config: ViewportConfig, width: f32, height: f32) -> Self {
        let mut camera =
            PerspectiveCamera::new(config.fov_y_deg, 1.0, config.znear, config.zfar);
        camera.set_viewport(width, height);
        camera.position = config.start_position;
        let mut controls = OrbitControls::new(Vec3::ZERO);
        controls.update(&mut camera);
        Self {
            camera,
            controls,
            config,
            animation: None,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.animation = None;
    }

    /// Current pose: camera position and the orbit target it looks at.
    pub fn pose(&self) -> FitPose {
        FitPose {
            position: self.camera.position,
            target: self.controls.target,
        }
    }

    pub fn pick(&self, scene: &Scene, pointer: PointerSample) -> Result<(Pick, SceneIndex), SceneError> {
        pick_target(scene, &self.camera, pointer, self.config.pick_policy)
    }

    /// Pose that frames the node at `path` from `view_angle_deg` of elevation.
    pub fn fit_pose(
        &self,
        scene: &Scene,
        index: &SceneIndex,
        path: &NodePath,
        view_angle_deg: f32,
    ) -> Result<FitPose, SceneError> {
        compute_fit_pose(scene, index, path, self.camera.fov_y_deg, view_angle_deg)
    }

    /// Start animating toward `to`. An animation already running is dropped
    /// and the new one starts from wherever the camera is now.
    pub fn animate_to(&mut self, to: FitPose) {
        if self.animation.take().is_some() {
            log::debug!("[fit] replacing in-flight camera animation");
        }
        self.animation = Some(CameraAnimation::new(
            self.pose(),
            to,
            self.config.fit_duration_sec,
            self.config.easing,
        ));
    }

    /// Frame the node at `path` and start the camera animation toward it.
    pub fn zoom_fit(
        &mut self,
        scene: &Scene,
        index: &SceneIndex,
        path: &NodePath,
        view_angle_deg: f32,
    ) -> Result<FitPose, SceneError> {
        let pose = self.fit_pose(scene, index, path, view_angle_deg)?;
        self.animate_to(pose);
        Ok(pose)
    }

    /// Double-click: pick a model (or the stage) under the pointer and zoom to it.
    pub fn on_double_click(
        &mut self,
        scene: &Scene,
        pointer: PointerSample,
    ) -> Result<(Pick, FitPose), SceneError> {
        let (pick, index) = self.pick(scene, pointer)?;
        let angle = self.config.view_angle_for(pick.kind);
        let pose = self.zoom_fit(scene, &index, &pick.path, angle)?;
        log::info!(
            "[fit] {:?} at {:?} -> eye=({:.2},{:.2},{:.2}) target=({:.2},{:.2},{:.2})",
            pick.kind,
            pick.path.indices(),
            pose.position.x,
            pose.position.y,
            pose.position.z,
            pose.target.x,
            pose.target.y,
            pose.target.z
        );
        Ok((pick, pose))
    }

    /// Advance time-based state by `dt_sec`: the zoom animation first, then
    /// orbit controls.
    pub fn advance(&mut self, dt_sec: f32) {
        if let Some(anim) = &mut self.animation {
            if anim.step(dt_sec, &mut self.camera, &mut self.controls.target) {
                self.animation = None;
            }
        }
        self.controls.update(&mut self.camera);
    }
}
