// Host-side tests for easing, tweens and the viewport's zoom animation.

use clickzoom_core::{
    build_stage, fit_direction, fit_distance, CameraAnimation, Easing, FitPose, Material, Mesh,
    PerspectiveCamera, PointerSample, Scene, SceneNode, TargetKind, Tween, ViewportConfig,
    ViewportController,
};
use glam::Vec3;

#[test]
fn easing_endpoints_and_quad_out() {
    for e in [
        Easing::Linear,
        Easing::QuadOut,
        Easing::CubicOut,
        Easing::CubicInOut,
    ] {
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(1.0), 1.0);
        assert_eq!(e.apply(2.0), 1.0, "clamped");
    }
    assert!((Easing::QuadOut.apply(0.5) - 0.75).abs() < 1e-6);
    assert_eq!(Easing::default(), Easing::QuadOut);
}

#[test]
fn tween_advances_and_finishes() {
    let mut t = Tween::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 1.0, Easing::Linear);
    assert!(t.step(0.25).abs_diff_eq(Vec3::new(2.5, 0.0, 0.0), 1e-5));
    assert!(!t.is_finished());
    let end = t.step(5.0);
    assert!(t.is_finished());
    assert_eq!(end, t.end());
}

#[test]
fn zero_duration_completes_immediately() {
    let mut t = Tween::new(Vec3::ZERO, Vec3::ONE, 0.0, Easing::QuadOut);
    assert_eq!(t.step(0.0), Vec3::ONE);
    assert!(t.is_finished());
}

#[test]
fn camera_animation_aims_at_interpolated_target() {
    let mut cam = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
    cam.position = Vec3::new(0.0, 0.0, 5.0);
    let mut target = Vec3::ZERO;
    let mut anim = CameraAnimation::new(
        FitPose {
            position: cam.position,
            target,
        },
        FitPose {
            position: Vec3::new(4.0, 4.0, 4.0),
            target: Vec3::new(2.0, 0.0, 0.0),
        },
        0.5,
        Easing::QuadOut,
    );
    let done = anim.step(0.2, &mut cam, &mut target);
    assert!(!done);
    assert!(target.x > 0.0 && target.x < 2.0);
    let expected = (target - cam.position).normalize();
    assert!(cam.forward().abs_diff_eq(expected, 1e-4));

    assert!(anim.step(0.3, &mut cam, &mut target));
    assert!(cam.position.abs_diff_eq(Vec3::new(4.0, 4.0, 4.0), 1e-5));
    assert!(target.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
}

fn cube_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add(SceneNode::mesh(
        "model",
        Mesh::cuboid(Vec3::splat(2.0), Material::default()),
    ));
    scene.add(build_stage());
    scene
}

fn center_pointer() -> PointerSample {
    PointerSample {
        x: 400.0,
        y: 300.0,
        width: 800.0,
        height: 600.0,
    }
}

#[test]
fn double_click_zooms_to_model_over_fit_duration() {
    let scene = cube_scene();
    let mut vp = ViewportController::new(ViewportConfig::default(), 800.0, 600.0);
    assert!(vp.camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-5));

    let (pick, pose) = vp.on_double_click(&scene, center_pointer()).unwrap();
    assert_eq!(pick.kind, TargetKind::Model);
    let expected = fit_direction(70.0) * fit_distance(12f32.sqrt(), 75.0);
    assert!(pose.position.abs_diff_eq(expected, 1e-4));
    assert!(vp.is_animating());

    vp.advance(0.25);
    assert!(vp.is_animating());
    vp.advance(0.25);
    assert!(!vp.is_animating());
    assert!(vp.camera.position.abs_diff_eq(pose.position, 1e-3));
    assert!(vp.controls.target.abs_diff_eq(Vec3::ZERO, 1e-5));
}

#[test]
fn miss_zooms_to_stage_at_stage_angle() {
    let scene = cube_scene();
    let config = ViewportConfig {
        start_position: Vec3::new(0.0, 0.0, 10.0),
        ..ViewportConfig::default()
    };
    let mut vp = ViewportController::new(config, 800.0, 600.0);
    let corner = PointerSample {
        x: 0.0,
        y: 0.0,
        ..center_pointer()
    };
    let (pick, pose) = vp.on_double_click(&scene, corner).unwrap();
    assert_eq!(pick.kind, TargetKind::Stage);
    let dir = (pose.position - pose.target).normalize();
    assert!(dir.abs_diff_eq(fit_direction(45.0), 1e-4));
}

#[test]
fn new_fit_cancels_the_running_one() {
    let mut vp = ViewportController::new(ViewportConfig::default(), 800.0, 600.0);
    let first = FitPose {
        position: Vec3::new(0.0, 6.0, 6.0),
        target: Vec3::ZERO,
    };
    let second = FitPose {
        position: Vec3::new(5.0, 2.0, 0.0),
        target: Vec3::new(1.0, 0.0, 0.0),
    };
    vp.animate_to(first);
    vp.advance(0.1);
    let mid = vp.pose();

    vp.animate_to(second);
    vp.advance(0.0);
    assert!(vp.camera.position.abs_diff_eq(mid.position, 1e-3));

    vp.advance(0.45);
    assert!(vp.is_animating(), "restarted clock, not the old one");
    vp.advance(0.1);
    assert!(!vp.is_animating());
    assert!(vp.camera.position.abs_diff_eq(second.position, 1e-3));
    assert!(vp.controls.target.abs_diff_eq(second.target, 1e-5));
}

#[test]
fn missing_stage_leaves_camera_alone() {
    let scene = Scene::new();
    let mut vp = ViewportController::new(ViewportConfig::default(), 800.0, 600.0);
    let before = vp.camera.position;
    assert!(vp.on_double_click(&scene, center_pointer()).is_err());
    assert!(!vp.is_animating());
    assert_eq!(vp.camera.position, before);
}
