use crate::stage::ModelItem;

// Shared scene/camera tuning constants used by the web frontend and tests.

// Reserved node names
pub const MODEL_NAME: &str = "model"; // every loaded model root is renamed to this
pub const STAGE_NAME: &str = "cylinder"; // fallback pick target

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0; // vertical field of view
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_START: [f32; 3] = [0.0, 0.0, 2.0];

// Zoom-to-fit
pub const MODEL_VIEW_ANGLE_DEG: f32 = 70.0; // elevation used when a model is picked
pub const STAGE_VIEW_ANGLE_DEG: f32 = 45.0; // elevation used for the whole stage
pub const FIT_DURATION_SEC: f32 = 0.5;

// Stage platform
pub const STAGE_RADIUS: f32 = 3.5;
pub const STAGE_HEIGHT: f32 = 0.1;
pub const STAGE_SEGMENTS: u32 = 64;
pub const STAGE_COLOR: u32 = 0x45_4545;
pub const STAGE_METALNESS: f32 = 0.5;
pub const STAGE_ROUGHNESS: f32 = 0.5;
pub const STAGE_Y: f32 = -0.05; // top face sits at y = 0

// Lighting
pub const HEMI_SKY_COLOR: u32 = 0xff_ffff;
pub const HEMI_GROUND_COLOR: u32 = 0x44_4444;
pub const HEMI_INTENSITY: f32 = 0.4;
pub const KEY_LIGHT_COLOR: u32 = 0xff_ffff;
pub const KEY_LIGHT_INTENSITY: f32 = 1.5;
pub const KEY_LIGHT_POSITIONS: [[f32; 3]; 2] = [[-1.5, 4.0, 0.0], [1.5, 4.0, 0.0]];
pub const SHADOW_LIGHT_INDEX: usize = 1; // only the right-hand light casts shadows

// Model layout
pub const MODEL_TARGET_HEIGHT: f32 = 1.0; // models are normalized to this height
pub const MODEL_ROW_SPAN: f32 = 3.0; // x-extent of the row models are spread over

// Orbit controls
pub const ORBIT_ROTATE_SPEED: f32 = 1.0;
pub const ORBIT_ZOOM_SCALE: f32 = 0.95; // per wheel step
pub const ORBIT_POLAR_EPS: f32 = 1e-6; // keeps the camera off the poles

// Models shown on the stage, each with a sub-part hidden before display
pub const MODEL_ITEMS: &[ModelItem] = &[
    ModelItem {
        url: "../data/mazda_rx-7/scene.gltf",
        removed: "front_left_wheel",
    },
    ModelItem {
        url: "../data/warcraft_3_alliance_footmanfanmade/scene.gltf",
        removed: "Object_27",
    },
];
