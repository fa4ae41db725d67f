/// Page wiring and presentation constants for the web front-end.
///
/// Scene, camera and stage tuning lives in `clickzoom_core::constants`; this
/// module only holds what the browser side needs.
// Element the canvas is appended to; double-clicks are read relative to it
pub const CONTAINER_ID: &str = "webgl-container";

// Background behind the stage (linear RGBA)
pub const CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

// WheelEvent.deltaMode normalization to pixels
pub const WHEEL_LINE_PX: f32 = 16.0;
pub const WHEEL_PAGE_PX: f32 = 800.0;

// MouseEvent.button values
pub const BUTTON_PRIMARY: i16 = 0;
pub const BUTTON_SECONDARY: i16 = 2;

// Frame pacing: long gaps (hidden tab) advance animations by at most this much
pub const MAX_FRAME_DT_SEC: f32 = 0.1;

// Directional lights the scene shader reads
pub const MAX_KEY_LIGHTS: usize = 2;
