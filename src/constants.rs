// Web front-end tuning. Layout and animation timing live in the core crate's
// `constants.rs`; only values that are meaningless outside the browser belong here.

// DOM element ids and classes (see index.html)
pub const CANVAS_ID: &str = "app-canvas";
pub const PANEL_ID: &str = "description-panel";
pub const PANEL_TITLE_ID: &str = "description-title";
pub const PANEL_BODY_ID: &str = "description-body";
pub const HIDDEN_CLASS: &str = "hidden";

// Optional catalog; the built-in one is used when this is missing or invalid.
pub const CONFIG_URL: &str = "assets/showcase.json";

// Clamp for frame deltas so a backgrounded tab does not fast-forward tweens.
pub const MAX_FRAME_DT_SEC: f32 = 0.1;

// Lighting
pub const CLEAR_COLOR: [f64; 4] = [1.0, 1.0, 1.0, 1.0];
pub const LIGHT_POSITION: [f32; 3] = [-5.0, 6.0, 5.0]; // directional, aimed at the origin
pub const LIGHT_INTENSITY: f32 = 0.8;
pub const AMBIENT_LIGHT: f32 = 0.45;
