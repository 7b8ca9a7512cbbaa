use glam::Vec3;

// Shared layout and animation tuning used by the showcase and its front-ends.

// Camera
pub const INITIAL_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 1.0, 3.0);
pub const FOCUS_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 2.0); // camera offset from a focused exhibit
pub const CAMERA_FOVY_DEG: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Shelf
pub const SHELF_SIZE: Vec3 = Vec3::new(5.0, 0.1, 1.0);
pub const SHELF_COLOR: [f32; 4] = [0.863, 0.769, 0.690, 1.0]; // #dcc4b0

// Primitive exhibits
pub const CUBE_SIZE: f32 = 1.0;
pub const CUBE_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

// Interaction timing (seconds)
pub const SPIN_PERIOD_SEC: f32 = 10.0; // one full turn
pub const SETTLE_SEC: f32 = 1.0; // ease rotation back to rest
pub const CAMERA_MOVE_SEC: f32 = 1.0;

// Levitation
pub const LEVITATE_AMPLITUDE: f32 = 0.1;
pub const LEVITATE_DURATION_SEC: [f32; 2] = [1.0, 3.0];
pub const LEVITATE_DELAY_SEC: [f32; 2] = [0.0, 2.0];

// Background cube map faces, in +X, -X, +Y, -Y, +Z, -Z order
pub const BACKGROUND_FACES: [&str; 6] = [
    "assets/hdri/px.png",
    "assets/hdri/nx.png",
    "assets/hdri/py.png",
    "assets/hdri/ny.png",
    "assets/hdri/pz.png",
    "assets/hdri/nz.png",
];
