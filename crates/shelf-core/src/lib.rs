pub mod config;
pub mod constants;
pub mod controller;
pub mod environment;
pub mod error;
pub mod levitation;
pub mod model;
pub mod scene;
pub mod showcase;
pub mod state;
pub mod tween;

pub static SCENE_WGSL: &str = include_str!("../../../shaders/scene.wgsl");
pub static SKYBOX_WGSL: &str = include_str!("../../../shaders/skybox.wgsl");

pub use config::*;
pub use controller::*;
pub use environment::{decode_cube_map, CubeMap};
pub use error::LoadError;
pub use model::{parse_glb, Aabb, FragmentNode, MeshData, ModelFragment, Vertex};
pub use scene::*;
pub use showcase::Showcase;
pub use state::*;
pub use tween::*;
