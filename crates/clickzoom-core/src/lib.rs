pub mod bounds;
pub mod camera;
pub mod constants;
pub mod error;
pub mod fit;
pub mod gltf_import;
pub mod orbit;
pub mod picking;
pub mod ray;
pub mod scene;
pub mod stage;
pub mod tween;
pub mod viewport;

pub use bounds::*;
pub use camera::*;
pub use constants::*;
pub use error::*;
pub use fit::*;
pub use gltf_import::*;
pub use orbit::*;
pub use picking::*;
pub use ray::*;
pub use scene::*;
pub use stage::*;
pub use tween::*;
pub use viewport::*;
