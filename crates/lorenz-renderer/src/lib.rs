//! # Lorenz Renderer
//!
//! Interactive transform state and the additive point cloud pass.

pub mod palette;
pub mod renderer;
pub mod transform;

pub use renderer::*;
pub use transform::*;
