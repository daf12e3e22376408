//! # Lorenz Physics
//!
//! Host-side model of the Lorenz system: the vector field, the explicit Euler
//! step, the GPU particle layout and the speed-based shading rule. The GPU
//! shaders implement the same arithmetic; this crate is the reference the
//! tests check against.

pub mod constants;
pub mod lorenz;
pub mod particle;
pub mod shading;

pub use constants::*;
pub use lorenz::*;
pub use particle::*;
pub use shading::*;
