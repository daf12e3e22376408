//! # Lorenz Simulation Engine
//!
//! GPU integration of the Lorenz attractor using a compute shader and a pair
//! of ping-pong storage buffers.

pub mod error;
pub mod params;
pub mod program;
pub mod simulation;
pub mod state_buffers;

pub use error::*;
pub use params::*;
pub use program::*;
pub use simulation::*;
pub use state_buffers::*;
