//! Default constants for the attractor visualization
//!
//! The Lorenz values are the classic chaotic regime. Everything else is tuned
//! for a pleasant picture at interactive frame rates.

/// Rayleigh number ρ
pub const RHO: f32 = 28.0;

/// Prandtl number σ
pub const SIGMA: f32 = 10.0;

/// Geometric factor β
pub const BETA: f32 = 8.0 / 3.0;

/// Fixed Euler step size
pub const STEP_SIZE: f32 = 0.001;

/// Euler substeps applied per particle per frame
pub const UPDATES_PER_FRAME: u32 = 5;

/// Upper bound for updates per frame when adjusted interactively
pub const MAX_UPDATES_PER_FRAME: u32 = 1000;

/// Number of particles spawned at startup
pub const PARTICLE_COUNT: u32 = 500_000;

/// Half-extent of the spawn cube, particles start in [-V, V)^3
pub const VOLUME_HALF_EXTENT: f32 = 20.0;

/// Initial divisor applied to positions before projection.
/// The attractor spans roughly 50 units, so this fits it into clip space.
pub const INITIAL_SCALE: f32 = 70.0;

/// Floor for the speed used in the color tint division
pub const SPEED_EPSILON: f32 = 1.0e-4;

/// Per-point alpha; brightness comes from additive build-up
pub const POINT_ALPHA: f32 = 0.1;

/// Numerator of the speed tint, `k / speed`
pub const TINT_STRENGTH: f32 = 4.0;
