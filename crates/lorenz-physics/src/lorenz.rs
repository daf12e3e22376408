//! The Lorenz vector field and its explicit Euler integrator
//!
//! ```text
//! dx/dt = σ(y - x)
//! dy/dt = x(ρ - z) - y
//! dz/dt = xy - βz
//! ```
//!
//! This is the host mirror of `integrate.wgsl`. Both use single precision and
//! neither guards against divergence.

use glam::Vec3;

use crate::constants::{BETA, RHO, SIGMA, STEP_SIZE};

/// Parameters of the Lorenz system plus the fixed step size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LorenzParams {
    pub rho: f32,
    pub sigma: f32,
    pub beta: f32,
    pub dt: f32,
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self {
            rho: RHO,
            sigma: SIGMA,
            beta: BETA,
            dt: STEP_SIZE,
        }
    }
}

/// Result of advancing a position by one or more substeps
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Substep {
    pub position: Vec3,
    /// Velocity evaluated at the start of the last substep
    pub velocity: Vec3,
}

impl Substep {
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

impl LorenzParams {
    pub fn new(rho: f32, sigma: f32, beta: f32, dt: f32) -> Self {
        Self {
            rho,
            sigma,
            beta,
            dt,
        }
    }

    /// Evaluate the vector field at `p`
    pub fn velocity(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.sigma * (p.y - p.x),
            p.x * (self.rho - p.z) - p.y,
            p.x * p.y - self.beta * p.z,
        )
    }

    /// One explicit Euler step: `p' = p + dt * v(p)`
    pub fn step(&self, p: Vec3) -> Substep {
        let velocity = self.velocity(p);
        Substep {
            position: p + self.dt * velocity,
            velocity,
        }
    }

    /// Apply `substeps` Euler steps in sequence.
    ///
    /// Zero substeps is treated as one, matching the compute shader which
    /// always performs at least one step per dispatch.
    pub fn advance(&self, p: Vec3, substeps: u32) -> Substep {
        let mut result = self.step(p);
        for _ in 1..substeps {
            result = self.step(result.position);
        }
        result
    }

    /// All parameters are finite and strictly positive
    pub fn is_valid(&self) -> bool {
        [self.rho, self.sigma, self.beta, self.dt]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}
