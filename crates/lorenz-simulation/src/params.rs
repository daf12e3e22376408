//! Simulation parameters uploaded to the integration shader

use bytemuck::{Pod, Zeroable};
use lorenz_physics::LorenzParams;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SimParams {
    // x: rho, y: sigma, z: beta, w: dt
    pub lorenz: [f32; 4],

    // x: updates_per_frame, y: particle_count, z: padding, w: padding
    pub dispatch: [u32; 4],
}

impl SimParams {
    pub fn new(lorenz: &LorenzParams, updates_per_frame: u32, particle_count: u32) -> Self {
        Self {
            lorenz: [lorenz.rho, lorenz.sigma, lorenz.beta, lorenz.dt],
            dispatch: [updates_per_frame.max(1), particle_count, 0, 0],
        }
    }

    pub fn updates_per_frame(&self) -> u32 {
        self.dispatch[0]
    }

    pub fn particle_count(&self) -> u32 {
        self.dispatch[1]
    }

    pub fn lorenz_params(&self) -> LorenzParams {
        let [rho, sigma, beta, dt] = self.lorenz;
        LorenzParams::new(rho, sigma, beta, dt)
    }
}
