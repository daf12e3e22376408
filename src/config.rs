//! Command line configuration

use clap::Parser;
use lorenz_physics::{
    LorenzParams, BETA, INITIAL_SCALE, MAX_UPDATES_PER_FRAME, PARTICLE_COUNT, RHO, SIGMA,
    STEP_SIZE, UPDATES_PER_FRAME, VOLUME_HALF_EXTENT,
};
use lorenz_simulation::WORKGROUP_SIZE;
use thiserror::Error;

/// Largest count that fits in one dispatch dimension (65535 workgroups)
pub const MAX_PARTICLES: u32 = 65_535 * WORKGROUP_SIZE;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("particle count must be in 1..={max}, got {got}")]
    ParticleCount { got: u32, max: u32 },

    #[error("updates per frame must be in 1..={max}, got {got}")]
    UpdatesPerFrame { got: u32, max: u32 },

    #[error("rho, sigma, beta and dt must be finite and positive, got {0:?}")]
    LorenzParams(LorenzParams),

    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("zoom step must be greater than 1, got {0}")]
    ZoomStep(f32),

    #[error("window size must be non-zero, got {width}x{height}")]
    WindowSize { width: u32, height: u32 },

    #[error("sample count must be 1 or 4, got {0}")]
    SampleCount(u32),
}

/// Lorenz attractor particle visualizer
#[derive(Debug, Clone, Parser)]
#[command(name = "attractors", version, about)]
pub struct Config {
    /// Number of particles integrated on the GPU
    #[arg(long, default_value_t = PARTICLE_COUNT)]
    pub particles: u32,

    /// Half-extent of the cube particles are spawned in
    #[arg(long, default_value_t = VOLUME_HALF_EXTENT)]
    pub volume: f32,

    /// Rayleigh number ρ
    #[arg(long, default_value_t = RHO)]
    pub rho: f32,

    /// Prandtl number σ
    #[arg(long, default_value_t = SIGMA)]
    pub sigma: f32,

    /// Geometric factor β
    #[arg(long, default_value_t = BETA)]
    pub beta: f32,

    /// Euler step size
    #[arg(long, default_value_t = STEP_SIZE)]
    pub dt: f32,

    /// Euler substeps per particle per frame
    #[arg(long, default_value_t = UPDATES_PER_FRAME)]
    pub updates_per_frame: u32,

    /// Window width in physical pixels
    #[arg(long, default_value_t = 1900)]
    pub width: u32,

    /// Window height in physical pixels
    #[arg(long, default_value_t = 1180)]
    pub height: u32,

    /// MSAA sample count (1 or 4)
    #[arg(long, default_value_t = 4)]
    pub samples: u32,

    /// Present without waiting for vertical sync
    #[arg(long)]
    pub no_vsync: bool,

    /// Seed for the initial particle positions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial scale divisor applied to positions
    #[arg(long, default_value_t = INITIAL_SCALE)]
    pub scale: f32,

    /// Zoom factor applied per frame while a zoom key is held
    #[arg(long, default_value_t = 1.02)]
    pub zoom_step: f32,

    /// Translation per frame while a pan key is held (clip units)
    #[arg(long, default_value_t = 0.01)]
    pub pan_step: f32,

    /// Rotation per frame while a rotate key is held (radians)
    #[arg(long, default_value_t = 0.02)]
    pub rotate_step: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_from(["attractors"])
    }
}

impl Config {
    pub fn lorenz_params(&self) -> LorenzParams {
        LorenzParams::new(self.rho, self.sigma, self.beta, self.dt)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particles == 0 || self.particles > MAX_PARTICLES {
            return Err(ConfigError::ParticleCount {
                got: self.particles,
                max: MAX_PARTICLES,
            });
        }

        if self.updates_per_frame == 0 || self.updates_per_frame > MAX_UPDATES_PER_FRAME {
            return Err(ConfigError::UpdatesPerFrame {
                got: self.updates_per_frame,
                max: MAX_UPDATES_PER_FRAME,
            });
        }

        let lorenz = self.lorenz_params();
        if !lorenz.is_valid() {
            return Err(ConfigError::LorenzParams(lorenz));
        }

        for (name, value) in [
            ("volume", self.volume),
            ("scale", self.scale),
            ("pan step", self.pan_step),
            ("rotate step", self.rotate_step),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(ConfigError::ZoomStep(self.zoom_step));
        }

        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::WindowSize {
                width: self.width,
                height: self.height,
            });
        }

        if !matches!(self.samples, 1 | 4) {
            return Err(ConfigError::SampleCount(self.samples));
        }

        Ok(())
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.no_vsync {
            wgpu::PresentMode::AutoNoVsync
        } else {
            wgpu::PresentMode::AutoVsync
        }
    }
}
