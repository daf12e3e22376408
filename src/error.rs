//! Application level errors

use crate::config::ConfigError;
use lorenz_simulation::GpuError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface error: {0}")]
    Surface(wgpu::SurfaceError),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
