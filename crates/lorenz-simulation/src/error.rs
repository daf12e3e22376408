//! Errors raised while bringing up the GPU side of the simulation

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("surface reports no supported texture formats on {adapter}")]
    UnsupportedSurface { adapter: String },

    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    #[error("error in {label} compilation:\n{log}")]
    ProgramCompilation { label: String, log: String },

    #[error("error in {label} pipeline creation: {message}")]
    ProgramValidation { label: String, message: String },

    #[error("{particles} particles need {required} bytes of storage, device allows {limit}")]
    CapacityExceeded {
        particles: u32,
        required: u64,
        limit: u64,
    },
}

pub type Result<T> = std::result::Result<T, GpuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_surface_names_adapter() {
        let err = GpuError::UnsupportedSurface {
            adapter: "llvmpipe".into(),
        };
        assert_eq!(
            err.to_string(),
            "surface reports no supported texture formats on llvmpipe"
        );
    }

    #[test]
    fn test_capacity_message() {
        let err = GpuError::CapacityExceeded {
            particles: 10,
            required: 160,
            limit: 128,
        };
        assert_eq!(
            err.to_string(),
            "10 particles need 160 bytes of storage, device allows 128"
        );
    }
}
