//! Owned, versioned GPU program sources
//!
//! Shader text is carried as data and handed to the device explicitly. Any
//! compilation or pipeline validation failure is reported as an error instead
//! of being logged and ignored.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::error::{GpuError, Result};

const INTEGRATE_WGSL: &str = include_str!("shaders/integrate.wgsl");

/// WGSL source plus the metadata used in labels and diagnostics
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramSource {
    pub label: Cow<'static, str>,
    pub version: u32,
    pub wgsl: Cow<'static, str>,
}

impl ProgramSource {
    pub fn new(
        label: impl Into<Cow<'static, str>>,
        version: u32,
        wgsl: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            label: label.into(),
            version,
            wgsl: wgsl.into(),
        }
    }

    /// Lorenz integration compute program
    pub fn integrate() -> Self {
        Self::new("Lorenz Integration Shader", 2, INTEGRATE_WGSL)
    }

    pub fn versioned_label(&self) -> String {
        format!("{} v{}", self.label, self.version)
    }

    /// Compile into a shader module, failing on any error-level diagnostic.
    pub async fn compile(&self, device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
        let label = self.versioned_label();

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label.as_str()),
            source: wgpu::ShaderSource::Wgsl(self.wgsl.clone()),
        });
        let info = module.get_compilation_info().await;
        let scope_error = device.pop_error_scope().await;

        let log = compilation_log(&info.messages);
        if !log.is_empty() {
            return Err(GpuError::ProgramCompilation { label, log });
        }
        if let Some(error) = scope_error {
            return Err(GpuError::ProgramCompilation {
                label,
                log: error.to_string(),
            });
        }

        log::info!("✓ Compiled {}", label);
        Ok(module)
    }
}

/// Run `build` inside a validation error scope.
///
/// Used around pipeline creation, which is where link-time mismatches
/// between stages and layouts surface in wgpu.
pub async fn validated<T>(
    device: &wgpu::Device,
    label: &str,
    build: impl FnOnce() -> T,
) -> Result<T> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = build();
    match device.pop_error_scope().await {
        Some(error) => Err(GpuError::ProgramValidation {
            label: label.to_string(),
            message: error.to_string(),
        }),
        None => Ok(value),
    }
}

fn compilation_log(messages: &[wgpu::CompilationMessage]) -> String {
    let mut log = String::new();
    for message in messages
        .iter()
        .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
    {
        match &message.location {
            Some(location) => {
                let _ = writeln!(
                    log,
                    "{}:{}: {}",
                    location.line_number, location.line_position, message.message
                );
            }
            None => {
                let _ = writeln!(log, "{}", message.message);
            }
        }
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_program_declares_entry_point() {
        let program = ProgramSource::integrate();
        assert!(program.wgsl.contains("fn main"));
        assert!(program.wgsl.contains("@compute"));
        assert_eq!(program.versioned_label(), "Lorenz Integration Shader v2");
    }

    #[test]
    fn test_owned_source_is_independent() {
        let mut edited = ProgramSource::integrate();
        edited.wgsl.to_mut().push_str("\n// edited");
        assert_ne!(edited, ProgramSource::integrate());
    }

    #[test]
    fn test_empty_compilation_log() {
        assert!(compilation_log(&[]).is_empty());
    }
}
