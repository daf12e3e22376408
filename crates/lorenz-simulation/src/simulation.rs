//! GPU-based Lorenz attractor simulation manager
//!
//! Particle state lives in two storage buffers. Each frame the integration
//! pass reads the current buffer and writes the next one; the renderer then
//! draws from the next buffer and the roles are swapped. Positions never come
//! back to the host.

use crate::error::{GpuError, Result};
use crate::params::SimParams;
use crate::program::{validated, ProgramSource};
use crate::state_buffers::{Slot, StateBuffers};
use lorenz_physics::{LorenzParams, Particle, MAX_UPDATES_PER_FRAME};
use wgpu::util::DeviceExt;

/// Must match `@workgroup_size` in `integrate.wgsl`
pub const WORKGROUP_SIZE: u32 = 256;

/// One half of the ping-pong pair
struct StateSlot {
    buffer: wgpu::Buffer,
    /// Reads this slot, writes the other one
    integrate_bind_group: wgpu::BindGroup,
}

/// GPU-based Lorenz integration
pub struct AttractorSimulation {
    queue: wgpu::Queue,

    state: StateBuffers<StateSlot>,
    params_buffer: wgpu::Buffer,
    integrate_pipeline: wgpu::ComputePipeline,

    params: SimParams,
}

impl AttractorSimulation {
    pub async fn new(
        device: &wgpu::Device,
        queue: wgpu::Queue,
        particles: &[Particle],
        lorenz: &LorenzParams,
        updates_per_frame: u32,
    ) -> Result<Self> {
        log::info!("Initializing AttractorSimulation...");
        let particle_count = particles.len() as u32;
        check_capacity(device, particle_count)?;

        let state_size = (particles.len() * std::mem::size_of::<Particle>()) as u64;

        // Slot A is current first and holds the spawned particles.
        let buffer_a = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle State Buffer A"),
            contents: bytemuck::cast_slice(particles),
            usage: wgpu::BufferUsages::STORAGE,
        });

        // Slot B is write-only until the first swap.
        let buffer_b = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle State Buffer B"),
            size: state_size,
            usage: wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        });

        let params = SimParams::new(lorenz, updates_per_frame, particle_count);
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Simulation Params Buffer"),
            contents: bytemuck::cast_slice(&[params]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        log::info!(
            "Buffers created: 2 x {} particles ({:.1} MiB each)",
            particle_count,
            state_size as f64 / (1024.0 * 1024.0)
        );

        let integrate_shader = ProgramSource::integrate().compile(device).await?;

        // 0: current state (read), 1: next state (write), 2: params
        let integrate_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Integration Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: true },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: false },
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let integrate_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Integration Pipeline Layout"),
                bind_group_layouts: &[&integrate_bind_group_layout],
                push_constant_ranges: &[],
            });

        let integrate_pipeline = validated(device, "Lorenz Integration", || {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("Lorenz Integration Pipeline"),
                layout: Some(&integrate_pipeline_layout),
                module: &integrate_shader,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                cache: None,
            })
        })
        .await?;

        log::info!("Pipelines created");

        let bind = |source: &wgpu::Buffer, target: &wgpu::Buffer, slot: Slot| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(match slot {
                    Slot::A => "Integration Bind Group A->B",
                    Slot::B => "Integration Bind Group B->A",
                }),
                layout: &integrate_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: source.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: target.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
        };

        let bind_group_a = bind(&buffer_a, &buffer_b, Slot::A);
        let bind_group_b = bind(&buffer_b, &buffer_a, Slot::B);

        let state = StateBuffers::new(
            StateSlot {
                buffer: buffer_a,
                integrate_bind_group: bind_group_a,
            },
            StateSlot {
                buffer: buffer_b,
                integrate_bind_group: bind_group_b,
            },
        );

        log::info!("Bind groups created");

        Ok(Self {
            queue,
            state,
            params_buffer,
            integrate_pipeline,
            params,
        })
    }

    /// Record the integration pass (current -> next) into `encoder`.
    pub fn encode_step(&self, encoder: &mut wgpu::CommandEncoder) {
        let workgroup_count = self.params.particle_count().div_ceil(WORKGROUP_SIZE);

        let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Lorenz Integration Pass"),
            timestamp_writes: None,
        });
        compute_pass.set_pipeline(&self.integrate_pipeline);
        compute_pass.set_bind_group(0, &self.state.current().integrate_bind_group, &[]);
        compute_pass.dispatch_workgroups(workgroup_count, 1, 1);
    }

    /// Make the just-written buffer current. Must follow every `encode_step`.
    pub fn swap(&mut self) {
        self.state.swap();
        log::trace!("state roles swapped, current = {:?}", self.state.current_slot());
    }

    /// Buffer the next integration writes to, and the render input after it
    pub fn next_buffer(&self) -> &wgpu::Buffer {
        &self.state.next().buffer
    }

    pub fn particle_count(&self) -> u32 {
        self.params.particle_count()
    }

    pub fn updates_per_frame(&self) -> u32 {
        self.params.updates_per_frame()
    }

    /// Change the substep count. Clamped to `1..=MAX_UPDATES_PER_FRAME`.
    pub fn set_updates_per_frame(&mut self, updates_per_frame: u32) {
        let clamped = updates_per_frame.clamp(1, MAX_UPDATES_PER_FRAME);
        if clamped != self.params.updates_per_frame() {
            self.params.dispatch[0] = clamped;
            self.update_params();
            log::info!("Updates per frame: {}", clamped);
        }
    }

    fn update_params(&self) {
        self.queue
            .write_buffer(&self.params_buffer, 0, bytemuck::cast_slice(&[self.params]));
    }
}

fn check_capacity(device: &wgpu::Device, particle_count: u32) -> Result<()> {
    let limits = device.limits();
    let required = particle_count as u64 * std::mem::size_of::<Particle>() as u64;
    let limit = (limits.max_storage_buffer_binding_size as u64).min(limits.max_buffer_size);
    let workgroups = particle_count.div_ceil(WORKGROUP_SIZE);

    if required > limit || workgroups > limits.max_compute_workgroups_per_dimension {
        return Err(GpuError::CapacityExceeded {
            particles: particle_count,
            required,
            limit,
        });
    }
    Ok(())
}
