//! GPU particle layout and initial spawning

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

/// GPU-compatible particle slot
/// Aligned for WGSL `struct Particle { position: vec3<f32>, speed: f32 }`
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    /// Position in attractor space
    pub position: [f32; 3],
    /// Magnitude of the last substep velocity, drives the color tint
    pub speed: f32,
}

impl Particle {
    pub fn new(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
            speed: 0.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Spawn `count` particles uniformly in the cube `[-half_extent, half_extent)^3`.
///
/// Each axis is `2 * half_extent * (r - 0.5)` with `r` uniform in `[0, 1)`.
pub fn spawn_in_cube<R: Rng>(rng: &mut R, count: usize, half_extent: f32) -> Vec<Particle> {
    let mut axis = || 2.0 * half_extent * (rng.random::<f32>() - 0.5);

    (0..count)
        .map(|_| Particle::new(Vec3::new(axis(), axis(), axis())))
        .collect()
}
