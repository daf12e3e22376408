//! Interactive scale / rotate / translate state for the point cloud

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use lorenz_physics::{SpeedTint, INITIAL_SCALE};

/// Transform + shading uniform for `points.wgsl`
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TransformUniform {
    pub rotation: [[f32; 4]; 4],
    pub translation: [[f32; 4]; 4],
    // x: scale, y: alpha, z: tint strength, w: speed epsilon
    pub shading: [f32; 4],
    pub base_color: [f32; 4],
    pub tint_color: [f32; 4],
}

/// Matrices handed to the render stage each frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformMatrices {
    pub rotation: Mat4,
    pub translation: Mat4,
    pub scale: f32,
}

impl TransformMatrices {
    pub fn to_uniform(&self, tint: &SpeedTint) -> TransformUniform {
        TransformUniform {
            rotation: self.rotation.to_cols_array_2d(),
            translation: self.translation.to_cols_array_2d(),
            shading: [self.scale, tint.alpha, tint.strength, tint.epsilon],
            base_color: tint.base.extend(1.0).to_array(),
            tint_color: tint.tint.extend(1.0).to_array(),
        }
    }

    /// Host-side projection, `translation * rotation * (p / scale, 1)`
    pub fn project(&self, p: Vec3) -> Vec3 {
        let clip = self.translation * self.rotation * (p / self.scale).extend(1.0);
        clip.truncate() / clip.w
    }
}

/// Camera state driven by input.
///
/// The rotation matrix is cached and only rebuilt after an angle changes.
#[derive(Clone, Debug)]
pub struct TransformPipeline {
    scale: f32,
    theta: f32,
    phi: f32,
    translation: Vec2,

    rotation: Mat4,
    rotation_dirty: bool,
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new(INITIAL_SCALE)
    }
}

impl TransformPipeline {
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            theta: 0.0,
            phi: 0.0,
            translation: Vec2::ZERO,
            rotation: Mat4::IDENTITY,
            rotation_dirty: false,
        }
    }

    /// Multiply the scale divisor. `factor > 1` zooms out.
    /// Non-positive or non-finite factors are ignored.
    pub fn apply_zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.scale *= factor;
        }
    }

    pub fn apply_pan(&mut self, dx: f32, dy: f32) {
        self.translation += Vec2::new(dx, dy);
    }

    pub fn apply_rotation(&mut self, d_theta: f32, d_phi: f32) {
        if d_theta != 0.0 || d_phi != 0.0 {
            self.theta += d_theta;
            self.phi += d_phi;
            self.rotation_dirty = true;
        }
    }

    /// Back to the initial camera, keeping `initial_scale`
    pub fn reset(&mut self, initial_scale: f32) {
        *self = Self::new(initial_scale);
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn angles(&self) -> (f32, f32) {
        (self.theta, self.phi)
    }

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn needs_rotation_rebuild(&self) -> bool {
        self.rotation_dirty
    }

    pub fn current_matrices(&mut self) -> TransformMatrices {
        if self.rotation_dirty {
            self.rotation = rotation_matrix(self.theta, self.phi);
            self.rotation_dirty = false;
        }

        TransformMatrices {
            rotation: self.rotation,
            translation: Mat4::from_translation(self.translation.extend(0.0)),
            scale: self.scale,
        }
    }
}

/// `Rx(phi) * Ry(theta)`: theta spins about the vertical axis, phi tilts
/// the result towards the viewer.
pub fn rotation_matrix(theta: f32, phi: f32) -> Mat4 {
    Mat4::from_rotation_x(phi) * Mat4::from_rotation_y(theta)
}
