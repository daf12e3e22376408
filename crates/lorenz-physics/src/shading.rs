//! Speed-based point shading
//!
//! `rgb = base + (strength / max(speed, epsilon)) * tint`, alpha fixed.
//! Slow regions of the attractor pick up more tint; with additive blending the
//! dense regions glow brighter.

use glam::{Vec3, Vec4};

use crate::constants::{POINT_ALPHA, SPEED_EPSILON, TINT_STRENGTH};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedTint {
    pub base: Vec3,
    pub tint: Vec3,
    pub strength: f32,
    pub alpha: f32,
    pub epsilon: f32,
}

impl Default for SpeedTint {
    fn default() -> Self {
        Self {
            base: Vec3::new(0.2, 0.3, 0.9),
            tint: Vec3::new(1.0, 0.6, 0.3),
            strength: TINT_STRENGTH,
            alpha: POINT_ALPHA,
            epsilon: SPEED_EPSILON,
        }
    }
}

impl SpeedTint {
    pub fn new(base: Vec3, tint: Vec3) -> Self {
        Self {
            base,
            tint,
            ..Default::default()
        }
    }

    /// Scale factor applied to the tint for a given speed
    pub fn tint_weight(&self, speed: f32) -> f32 {
        self.strength / speed.max(self.epsilon)
    }

    pub fn color(&self, speed: f32) -> Vec4 {
        let rgb = self.base + self.tint_weight(speed) * self.tint;
        rgb.extend(self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_speed_is_finite() {
        let shading = SpeedTint::default();
        let color = shading.color(0.0);
        assert!(color.is_finite());
        assert_eq!(shading.tint_weight(0.0), TINT_STRENGTH / SPEED_EPSILON);
    }

    #[test]
    fn test_subnormal_speed_is_floored() {
        let shading = SpeedTint::default();
        assert_eq!(shading.color(f32::MIN_POSITIVE), shading.color(0.0));
    }

    #[test]
    fn test_fast_particles_approach_base() {
        let shading = SpeedTint::default();
        let color = shading.color(1.0e9);
        assert!((color.truncate() - shading.base).length() < 1e-6);
        assert_eq!(color.w, POINT_ALPHA);
    }

    #[test]
    fn test_tint_decreases_with_speed() {
        let shading = SpeedTint::default();
        assert!(shading.tint_weight(5.0) > shading.tint_weight(50.0));
    }
}
