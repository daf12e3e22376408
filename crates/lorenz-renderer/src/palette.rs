//! Catppuccin Mocha colors for the background and the speed tint

use catppuccin::PALETTE;
use glam::Vec3;
use lorenz_physics::SpeedTint;

/// sRGB channel to linear, the swapchain format is sRGB
fn linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_rgb(color: &catppuccin::Color) -> Vec3 {
    Vec3::new(linear(color.rgb.r), linear(color.rgb.g), linear(color.rgb.b))
}

/// Mocha crust, darker than base so faint regions still read
pub fn clear_color() -> wgpu::Color {
    let crust = linear_rgb(&PALETTE.mocha.colors.crust);
    wgpu::Color {
        r: crust.x as f64,
        g: crust.y as f64,
        b: crust.z as f64,
        a: 1.0,
    }
}

/// Blue base with a peach tint for slow particles
pub fn speed_tint() -> SpeedTint {
    SpeedTint::new(
        linear_rgb(&PALETTE.mocha.colors.blue),
        linear_rgb(&PALETTE.mocha.colors.peach),
    )
}
