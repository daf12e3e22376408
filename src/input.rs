//! Keyboard tracking
//!
//! Camera keys act every frame while held. Reset and the substep keys act
//! once per press.

use crate::config::Config;
use glam::Vec2;
use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Per-frame step sizes for held keys
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Controls {
    pub zoom_step: f32,
    pub pan_step: f32,
    pub rotate_step: f32,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            zoom_step: 1.02,
            pan_step: 0.01,
            rotate_step: 0.02,
        }
    }
}

impl From<&Config> for Controls {
    fn from(config: &Config) -> Self {
        Self {
            zoom_step: config.zoom_step,
            pan_step: config.pan_step,
            rotate_step: config.rotate_step,
        }
    }
}

/// What the keyboard asks for this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputState {
    pub quit: bool,
    /// Scale multiplier, 1.0 when no zoom key is held
    pub zoom: f32,
    pub pan: Vec2,
    /// (d_theta, d_phi)
    pub rotate: Vec2,
    pub reset: bool,
    pub updates_delta: i32,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            quit: false,
            zoom: 1.0,
            pan: Vec2::ZERO,
            rotate: Vec2::ZERO,
            reset: false,
            updates_delta: 0,
        }
    }
}

impl InputState {
    /// True if the camera has to be re-uploaded
    pub fn moves_camera(&self) -> bool {
        self.reset || self.zoom != 1.0 || self.pan != Vec2::ZERO || self.rotate != Vec2::ZERO
    }
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
    quit_requested: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key event. OS key repeat does not count as a new press.
    pub fn handle_key(&mut self, key: KeyCode, is_pressed: bool) {
        if is_pressed {
            if self.held.insert(key) {
                self.pressed.insert(key);
            }
        } else {
            self.held.remove(&key);
        }
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Drop held keys, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }

    /// Collapse the current key state into one frame of input.
    /// Edge-triggered presses are consumed.
    pub fn take_input(&mut self, controls: &Controls) -> InputState {
        let axis = |neg: KeyCode, pos: KeyCode| -> f32 {
            self.is_held(pos) as i32 as f32 - self.is_held(neg) as i32 as f32
        };

        // E shrinks the scale divisor (zoom in), Q grows it
        let zoom = controls.zoom_step.powf(axis(KeyCode::KeyE, KeyCode::KeyQ));
        let pan = Vec2::new(
            axis(KeyCode::KeyA, KeyCode::KeyD),
            axis(KeyCode::KeyS, KeyCode::KeyW),
        ) * controls.pan_step;
        let rotate = Vec2::new(
            axis(KeyCode::ArrowLeft, KeyCode::ArrowRight),
            axis(KeyCode::ArrowDown, KeyCode::ArrowUp),
        ) * controls.rotate_step;

        let mut updates_delta = 0;
        if self.pressed.contains(&KeyCode::BracketRight) {
            updates_delta += 1;
        }
        if self.pressed.contains(&KeyCode::BracketLeft) {
            updates_delta -= 1;
        }

        let input = InputState {
            quit: self.quit_requested || self.is_held(KeyCode::Escape),
            zoom,
            pan,
            rotate,
            reset: self.pressed.contains(&KeyCode::KeyR),
            updates_delta,
        };

        self.pressed.clear();
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keys_is_idle() {
        let mut keys = KeyTracker::new();
        let input = keys.take_input(&Controls::default());
        assert_eq!(input, InputState::default());
        assert!(!input.moves_camera());
    }

    #[test]
    fn test_held_keys_act_every_frame() {
        let controls = Controls::default();
        let mut keys = KeyTracker::new();
        keys.handle_key(KeyCode::KeyE, true);
        keys.handle_key(KeyCode::KeyD, true);

        for _ in 0..3 {
            let input = keys.take_input(&controls);
            assert!((input.zoom - 1.0 / controls.zoom_step).abs() < 1e-6);
            assert_eq!(input.pan, Vec2::new(controls.pan_step, 0.0));
        }

        keys.handle_key(KeyCode::KeyE, false);
        keys.handle_key(KeyCode::KeyD, false);
        assert!(!keys.take_input(&controls).moves_camera());
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut keys = KeyTracker::new();
        keys.handle_key(KeyCode::KeyQ, true);
        keys.handle_key(KeyCode::KeyE, true);
        keys.handle_key(KeyCode::ArrowLeft, true);
        keys.handle_key(KeyCode::ArrowRight, true);

        let input = keys.take_input(&Controls::default());
        assert_eq!(input.zoom, 1.0);
        assert_eq!(input.rotate, Vec2::ZERO);
    }

    #[test]
    fn test_rotation_axes() {
        let controls = Controls::default();
        let mut keys = KeyTracker::new();
        keys.handle_key(KeyCode::ArrowRight, true);
        keys.handle_key(KeyCode::ArrowDown, true);

        let input = keys.take_input(&controls);
        assert_eq!(
            input.rotate,
            Vec2::new(controls.rotate_step, -controls.rotate_step)
        );
    }

    #[test]
    fn test_edge_triggered_once_per_press() {
        let controls = Controls::default();
        let mut keys = KeyTracker::new();

        keys.handle_key(KeyCode::KeyR, true);
        // OS repeat while held
        keys.handle_key(KeyCode::KeyR, true);
        keys.handle_key(KeyCode::BracketRight, true);

        let first = keys.take_input(&controls);
        assert!(first.reset);
        assert_eq!(first.updates_delta, 1);

        let second = keys.take_input(&controls);
        assert!(!second.reset);
        assert_eq!(second.updates_delta, 0);

        keys.handle_key(KeyCode::KeyR, false);
        keys.handle_key(KeyCode::KeyR, true);
        assert!(keys.take_input(&controls).reset);
    }

    #[test]
    fn test_quit_sources() {
        let controls = Controls::default();

        let mut keys = KeyTracker::new();
        keys.handle_key(KeyCode::Escape, true);
        assert!(keys.take_input(&controls).quit);

        let mut keys = KeyTracker::new();
        keys.request_quit();
        assert!(keys.take_input(&controls).quit);
        assert!(keys.take_input(&controls).quit);
    }

    #[test]
    fn test_release_all() {
        let mut keys = KeyTracker::new();
        keys.handle_key(KeyCode::KeyW, true);
        keys.handle_key(KeyCode::KeyR, true);
        keys.release_all();

        let input = keys.take_input(&Controls::default());
        assert!(!input.moves_camera());
        assert!(!keys.is_held(KeyCode::KeyW));
    }
}
