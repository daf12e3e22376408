//! Per-frame orchestration
//!
//! `FrameLoop` owns the camera and the substep count and decides what
//! happens each frame. Everything that touches the GPU sits behind
//! [`FrameBackend`].

use crate::input::InputState;
use crate::stats::FrameStats;
use lorenz_physics::MAX_UPDATES_PER_FRAME;
use lorenz_renderer::{TransformMatrices, TransformPipeline};
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Init,
    Running,
    ShuttingDown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// Quit was requested; nothing was dispatched this frame
    Quit,
    /// Not running, nothing happened
    Inactive,
}

/// GPU side of a frame, called in this order:
/// `begin_frame`, `dispatch_integration`, `render`, `swap`, `present`.
pub trait FrameBackend {
    type Error;

    fn apply_transform(&mut self, matrices: &TransformMatrices);
    fn set_updates_per_frame(&mut self, updates_per_frame: u32);

    /// Acquire the surface texture and start recording
    fn begin_frame(&mut self) -> Result<(), Self::Error>;
    /// Integrate current -> next
    fn dispatch_integration(&mut self);
    /// Draw the buffer just written
    fn render(&mut self);
    fn swap(&mut self);
    /// Submit and present
    fn present(&mut self);
}

pub struct FrameLoop {
    phase: Phase,
    transform: TransformPipeline,
    initial_scale: f32,
    updates_per_frame: u32,
    stats: FrameStats,
    last_frame: Option<Instant>,
}

impl FrameLoop {
    pub fn new(initial_scale: f32, updates_per_frame: u32) -> Self {
        Self {
            phase: Phase::Init,
            transform: TransformPipeline::new(initial_scale),
            initial_scale,
            updates_per_frame: updates_per_frame.clamp(1, MAX_UPDATES_PER_FRAME),
            stats: FrameStats::new(),
            last_frame: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn transform(&self) -> &TransformPipeline {
        &self.transform
    }

    pub fn updates_per_frame(&self) -> u32 {
        self.updates_per_frame
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Upload the initial camera and start running
    pub fn start<B: FrameBackend>(&mut self, backend: &mut B) {
        if self.phase != Phase::Init {
            return;
        }
        backend.apply_transform(&self.transform.current_matrices());
        self.phase = Phase::Running;
        self.last_frame = Some(Instant::now());
        log::info!("Frame loop running");
    }

    pub fn shutdown(&mut self) {
        if self.phase != Phase::ShuttingDown {
            log::info!("Shutting down after {} frames", self.stats.total_frames());
            self.phase = Phase::ShuttingDown;
        }
    }

    /// Run one frame.
    ///
    /// If `begin_frame` fails the frame is skipped (no dispatch, no swap)
    /// and the error is handed back.
    pub fn frame<B: FrameBackend>(
        &mut self,
        input: InputState,
        backend: &mut B,
    ) -> Result<FrameOutcome, B::Error> {
        if self.phase != Phase::Running {
            return Ok(FrameOutcome::Inactive);
        }

        if input.quit {
            self.shutdown();
            return Ok(FrameOutcome::Quit);
        }

        self.apply_input(&input, backend);

        backend.begin_frame()?;
        backend.dispatch_integration();
        backend.render();
        backend.swap();
        backend.present();

        let now = Instant::now();
        if let Some(last) = self.last_frame.replace(now) {
            self.stats.record(now - last);
        }
        log::trace!("frame {} presented", self.stats.total_frames());

        Ok(FrameOutcome::Presented)
    }

    fn apply_input<B: FrameBackend>(&mut self, input: &InputState, backend: &mut B) {
        if input.moves_camera() {
            if input.reset {
                self.transform.reset(self.initial_scale);
                log::info!("Camera reset");
            }
            self.transform.apply_zoom(input.zoom);
            self.transform.apply_pan(input.pan.x, input.pan.y);
            self.transform.apply_rotation(input.rotate.x, input.rotate.y);
            backend.apply_transform(&self.transform.current_matrices());
        }

        if input.updates_delta != 0 {
            let updates = (self.updates_per_frame as i64 + input.updates_delta as i64)
                .clamp(1, MAX_UPDATES_PER_FRAME as i64) as u32;
            if updates != self.updates_per_frame {
                self.updates_per_frame = updates;
                backend.set_updates_per_frame(updates);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Controls, KeyTracker};
    use glam::Vec2;
    use winit::keyboard::KeyCode;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Transform(TransformMatrices),
        Updates(u32),
        Begin,
        Dispatch,
        Render,
        Swap,
        Present,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        fail_begin: bool,
    }

    impl FrameBackend for Recorder {
        type Error = &'static str;

        fn apply_transform(&mut self, matrices: &TransformMatrices) {
            self.calls.push(Call::Transform(*matrices));
        }

        fn set_updates_per_frame(&mut self, updates_per_frame: u32) {
            self.calls.push(Call::Updates(updates_per_frame));
        }

        fn begin_frame(&mut self) -> Result<(), Self::Error> {
            if self.fail_begin {
                return Err("surface lost");
            }
            self.calls.push(Call::Begin);
            Ok(())
        }

        fn dispatch_integration(&mut self) {
            self.calls.push(Call::Dispatch);
        }

        fn render(&mut self) {
            self.calls.push(Call::Render);
        }

        fn swap(&mut self) {
            self.calls.push(Call::Swap);
        }

        fn present(&mut self) {
            self.calls.push(Call::Present);
        }
    }

    fn running() -> (FrameLoop, Recorder) {
        let mut frame_loop = FrameLoop::new(70.0, 5);
        let mut backend = Recorder::default();
        frame_loop.start(&mut backend);
        backend.calls.clear();
        (frame_loop, backend)
    }

    #[test]
    fn test_start_uploads_initial_transform() {
        let mut frame_loop = FrameLoop::new(70.0, 5);
        let mut backend = Recorder::default();
        assert_eq!(frame_loop.phase(), Phase::Init);

        frame_loop.start(&mut backend);
        assert_eq!(frame_loop.phase(), Phase::Running);
        assert_eq!(backend.calls.len(), 1);
        assert!(matches!(backend.calls[0], Call::Transform(m) if m.scale == 70.0));

        // Starting twice does nothing
        frame_loop.start(&mut backend);
        assert_eq!(backend.calls.len(), 1);
    }

    #[test]
    fn test_frame_before_start_is_inactive() {
        let mut frame_loop = FrameLoop::new(70.0, 5);
        let mut backend = Recorder::default();
        let outcome = frame_loop.frame(InputState::default(), &mut backend);
        assert_eq!(outcome, Ok(FrameOutcome::Inactive));
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_frame_ordering() {
        let (mut frame_loop, mut backend) = running();
        let outcome = frame_loop.frame(InputState::default(), &mut backend);

        assert_eq!(outcome, Ok(FrameOutcome::Presented));
        assert_eq!(
            backend.calls,
            vec![
                Call::Begin,
                Call::Dispatch,
                Call::Render,
                Call::Swap,
                Call::Present
            ]
        );
    }

    #[test]
    fn test_idle_frames_leave_transform_untouched() {
        let (mut frame_loop, mut backend) = running();
        let before = frame_loop.transform().clone();

        for _ in 0..50 {
            frame_loop
                .frame(InputState::default(), &mut backend)
                .unwrap();
        }

        let after = frame_loop.transform();
        assert_eq!(after.scale(), before.scale());
        assert_eq!(after.angles(), before.angles());
        assert_eq!(after.translation(), before.translation());
        assert!(!backend
            .calls
            .iter()
            .any(|c| matches!(c, Call::Transform(_) | Call::Updates(_))));
        assert_eq!(
            backend.calls.iter().filter(|c| **c == Call::Swap).count(),
            50
        );
    }

    #[test]
    fn test_quit_before_dispatch() {
        let (mut frame_loop, mut backend) = running();
        let input = InputState {
            quit: true,
            zoom: 2.0,
            ..Default::default()
        };

        assert_eq!(
            frame_loop.frame(input, &mut backend),
            Ok(FrameOutcome::Quit)
        );
        assert_eq!(frame_loop.phase(), Phase::ShuttingDown);
        assert!(backend.calls.is_empty());

        // Terminal
        assert_eq!(
            frame_loop.frame(InputState::default(), &mut backend),
            Ok(FrameOutcome::Inactive)
        );
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_close_request_quits_through_frame() {
        let (mut frame_loop, mut backend) = running();
        let mut keys = KeyTracker::new();
        keys.handle_key(KeyCode::KeyW, true);
        keys.request_quit();

        let input = keys.take_input(&Controls::default());
        assert_eq!(frame_loop.frame(input, &mut backend), Ok(FrameOutcome::Quit));
        assert_eq!(frame_loop.phase(), Phase::ShuttingDown);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_camera_input_uploads_before_frame() {
        let (mut frame_loop, mut backend) = running();
        let input = InputState {
            zoom: 0.5,
            pan: Vec2::new(0.1, 0.0),
            rotate: Vec2::new(0.2, 0.0),
            ..Default::default()
        };

        frame_loop.frame(input, &mut backend).unwrap();

        assert_eq!(frame_loop.transform().scale(), 35.0);
        assert!(matches!(backend.calls[0], Call::Transform(m) if m.scale == 35.0));
        assert_eq!(backend.calls[1], Call::Begin);
    }

    #[test]
    fn test_reset_restores_initial_camera() {
        let (mut frame_loop, mut backend) = running();
        let moved = InputState {
            zoom: 3.0,
            pan: Vec2::new(0.5, 0.5),
            rotate: Vec2::new(1.0, 1.0),
            ..Default::default()
        };
        frame_loop.frame(moved, &mut backend).unwrap();

        let reset = InputState {
            reset: true,
            ..Default::default()
        };
        frame_loop.frame(reset, &mut backend).unwrap();

        let transform = frame_loop.transform();
        assert_eq!(transform.scale(), 70.0);
        assert_eq!(transform.angles(), (0.0, 0.0));
        assert_eq!(transform.translation(), Vec2::ZERO);
    }

    #[test]
    fn test_updates_per_frame_clamped() {
        let mut frame_loop = FrameLoop::new(70.0, 1);
        let mut backend = Recorder::default();
        frame_loop.start(&mut backend);
        backend.calls.clear();

        let fewer = InputState {
            updates_delta: -1,
            ..Default::default()
        };
        frame_loop.frame(fewer, &mut backend).unwrap();
        assert_eq!(frame_loop.updates_per_frame(), 1);
        assert!(!backend.calls.iter().any(|c| matches!(c, Call::Updates(_))));

        let more = InputState {
            updates_delta: 1,
            ..Default::default()
        };
        frame_loop.frame(more, &mut backend).unwrap();
        assert_eq!(frame_loop.updates_per_frame(), 2);
        assert!(backend.calls.contains(&Call::Updates(2)));
    }

    #[test]
    fn test_failed_acquire_skips_frame() {
        let (mut frame_loop, mut backend) = running();
        backend.fail_begin = true;

        assert_eq!(
            frame_loop.frame(InputState::default(), &mut backend),
            Err("surface lost")
        );
        assert!(backend.calls.is_empty());
        assert_eq!(frame_loop.phase(), Phase::Running);
        assert_eq!(frame_loop.stats().total_frames(), 0);
    }

    #[test]
    fn test_frames_are_counted() {
        let (mut frame_loop, mut backend) = running();
        for _ in 0..3 {
            frame_loop
                .frame(InputState::default(), &mut backend)
                .unwrap();
        }
        assert_eq!(frame_loop.stats().total_frames(), 3);
    }
}
