//! Frame timing

use std::collections::VecDeque;
use std::time::Duration;

const WINDOW: usize = 100;

/// Rolling frame times for the title bar, plus totals for the exit report
#[derive(Debug, Default)]
pub struct FrameStats {
    frame_times: VecDeque<Duration>,
    total_frames: u64,
    total_time: Duration,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(WINDOW),
            ..Default::default()
        }
    }

    pub fn record(&mut self, frame_time: Duration) {
        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > WINDOW {
            self.frame_times.pop_front();
        }
        self.total_frames += 1;
        self.total_time += frame_time;
    }

    /// Mean frame time over the rolling window, in milliseconds
    pub fn rolling_frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let sum: Duration = self.frame_times.iter().sum();
        sum.as_secs_f32() * 1000.0 / self.frame_times.len() as f32
    }

    pub fn rolling_fps(&self) -> f32 {
        let ms = self.rolling_frame_time_ms();
        if ms > 0.0 {
            1000.0 / ms
        } else {
            0.0
        }
    }

    pub fn average_fps(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if self.total_frames == 0 || secs <= 0.0 {
            0.0
        } else {
            self.total_frames as f64 / secs
        }
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_reports_zero() {
        let stats = FrameStats::new();
        assert_eq!(stats.rolling_fps(), 0.0);
        assert_eq!(stats.average_fps(), 0.0);
        assert_eq!(stats.total_frames(), 0);
    }

    #[test]
    fn test_steady_rate() {
        let mut stats = FrameStats::new();
        for _ in 0..10 {
            stats.record(Duration::from_millis(20));
        }
        assert!((stats.rolling_frame_time_ms() - 20.0).abs() < 1e-3);
        assert!((stats.rolling_fps() - 50.0).abs() < 1e-2);
        assert!((stats.average_fps() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_window_forgets_old_frames() {
        let mut stats = FrameStats::new();
        for _ in 0..WINDOW {
            stats.record(Duration::from_millis(100));
        }
        for _ in 0..WINDOW {
            stats.record(Duration::from_millis(10));
        }

        assert!((stats.rolling_fps() - 100.0).abs() < 1e-2);
        // 200 frames over 11 seconds
        assert!((stats.average_fps() - 200.0 / 11.0).abs() < 1e-9);
        assert_eq!(stats.total_frames(), 200);
    }
}
