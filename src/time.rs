//! Frame timing for the animation loop.
//!
//! The loop is paced by the host's display callback, so the clock does not
//! drive motion (particles move a fixed amount per frame). It only counts
//! frames and samples the frame rate for diagnostics.

use std::time::Duration;

// `std::time::Instant` panics on wasm32-unknown-unknown.
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Frame counter with a periodically sampled FPS.
#[derive(Debug)]
pub struct FrameClock {
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    /// Sample the frame rate every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: interval,
        }
    }

    /// Record one frame. Returns the new FPS sample when one was taken.
    pub fn tick(&mut self) -> Option<f32> {
        let now = Instant::now();
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            return Some(self.fps);
        }
        None
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Most recent FPS sample (0 until the first sample).
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_tick_counts_frames() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.tick();
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_fps_sampled_after_interval() {
        let mut clock = FrameClock::with_interval(Duration::from_millis(50));
        assert_eq!(clock.tick(), None);
        thread::sleep(Duration::from_millis(60));
        let sample = clock.tick().expect("interval elapsed");
        assert!(sample > 0.0);
        assert_eq!(clock.fps(), sample);
    }
}
