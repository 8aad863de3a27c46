//! Variable-step frame clock.
//!
//! The simulation runs exactly one tick per displayed frame. [`FrameClock`]
//! measures the time since the previous frame and hands it to that tick. The
//! flight model applies its own, tighter cap on the step it integrates; the
//! clock only clamps pathological gaps (window suspended, debugger attached)
//! so that the session clock does not leap ahead.

use std::time::{Duration, Instant};
use tracing::warn;

/// Frame time used by headless runs: 60 Hz.
pub const HEADLESS_DT: Duration = Duration::from_nanos(16_666_667);

/// Longest frame the session clock will advance by.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(250);

/// Measures frame-to-frame time and drives one tick per frame.
pub struct FrameClock {
    previous_time: Instant,
    total_time: Duration,
    frame_count: u64,
    clamped_frames: u64,
}

impl FrameClock {
    /// Creates a new `FrameClock` starting from the current instant.
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            total_time: Duration::ZERO,
            frame_count: 0,
            clamped_frames: 0,
        }
    }

    /// Measures the wall time since the last frame and calls `frame_fn` once
    /// with the (clamped) frame time. Returns the time passed to `frame_fn`.
    pub fn tick(&mut self, frame_fn: impl FnOnce(Duration)) -> Duration {
        let current_time = Instant::now();
        let frame_time = current_time.duration_since(self.previous_time);
        self.previous_time = current_time;
        self.advance(frame_time, frame_fn)
    }

    /// Runs one frame with an explicit frame time instead of the wall clock.
    pub fn advance(&mut self, frame_time: Duration, frame_fn: impl FnOnce(Duration)) -> Duration {
        let dt = if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time.as_secs_f64() * 1000.0,
                MAX_FRAME_TIME.as_secs_f64() * 1000.0
            );
            self.clamped_frames += 1;
            MAX_FRAME_TIME
        } else {
            frame_time
        };

        frame_fn(dt);
        self.total_time += dt;
        self.frame_count += 1;
        dt
    }

    /// Restart measurement from now, discarding the time since the last
    /// frame. Used when the window regains focus after being idle.
    pub fn restart(&mut self) {
        self.previous_time = Instant::now();
    }

    /// Returns the total number of frames run.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Returns how many frames were clamped to [`MAX_FRAME_TIME`].
    pub fn clamped_frames(&self) -> u64 {
        self.clamped_frames
    }

    /// Sum of all frame times handed out.
    pub fn total_time(&self) -> Duration {
        self.total_time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
