//! Frame timing for the real-time demo loop.
//!
//! Provides smoothed delta time, a frame limiter, and a lightweight FPS
//! counter for periodic logging. Tests never touch this module; they step
//! the scheduler directly.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frame timing manager.
#[derive(Debug)]
pub struct FrameTiming {
    /// Target frames per second
    target_fps: u32,
    /// Time budget per frame
    frame_budget: Duration,
    /// Time of last frame start
    last_frame: Instant,
    /// Maximum delta time to prevent spiral of death
    max_dt: f32,
    /// Recent frame times for averaging
    frame_times: VecDeque<f32>,
    /// Maximum samples for averaging
    max_samples: usize,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameTiming {
    /// Creates a frame timing manager targeting `target_fps`.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            target_fps,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            last_frame: Instant::now(),
            max_dt: 0.25,
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
        }
    }

    /// Calculates the delta time since the last frame, clamped to 250 ms,
    /// and stores it for FPS averaging.
    pub fn delta_time(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let clamped_dt = dt.min(self.max_dt);
        self.frame_times.push_back(clamped_dt);
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }

        clamped_dt
    }

    /// Sleeps for the remainder of the frame budget.
    pub fn sleep_remainder(&self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }

    /// Current FPS, averaged over recent frames.
    #[must_use]
    pub fn current_fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        let avg_frame_time: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;

        if avg_frame_time > 0.0 {
            1.0 / avg_frame_time
        } else {
            0.0
        }
    }

    /// The target FPS.
    #[must_use]
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Resets timing (call after a pause).
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.frame_times.clear();
    }
}

/// Simple FPS counter for periodic log lines.
#[derive(Debug)]
pub struct FpsCounter {
    /// Frame count since last update
    frame_count: u32,
    /// Time of last FPS calculation
    last_update: Instant,
    /// Update interval
    update_interval: Duration,
    /// Current FPS value
    current_fps: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    /// Creates a new FPS counter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            last_update: Instant::now(),
            update_interval: Duration::from_millis(500),
            current_fps: 0.0,
        }
    }

    /// Ticks the counter. Returns `Some(fps)` when a fresh value was just
    /// computed.
    pub fn tick(&mut self) -> Option<f32> {
        self.frame_count += 1;

        let elapsed = self.last_update.elapsed();
        if elapsed >= self.update_interval {
            self.current_fps = self.frame_count as f32 / elapsed.as_secs_f32();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(self.current_fps)
        } else {
            None
        }
    }

    /// The last computed FPS.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.current_fps
    }
}
