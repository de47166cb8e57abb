//! Wind state shared by every snow layer.
//!
//! A single [`WindSystem`] owns the current wind and resamples it on a
//! countdown interval inside `update`, so no timers are involved and tests
//! can step it deterministically. Layers read a [`Wind`] copy once per tick.

use crate::particle::uniform;

/// Horizontal wind direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindDirection {
    /// Blowing toward negative x
    Left,
    /// Blowing toward positive x
    #[default]
    Right,
}

impl WindDirection {
    /// Sign of the direction: -1.0 for left, +1.0 for right.
    #[must_use]
    pub fn signum(self) -> f32 {
        match self {
            WindDirection::Left => -1.0,
            WindDirection::Right => 1.0,
        }
    }
}

/// A wind reading: direction and speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wind {
    /// Current direction
    pub direction: WindDirection,
    /// Speed in `[0.1, 0.7)`
    pub speed: f32,
}

impl Wind {
    /// Signed horizontal push, `speed * direction`.
    #[must_use]
    pub fn drift(&self) -> f32 {
        self.speed * self.direction.signum()
    }
}

/// Periodically resamples the wind.
#[derive(Debug)]
pub struct WindSystem {
    wind: Wind,
    shift_interval: f32,
    time_until_shift: f32,
    rng: fastrand::Rng,
}

impl WindSystem {
    /// Creates a wind system that resamples every `shift_interval` seconds,
    /// starting from a freshly sampled wind.
    #[must_use]
    pub fn new(shift_interval: f32, mut rng: fastrand::Rng) -> Self {
        let wind = Self::sample(&mut rng);
        Self {
            wind,
            shift_interval,
            time_until_shift: shift_interval,
            rng,
        }
    }

    /// Current wind reading.
    #[must_use]
    pub fn wind(&self) -> Wind {
        self.wind
    }

    /// Advances the countdown; resamples direction and speed when it
    /// expires.
    pub fn update(&mut self, dt: f32) {
        self.time_until_shift -= dt;
        if self.time_until_shift <= 0.0 {
            self.wind = Self::sample(&mut self.rng);
            self.time_until_shift = self.shift_interval;
        }
    }

    fn sample(rng: &mut fastrand::Rng) -> Wind {
        Wind {
            direction: if rng.bool() {
                WindDirection::Right
            } else {
                WindDirection::Left
            },
            speed: uniform(rng, 0.1, 0.7),
        }
    }
}
