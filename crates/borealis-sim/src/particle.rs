//! Snowflake particles and the randomized factory that produces them.
//!
//! A flake is created once and recycled in place: when it lands on the pile
//! or leaves the vertical bounds, `reset` resamples every attribute instead
//! of allocating a new particle.

use std::f32::consts::TAU;

use glam::Vec2;

use borealis_common::Rgba;

use crate::profile::LayerProfile;

/// Samples a uniform value in `[min, max)`.
pub(crate) fn uniform(rng: &mut fastrand::Rng, min: f32, max: f32) -> f32 {
    min + rng.f32() * (max - min)
}

/// One snowflake in a [`crate::layer::SnowLayer`].
#[derive(Debug, Clone)]
pub struct Snowflake {
    /// Position; unbounded until wrapped
    pub pos: Vec2,
    /// Glyph size in pixels
    pub size: f32,
    /// Vertical speed in pixels per tick
    pub fall_speed: f32,
    /// Sway amplitude in pixels
    pub sway_amplitude: f32,
    /// Sway phase advance per tick
    pub sway_speed: f32,
    /// Current sway phase in radians
    pub sway_phase: f32,
    /// Current rotation in radians
    pub rotation: f32,
    /// Rotation advance per tick
    pub rotation_speed: f32,
    /// Rendered glyph
    pub glyph: char,
    /// Flake color including the layer's alpha
    pub color: Rgba,
    /// Blur radius inherited from the layer
    pub blur: f32,
}

impl Snowflake {
    /// Creates a flake with every attribute sampled from the profile's
    /// ranges. `width` and `height` bound the spawn position: x anywhere in
    /// the viewport, y somewhere above it.
    #[must_use]
    pub fn spawn(
        profile: &LayerProfile,
        rng: &mut fastrand::Rng,
        width: f32,
        height: f32,
    ) -> Self {
        let size = uniform(rng, profile.size_min, profile.size_max);
        let fall_speed = size * profile.speed_factor + uniform(rng, 0.0, 0.3);
        let sway_amplitude = uniform(rng, profile.sway_amp_min, profile.sway_amp_max);
        let sway_speed = uniform(rng, 0.008, 0.023);

        let glyph = profile.glyphs[rng.usize(..profile.glyphs.len())];
        let variation = rng.u8(profile.color_variation_min..=profile.color_variation_max);
        let blue_shift = uniform(rng, 5.0, 15.0);

        Self {
            pos: Vec2::new(uniform(rng, 0.0, width), -uniform(rng, 0.0, height)),
            size,
            fall_speed,
            sway_amplitude,
            sway_speed,
            sway_phase: uniform(rng, 0.0, TAU),
            rotation: uniform(rng, 0.0, TAU),
            rotation_speed: uniform(rng, -0.0075, 0.0075),
            glyph,
            color: Rgba::blue_shifted(variation, blue_shift, profile.opacity),
            blur: profile.blur,
        }
    }

    /// Resamples every attribute in place. The flake re-enters from above
    /// the viewport at a random horizontal position.
    pub fn reset(
        &mut self,
        profile: &LayerProfile,
        rng: &mut fastrand::Rng,
        width: f32,
        height: f32,
    ) {
        *self = Self::spawn(profile, rng, width, height);
    }
}
