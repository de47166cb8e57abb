//! One snowfall depth plane: a particle set plus its accumulation surface.
//!
//! Each layer owns its flakes, its [`HeightField`], and a seeded RNG, and
//! advances the simulation by exactly one time-step per `advance` call:
//! draw, integrate, detect ground contact, deposit, recycle.

use glam::Vec2;
use tracing::debug;

use borealis_common::{EffectResult, Paint, Rgba, Surface};

use crate::heightfield::{HeightField, SEGMENT_WIDTH};
use crate::particle::{uniform, Snowflake};
use crate::profile::LayerProfile;
use crate::wind::Wind;

use std::f32::consts::TAU;

/// How far past the viewport edge a flake may drift before wrapping.
const WRAP_MARGIN: f32 = 50.0;

/// Scale applied to the wind reading when offsetting a flake visually.
const WIND_EFFECT: f32 = 0.7;

/// Fraction of the wind offset that becomes permanent horizontal drift.
const WIND_DRIFT: f32 = 0.3;

/// A single parallax snow layer.
#[derive(Debug)]
pub struct SnowLayer {
    profile: LayerProfile,
    width: f32,
    height: f32,
    flake_count: usize,
    flakes: Vec<Snowflake>,
    pile: HeightField,
    rng: fastrand::Rng,
}

impl SnowLayer {
    /// Builds a layer with `flake_count` flakes and a fresh height field at
    /// the given viewport size.
    #[must_use]
    pub fn new(
        profile: LayerProfile,
        flake_count: usize,
        width: f32,
        height: f32,
        mut rng: fastrand::Rng,
    ) -> Self {
        let pile = HeightField::new(width, height, &mut rng);
        let flakes = (0..flake_count)
            .map(|_| Snowflake::spawn(&profile, &mut rng, width, height))
            .collect();

        debug!(
            layer = profile.layer,
            flakes = flake_count,
            segments = pile.num_segments(),
            "created snow layer"
        );

        Self {
            profile,
            width,
            height,
            flake_count,
            flakes,
            pile,
            rng,
        }
    }

    /// The layer's profile.
    #[must_use]
    pub fn profile(&self) -> &LayerProfile {
        &self.profile
    }

    /// The layer's accumulation surface.
    #[must_use]
    pub fn pile(&self) -> &HeightField {
        &self.pile
    }

    /// The layer's current flakes.
    #[must_use]
    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    /// Advances the simulation by one tick, redrawing the full surface.
    ///
    /// A drawing error aborts the rest of this tick's particle updates; the
    /// next tick starts clean since every tick clears and redraws.
    pub fn advance(&mut self, wind: Wind, surface: &mut dyn Surface) -> EffectResult<()> {
        surface.clear(self.width, self.height)?;
        self.draw_pile(surface)?;

        let wind_effect = wind.drift() * WIND_EFFECT;

        for flake in &mut self.flakes {
            let sway = flake.sway_phase.sin() * flake.sway_amplitude;

            flake.rotation += flake.rotation_speed;

            let mut paint = Paint::fill(flake.color);
            if flake.blur > 0.0 {
                paint = paint.with_blur(flake.blur).with_glow(flake.color);
            }
            surface.draw_glyph(
                flake.glyph,
                Vec2::new(flake.pos.x + sway + wind_effect, flake.pos.y),
                flake.size,
                flake.rotation,
                &paint,
            )?;

            flake.pos.y += flake.fall_speed;
            flake.pos.x += wind_effect * WIND_DRIFT;
            flake.sway_phase += flake.sway_speed;

            // Ground contact against the pile at the visually effective x.
            let effective_x = flake.pos.x + sway + wind_effect;
            if flake.pos.y >= self.pile.height_at(effective_x) - flake.size / 2.0 {
                self.pile.deposit(effective_x, flake.size);
                flake.reset(&self.profile, &mut self.rng, self.width, self.height);
                continue;
            }

            if flake.pos.x > self.width + WRAP_MARGIN {
                flake.pos.x = -WRAP_MARGIN;
            } else if flake.pos.x < -WRAP_MARGIN {
                flake.pos.x = self.width + WRAP_MARGIN;
            }

            // Safety net: a flake that overshot the pile without contact
            // respawns above the viewport.
            if flake.pos.y > self.height + WRAP_MARGIN {
                flake.pos.y = -uniform(&mut self.rng, 0.0, self.height);
                flake.pos.x = uniform(&mut self.rng, 0.0, self.width);
                flake.sway_phase = uniform(&mut self.rng, 0.0, TAU);
            }
        }

        Ok(())
    }

    /// Rebuilds the height field and particle set at new viewport
    /// dimensions. In-flight particle positions are not preserved and
    /// accumulation restarts from zero.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.pile = HeightField::new(width, height, &mut self.rng);
        self.flakes = (0..self.flake_count)
            .map(|_| Snowflake::spawn(&self.profile, &mut self.rng, width, height))
            .collect();

        debug!(layer = self.profile.layer, width, height, "snow layer resized");
    }

    fn draw_pile(&self, surface: &mut dyn Surface) -> EffectResult<()> {
        let segments = self.pile.segments();
        let Some(&first) = segments.first() else {
            return Ok(());
        };

        let mut points = Vec::with_capacity(segments.len() + 3);
        points.push(Vec2::new(0.0, first));
        for (i, &h) in segments.iter().enumerate().skip(1) {
            points.push(Vec2::new(i as f32 * SEGMENT_WIDTH, h));
        }
        points.push(Vec2::new(self.width, segments[segments.len() - 1]));
        points.push(Vec2::new(self.width, self.height));
        points.push(Vec2::new(0.0, self.height));

        let opacity = self.profile.opacity;
        let paint = Paint::gradient(
            Rgba::new(180, 194, 223, opacity * 0.9),
            Rgba::new(160, 175, 207, opacity),
            self.height - 50.0,
            self.height,
        );
        surface.fill_path(&points, &paint)?;

        // Only the foreground layer gets a crisp outline.
        if self.profile.layer == 1 {
            let outline = Paint::stroke(Rgba::new(140, 156, 194, 0.4), 1.0);
            surface.stroke_path(&points, &outline)?;
        }

        Ok(())
    }
}
