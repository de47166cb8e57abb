//! Ambient decorative effects sharing the scheduler with the snow layers.
//!
//! These are the simple particle systems: a single-surface ambient snowfall,
//! a twinkling star field, a shooting-star spawner, and the moon-phase
//! shading value. None of them carry accumulation state; they redraw from
//! scratch every tick.

use std::f32::consts::{FRAC_PI_4, FRAC_PI_8, TAU};

use glam::Vec2;

use borealis_common::{EffectResult, Paint, Rgba, Surface};

use crate::particle::uniform;

/// A flake in the ambient (non-accumulating) snowfall.
#[derive(Debug, Clone)]
struct AmbientFlake {
    pos: Vec2,
    radius: f32,
    speed: f32,
    opacity: f32,
    x_movement: f32,
    blur: f32,
    glow: bool,
    blue_shift: f32,
}

impl AmbientFlake {
    fn spawn(rng: &mut fastrand::Rng, width: f32, height: f32) -> Self {
        // 80% small slow flakes, 20% large fast ones with blur.
        let small = rng.f32() < 0.8;
        Self {
            pos: Vec2::new(
                uniform(rng, 0.0, width),
                uniform(rng, 0.0, height) - height,
            ),
            radius: if small {
                uniform(rng, 0.3, 1.8)
            } else {
                uniform(rng, 1.5, 4.5)
            },
            speed: if small {
                uniform(rng, 0.2, 0.6)
            } else {
                uniform(rng, 0.4, 1.6)
            },
            opacity: if small {
                uniform(rng, 0.15, 0.65)
            } else {
                uniform(rng, 0.1, 0.35)
            },
            x_movement: uniform(rng, -0.75, 0.75),
            blur: if small { 0.0 } else { uniform(rng, 0.5, 2.0) },
            glow: rng.f32() > 0.85,
            blue_shift: uniform(rng, 10.0, 30.0),
        }
    }
}

/// Simple full-viewport snowfall without accumulation.
#[derive(Debug)]
pub struct AmbientSnow {
    width: f32,
    height: f32,
    flakes: Vec<AmbientFlake>,
    flake_count: usize,
    rng: fastrand::Rng,
}

impl AmbientSnow {
    /// Creates the ambient snowfall with `flake_count` flakes.
    #[must_use]
    pub fn new(flake_count: usize, width: f32, height: f32, mut rng: fastrand::Rng) -> Self {
        let flakes = (0..flake_count)
            .map(|_| AmbientFlake::spawn(&mut rng, width, height))
            .collect();
        Self {
            width,
            height,
            flakes,
            flake_count,
            rng,
        }
    }

    /// Number of live flakes.
    #[must_use]
    pub fn flake_count(&self) -> usize {
        self.flakes.len()
    }

    /// Advances and redraws every flake.
    pub fn advance(&mut self, surface: &mut dyn Surface) -> EffectResult<()> {
        surface.clear(self.width, self.height)?;

        for flake in &mut self.flakes {
            flake.pos.y += flake.speed;
            flake.pos.x += flake.x_movement * 0.4 + (flake.pos.y * 0.008).sin() * 0.2;

            if flake.pos.y > self.height {
                flake.pos.y = -10.0;
                flake.pos.x = uniform(&mut self.rng, 0.0, self.width);
            }

            if flake.pos.x > self.width {
                flake.pos.x = 0.0;
            } else if flake.pos.x < 0.0 {
                flake.pos.x = self.width;
            }

            let color = Rgba::blue_shifted(255, flake.blue_shift, flake.opacity);
            let mut paint = Paint::fill(color).with_blur(flake.blur);
            if flake.glow {
                paint = paint.with_glow(Rgba::new(173, 216, 230, 0.6));
            }
            surface.fill_circle(flake.pos, flake.radius, &paint)?;
        }

        Ok(())
    }

    /// Discards all flakes and respawns them at new viewport dimensions.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.flakes = (0..self.flake_count)
            .map(|_| AmbientFlake::spawn(&mut self.rng, width, height))
            .collect();
    }
}

/// One twinkling star.
#[derive(Debug, Clone)]
struct Star {
    pos: Vec2,
    size: f32,
    opacity: f32,
    twinkle_speed: f32,
    twinkle_phase: f32,
    color: Rgba,
}

/// Ambient star field in the upper part of the viewport.
#[derive(Debug)]
pub struct StarField {
    width: f32,
    height: f32,
    density_scale: f32,
    stars: Vec<Star>,
    rng: fastrand::Rng,
}

impl StarField {
    /// Creates a star field. `density_scale` scales the star count
    /// (1.0 desktop, 0.6 mobile).
    #[must_use]
    pub fn new(density_scale: f32, width: f32, height: f32, rng: fastrand::Rng) -> Self {
        let mut field = Self {
            width,
            height,
            density_scale,
            stars: Vec::new(),
            rng,
        };
        field.populate();
        field
    }

    fn populate(&mut self) {
        let count = ((self.width * self.height / 8000.0).floor() * self.density_scale) as usize;
        self.stars.clear();
        for _ in 0..count {
            let rng = &mut self.rng;
            // 30% of stars get a cool hue tint instead of plain white.
            let color = if rng.f32() > 0.7 {
                Rgba::new(150, 190, 235, 1.0)
            } else {
                let v = rng.u8(204..=255);
                Rgba::new(v, v, v, 1.0)
            };
            self.stars.push(Star {
                pos: Vec2::new(
                    uniform(rng, 0.0, self.width),
                    uniform(rng, 0.0, self.height * 0.75),
                ),
                size: uniform(rng, 0.3, 1.8),
                opacity: uniform(rng, 0.2, 1.0),
                twinkle_speed: uniform(rng, 0.002, 0.01),
                twinkle_phase: uniform(rng, 0.0, TAU),
                color,
            });
        }
    }

    /// Number of stars in the field.
    #[must_use]
    pub fn star_count(&self) -> usize {
        self.stars.len()
    }

    /// Advances every star's twinkle phase and redraws the field.
    pub fn advance(&mut self, surface: &mut dyn Surface) -> EffectResult<()> {
        surface.clear(self.width, self.height)?;

        for star in &mut self.stars {
            star.twinkle_phase += star.twinkle_speed;
            let twinkle = 0.4 + 0.6 * star.twinkle_phase.sin();

            let color = star.color.with_alpha(star.opacity * twinkle.max(0.0));
            let paint = Paint::fill(color)
                .with_blur(star.size * 3.0)
                .with_glow(star.color);
            surface.fill_circle(star.pos, star.size, &paint)?;
        }

        Ok(())
    }

    /// Regenerates the field at new viewport dimensions.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.populate();
    }
}

/// A shooting star streaking across the upper sky.
#[derive(Debug, Clone)]
struct ShootingStar {
    pos: Vec2,
    length: f32,
    speed: f32,
    angle: f32,
    opacity: f32,
    trail: Vec<Vec2>,
    color: Rgba,
}

impl ShootingStar {
    fn spawn(rng: &mut fastrand::Rng, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(uniform(rng, 0.0, width), uniform(rng, 0.0, height * 0.4)),
            length: uniform(rng, 60.0, 160.0),
            speed: uniform(rng, 8.0, 20.0),
            angle: FRAC_PI_4 + uniform(rng, -0.5, 0.5) * FRAC_PI_8,
            opacity: 1.0,
            trail: Vec::new(),
            color: if rng.f32() > 0.6 {
                Rgba::new(173, 216, 230, 1.0)
            } else {
                Rgba::WHITE
            },
        }
    }

    /// Advances one tick; false when the star has faded or left the screen.
    fn update(&mut self, width: f32, height: f32) -> bool {
        self.trail.push(self.pos);
        if self.trail.len() > 25 {
            self.trail.remove(0);
        }

        self.pos.x += self.angle.cos() * self.speed;
        self.pos.y += self.angle.sin() * self.speed;
        self.opacity -= 0.015;

        self.opacity > 0.0 && self.pos.x < width && self.pos.y < height
    }
}

/// Spawns and animates shooting stars on a countdown interval.
#[derive(Debug)]
pub struct ShootingStars {
    width: f32,
    height: f32,
    stars: Vec<ShootingStar>,
    spawn_interval: f32,
    time_until_spawn: f32,
    rng: fastrand::Rng,
}

/// At most this many shooting stars are alive at once.
const MAX_SHOOTING_STARS: usize = 2;

impl ShootingStars {
    /// Creates the spawner; a new star appears every `spawn_interval`
    /// seconds while fewer than two are alive.
    #[must_use]
    pub fn new(spawn_interval: f32, width: f32, height: f32, rng: fastrand::Rng) -> Self {
        Self {
            width,
            height,
            stars: Vec::new(),
            spawn_interval,
            time_until_spawn: spawn_interval,
            rng,
        }
    }

    /// Number of live shooting stars.
    #[must_use]
    pub fn star_count(&self) -> usize {
        self.stars.len()
    }

    /// Advances the spawner countdown and every live star, then redraws.
    pub fn advance(&mut self, dt: f32, surface: &mut dyn Surface) -> EffectResult<()> {
        self.time_until_spawn -= dt;
        if self.time_until_spawn <= 0.0 {
            if self.stars.len() < MAX_SHOOTING_STARS {
                self.stars
                    .push(ShootingStar::spawn(&mut self.rng, self.width, self.height));
            }
            self.time_until_spawn = self.spawn_interval;
        }

        surface.clear(self.width, self.height)?;

        let (width, height) = (self.width, self.height);
        self.stars.retain_mut(|star| star.update(width, height));

        for star in &self.stars {
            Self::draw_star(star, surface)?;
        }
        Ok(())
    }

    fn draw_star(star: &ShootingStar, surface: &mut dyn Surface) -> EffectResult<()> {
        // Fading trail segments, then the bright gradient head.
        for (i, window) in star.trail.windows(2).enumerate() {
            let progress = (i + 1) as f32 / star.trail.len() as f32;
            let paint = Paint::stroke(
                star.color.with_alpha(progress * star.opacity * 0.6),
                3.0 * progress,
            );
            surface.stroke_line(window[0], window[1], &paint)?;
        }

        let tail = star.pos
            - Vec2::new(
                star.angle.cos() * star.length,
                star.angle.sin() * star.length,
            );
        let mut head = Paint::gradient(
            star.color.with_alpha(0.0),
            star.color.with_alpha(star.opacity),
            tail.y,
            star.pos.y,
        );
        head.stroke_width = 4.0;
        head = head.with_blur(10.0).with_glow(star.color.with_alpha(0.8));
        surface.stroke_line(tail, star.pos, &head)
    }

    /// Updates the viewport bounds; live stars keep flying.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}

/// Moon-phase shading value, advanced on its own slow cadence.
#[derive(Debug)]
pub struct MoonPhase {
    phase: f32,
    update_interval: f32,
    time_until_update: f32,
}

impl Default for MoonPhase {
    fn default() -> Self {
        Self::new()
    }
}

impl MoonPhase {
    /// Creates the moon at a new-moon phase.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            update_interval: 0.15,
            time_until_update: 0.15,
        }
    }

    /// Current phase in `[0, 1)`.
    #[must_use]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Advances the phase on its fixed cadence.
    pub fn update(&mut self, dt: f32) {
        self.time_until_update -= dt;
        while self.time_until_update <= 0.0 {
            self.phase = (self.phase + 0.005) % 1.0;
            self.time_until_update += self.update_interval;
        }
    }

    /// Signed shadow inset in pixels, in `[-25, 25]`.
    ///
    /// Negative values shade from the left, positive from the right.
    #[must_use]
    pub fn shadow_offset(&self) -> f32 {
        let signed = self.phase * 2.0 - 1.0;
        let magnitude = signed.abs() * 25.0;
        if signed < 0.0 {
            magnitude
        } else {
            -magnitude
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use borealis_common::{DrawCommand, NullSurface, RecordingSurface};

    #[test]
    fn test_ambient_snow_draws_every_flake() {
        let mut snow = AmbientSnow::new(40, 800.0, 600.0, fastrand::Rng::with_seed(1));
        let mut surface = RecordingSurface::new();
        snow.advance(&mut surface).expect("tick");

        let circles = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count();
        assert_eq!(circles, 40);
    }

    #[test]
    fn test_ambient_snow_respawns_past_bottom() {
        let mut snow = AmbientSnow::new(1, 800.0, 600.0, fastrand::Rng::with_seed(2));
        snow.flakes[0].pos.y = 601.0;
        snow.advance(&mut NullSurface).expect("tick");
        assert!((snow.flakes[0].pos.y - -10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_star_field_count_scales_with_area() {
        let field = StarField::new(1.0, 800.0, 600.0, fastrand::Rng::with_seed(3));
        assert_eq!(field.star_count(), 60);

        let scaled = StarField::new(0.6, 800.0, 600.0, fastrand::Rng::with_seed(3));
        assert_eq!(scaled.star_count(), 36);
    }

    #[test]
    fn test_stars_stay_in_upper_sky() {
        let field = StarField::new(1.0, 1000.0, 800.0, fastrand::Rng::with_seed(4));
        for star in &field.stars {
            assert!(star.pos.y < 800.0 * 0.75);
        }
    }

    #[test]
    fn test_shooting_star_spawns_on_interval() {
        let mut stars = ShootingStars::new(6.0, 1000.0, 800.0, fastrand::Rng::with_seed(5));
        stars.advance(1.0, &mut NullSurface).expect("tick");
        assert_eq!(stars.star_count(), 0);

        stars.advance(5.5, &mut NullSurface).expect("tick");
        assert_eq!(stars.star_count(), 1);
    }

    #[test]
    fn test_shooting_star_fades_out_and_is_removed() {
        let mut stars = ShootingStars::new(1000.0, 1000.0, 800.0, fastrand::Rng::with_seed(6));
        stars.time_until_spawn = 0.0;
        stars.advance(0.016, &mut NullSurface).expect("spawn tick");
        assert_eq!(stars.star_count(), 1);

        // Opacity drops by 0.015 per tick; 70 ticks fades it fully even if
        // it has not left the screen yet.
        for _ in 0..70 {
            stars.advance(0.016, &mut NullSurface).expect("tick");
        }
        assert_eq!(stars.star_count(), 0);
    }

    #[test]
    fn test_moon_phase_wraps_and_bounds_shadow() {
        let mut moon = MoonPhase::new();
        for _ in 0..500 {
            moon.update(0.15);
            assert!(moon.phase() >= 0.0 && moon.phase() < 1.0);
            assert!(moon.shadow_offset().abs() <= 25.0);
        }
    }

    #[test]
    fn test_moon_phase_cadence() {
        let mut moon = MoonPhase::new();
        // Below the interval: no advance yet.
        moon.update(0.1);
        assert!((moon.phase() - 0.0).abs() < f32::EPSILON);
        // Crossing it: exactly one step.
        moon.update(0.1);
        assert!((moon.phase() - 0.005).abs() < 1e-6);
    }
}
