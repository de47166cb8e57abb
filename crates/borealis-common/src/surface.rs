//! Render-surface contract.
//!
//! Effects never talk to a concrete backend; they emit a drawing-call
//! sequence against the [`Surface`] trait. The scene acquires one surface per
//! named render target through a [`SurfaceProvider`]. [`RecordingSurface`]
//! captures the command stream for tests, [`NullSurface`] discards it for
//! headless runs.

use glam::Vec2;

use crate::color::Rgba;
use crate::error::{EffectError, EffectResult};

/// How a shape is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    /// Uniform color fill.
    Solid(Rgba),
    /// Vertical linear gradient between two y coordinates.
    VerticalGradient {
        /// Color at `from_y`
        top: Rgba,
        /// Color at `to_y`
        bottom: Rgba,
        /// Gradient start y
        from_y: f32,
        /// Gradient end y
        to_y: f32,
    },
}

/// Styling applied to a drawing call.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    /// Fill style
    pub fill: Fill,
    /// Stroke width for line/path strokes
    pub stroke_width: f32,
    /// Blur radius (0 = sharp)
    pub blur: f32,
    /// Optional glow color (rendered as a soft shadow)
    pub glow: Option<Rgba>,
}

impl Paint {
    /// Solid fill with no stroke, blur, or glow.
    #[must_use]
    pub const fn fill(color: Rgba) -> Self {
        Self {
            fill: Fill::Solid(color),
            stroke_width: 1.0,
            blur: 0.0,
            glow: None,
        }
    }

    /// Solid stroke paint with the given line width.
    #[must_use]
    pub const fn stroke(color: Rgba, width: f32) -> Self {
        Self {
            fill: Fill::Solid(color),
            stroke_width: width,
            blur: 0.0,
            glow: None,
        }
    }

    /// Vertical gradient fill spanning `from_y..to_y`.
    #[must_use]
    pub const fn gradient(top: Rgba, bottom: Rgba, from_y: f32, to_y: f32) -> Self {
        Self {
            fill: Fill::VerticalGradient {
                top,
                bottom,
                from_y,
                to_y,
            },
            stroke_width: 1.0,
            blur: 0.0,
            glow: None,
        }
    }

    /// Adds a blur radius.
    #[must_use]
    pub const fn with_blur(mut self, blur: f32) -> Self {
        self.blur = blur;
        self
    }

    /// Adds a glow color.
    #[must_use]
    pub const fn with_glow(mut self, glow: Rgba) -> Self {
        self.glow = Some(glow);
        self
    }
}

/// A drawing surface sized to the viewport.
///
/// One tick fully clears and redraws the surface, so no partial-frame cleanup
/// is ever needed.
pub trait Surface {
    /// Clears the full `width` x `height` rectangle.
    fn clear(&mut self, width: f32, height: f32) -> EffectResult<()>;

    /// Fills a closed polygon.
    fn fill_path(&mut self, points: &[Vec2], paint: &Paint) -> EffectResult<()>;

    /// Strokes an open polyline.
    fn stroke_path(&mut self, points: &[Vec2], paint: &Paint) -> EffectResult<()>;

    /// Strokes a single line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, paint: &Paint) -> EffectResult<()>;

    /// Fills a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) -> EffectResult<()>;

    /// Draws a single glyph at `pos`, rotated around its origin.
    fn draw_glyph(
        &mut self,
        glyph: char,
        pos: Vec2,
        size: f32,
        rotation: f32,
        paint: &Paint,
    ) -> EffectResult<()>;
}

/// Acquires drawing surfaces for named render targets.
pub trait SurfaceProvider {
    /// Returns a surface for `target` at the given viewport size, or an
    /// error when the target is absent or the surface cannot be created.
    fn acquire(
        &mut self,
        target: &str,
        width: f32,
        height: f32,
    ) -> EffectResult<Box<dyn Surface>>;
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Full-surface clear
    Clear {
        /// Cleared width
        width: f32,
        /// Cleared height
        height: f32,
    },
    /// Filled polygon
    FillPath {
        /// Polygon points
        points: Vec<Vec2>,
        /// Applied paint
        paint: Paint,
    },
    /// Stroked polyline
    StrokePath {
        /// Polyline points
        points: Vec<Vec2>,
        /// Applied paint
        paint: Paint,
    },
    /// Stroked line segment
    StrokeLine {
        /// Segment start
        from: Vec2,
        /// Segment end
        to: Vec2,
        /// Applied paint
        paint: Paint,
    },
    /// Filled circle
    FillCircle {
        /// Circle center
        center: Vec2,
        /// Circle radius
        radius: f32,
        /// Applied paint
        paint: Paint,
    },
    /// Glyph draw
    Glyph {
        /// Drawn character
        glyph: char,
        /// Draw position
        pos: Vec2,
        /// Font size
        size: f32,
        /// Rotation in radians
        rotation: f32,
        /// Applied paint
        paint: Paint,
    },
}

/// Surface that records every drawing call for assertions.
///
/// Can be armed to fail after a number of successful calls, which exercises
/// the partial-tick error path.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    fail_after: Option<usize>,
    calls: usize,
}

impl RecordingSurface {
    /// Creates an empty recording surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the surface to fail every call after `calls` successful ones.
    #[must_use]
    pub fn failing_after(calls: usize) -> Self {
        Self {
            fail_after: Some(calls),
            ..Self::default()
        }
    }

    /// Recorded commands, in call order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drops all recorded commands.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.calls = 0;
    }

    fn record(&mut self, command: DrawCommand) -> EffectResult<()> {
        if let Some(limit) = self.fail_after {
            if self.calls >= limit {
                return Err(EffectError::Draw(format!(
                    "recording surface armed to fail after {limit} calls"
                )));
            }
        }
        self.calls += 1;
        self.commands.push(command);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f32, height: f32) -> EffectResult<()> {
        self.record(DrawCommand::Clear { width, height })
    }

    fn fill_path(&mut self, points: &[Vec2], paint: &Paint) -> EffectResult<()> {
        self.record(DrawCommand::FillPath {
            points: points.to_vec(),
            paint: paint.clone(),
        })
    }

    fn stroke_path(&mut self, points: &[Vec2], paint: &Paint) -> EffectResult<()> {
        self.record(DrawCommand::StrokePath {
            points: points.to_vec(),
            paint: paint.clone(),
        })
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, paint: &Paint) -> EffectResult<()> {
        self.record(DrawCommand::StrokeLine {
            from,
            to,
            paint: paint.clone(),
        })
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) -> EffectResult<()> {
        self.record(DrawCommand::FillCircle {
            center,
            radius,
            paint: paint.clone(),
        })
    }

    fn draw_glyph(
        &mut self,
        glyph: char,
        pos: Vec2,
        size: f32,
        rotation: f32,
        paint: &Paint,
    ) -> EffectResult<()> {
        self.record(DrawCommand::Glyph {
            glyph,
            pos,
            size,
            rotation,
            paint: paint.clone(),
        })
    }
}

/// Surface that accepts and discards every call. Used for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn clear(&mut self, _width: f32, _height: f32) -> EffectResult<()> {
        Ok(())
    }

    fn fill_path(&mut self, _points: &[Vec2], _paint: &Paint) -> EffectResult<()> {
        Ok(())
    }

    fn stroke_path(&mut self, _points: &[Vec2], _paint: &Paint) -> EffectResult<()> {
        Ok(())
    }

    fn stroke_line(&mut self, _from: Vec2, _to: Vec2, _paint: &Paint) -> EffectResult<()> {
        Ok(())
    }

    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _paint: &Paint) -> EffectResult<()> {
        Ok(())
    }

    fn draw_glyph(
        &mut self,
        _glyph: char,
        _pos: Vec2,
        _size: f32,
        _rotation: f32,
        _paint: &Paint,
    ) -> EffectResult<()> {
        Ok(())
    }
}

/// Provider that hands out [`NullSurface`] for every target.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProvider;

impl SurfaceProvider for NullProvider {
    fn acquire(
        &mut self,
        _target: &str,
        _width: f32,
        _height: f32,
    ) -> EffectResult<Box<dyn Surface>> {
        Ok(Box::new(NullSurface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface_records_in_order() {
        let mut surface = RecordingSurface::new();
        surface.clear(100.0, 100.0).expect("clear");
        surface
            .draw_glyph('❄', Vec2::new(5.0, 5.0), 12.0, 0.3, &Paint::fill(Rgba::WHITE))
            .expect("glyph");

        assert!(matches!(surface.commands()[0], DrawCommand::Clear { .. }));
        assert!(matches!(
            surface.commands()[1],
            DrawCommand::Glyph { glyph: '❄', .. }
        ));
    }

    #[test]
    fn test_recording_surface_armed_failure() {
        let mut surface = RecordingSurface::failing_after(1);
        assert!(surface.clear(10.0, 10.0).is_ok());
        assert!(surface.clear(10.0, 10.0).is_err());
        assert_eq!(surface.commands().len(), 1);
    }

    #[test]
    fn test_null_surface_accepts_everything() {
        let mut surface = NullSurface;
        assert!(surface.clear(1.0, 1.0).is_ok());
        assert!(surface
            .fill_circle(Vec2::ZERO, 1.0, &Paint::fill(Rgba::WHITE))
            .is_ok());
    }

    #[test]
    fn test_paint_builders() {
        let paint = Paint::fill(Rgba::WHITE).with_blur(4.0).with_glow(Rgba::WHITE);
        assert!((paint.blur - 4.0).abs() < f32::EPSILON);
        assert!(paint.glow.is_some());
    }
}
