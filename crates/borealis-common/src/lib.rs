//! # Borealis Common
//!
//! Common types and shared abstractions for the Borealis scene.
//!
//! This crate provides the foundations used across all Borealis subsystems:
//! - Error types for effect initialization and drawing
//! - The render-surface contract (the only wire format at the boundary is a
//!   drawing-call sequence)
//! - Color handling for the cool-toned night palette
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod error;
pub mod surface;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::error::*;
    pub use crate::surface::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blue_shift_palette_is_cool_toned() {
        let c = Rgba::blue_shifted(240, 10.0, 0.7);
        assert!(c.r <= c.g && c.g <= c.b);
        assert!((c.a - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_recording_surface_captures_commands() {
        let mut surface = RecordingSurface::new();
        surface
            .clear(800.0, 600.0)
            .and_then(|()| {
                surface.fill_circle(
                    glam::Vec2::new(10.0, 20.0),
                    2.0,
                    &Paint::fill(Rgba::WHITE),
                )
            })
            .expect("recording surface never fails unless armed");
        assert_eq!(surface.commands().len(), 2);
    }
}
