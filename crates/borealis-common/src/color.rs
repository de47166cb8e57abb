//! Color handling for the night-scene palette.

use serde::{Deserialize, Serialize};

/// An RGBA color. Channels are 0-255, alpha is 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
    /// Alpha (0.0-1.0)
    pub a: f32,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 1.0);

    /// Creates a color from channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a cool-toned color from a blue-channel intensity.
    ///
    /// The red channel is shifted down by the full `blue_shift`, the green
    /// channel by half of it, producing the blue-tinted snow palette.
    #[must_use]
    pub fn blue_shifted(intensity: u8, blue_shift: f32, alpha: f32) -> Self {
        let r = (f32::from(intensity) - blue_shift).max(0.0) as u8;
        let g = (f32::from(intensity) - blue_shift / 2.0).max(0.0) as u8;
        Self::new(r, g, intensity, alpha)
    }

    /// Returns this color with a different alpha.
    #[must_use]
    pub const fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blue_shift_ordering() {
        let c = Rgba::blue_shifted(200, 14.0, 0.5);
        assert_eq!(c.b, 200);
        assert_eq!(c.g, 193);
        assert_eq!(c.r, 186);
    }

    #[test]
    fn test_blue_shift_saturates_at_zero() {
        let c = Rgba::blue_shifted(4, 10.0, 1.0);
        assert_eq!(c.r, 0);
        assert_eq!(c.b, 4);
    }

    #[test]
    fn test_with_alpha() {
        let c = Rgba::WHITE.with_alpha(0.25);
        assert!((c.a - 0.25).abs() < f32::EPSILON);
    }
}
