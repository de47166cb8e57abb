//! Layer profiles: the static configuration for each snowfall depth plane.
//!
//! Six profiles ship by default, ordered foreground to background. Going
//! deeper into the scene, flakes get smaller, slower, and fainter while blur
//! increases. `validate_depth_ordering` checks that invariant for any
//! profile table a deployment swaps in.

use serde::{Deserialize, Serialize};

/// Static configuration for one snowfall depth plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerProfile {
    /// Layer number, 1 = foreground
    pub layer: u32,
    /// Minimum flake size in pixels
    pub size_min: f32,
    /// Maximum flake size in pixels
    pub size_max: f32,
    /// Fall speed per pixel of flake size
    pub speed_factor: f32,
    /// Minimum sway amplitude in pixels
    pub sway_amp_min: f32,
    /// Maximum sway amplitude in pixels
    pub sway_amp_max: f32,
    /// Flake and pile alpha
    pub opacity: f32,
    /// Blur radius in pixels
    pub blur: f32,
    /// Lower bound of the blue-channel intensity (0-255)
    pub color_variation_min: u8,
    /// Upper bound of the blue-channel intensity (0-255)
    pub color_variation_max: u8,
    /// Glyphs a flake may render as
    pub glyphs: Vec<char>,
    /// Stacking order of the layer's render target
    pub z_index: i32,
}

impl LayerProfile {
    /// Returns the six builtin profiles, foreground first.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![
            Self {
                layer: 1,
                size_min: 20.0,
                size_max: 36.0,
                speed_factor: 0.10,
                sway_amp_min: 8.0,
                sway_amp_max: 25.0,
                opacity: 0.7,
                blur: 0.0,
                color_variation_min: 240,
                color_variation_max: 255,
                glyphs: vec!['•'],
                z_index: 50,
            },
            Self {
                layer: 2,
                size_min: 16.0,
                size_max: 24.0,
                speed_factor: 0.07,
                sway_amp_min: 8.0,
                sway_amp_max: 20.0,
                opacity: 0.65,
                blur: 2.0,
                color_variation_min: 230,
                color_variation_max: 245,
                glyphs: vec!['•'],
                z_index: 45,
            },
            Self {
                layer: 3,
                size_min: 12.0,
                size_max: 20.0,
                speed_factor: 0.05,
                sway_amp_min: 8.0,
                sway_amp_max: 18.0,
                opacity: 0.55,
                blur: 4.0,
                color_variation_min: 220,
                color_variation_max: 235,
                glyphs: vec!['•'],
                z_index: 35,
            },
            Self {
                layer: 4,
                size_min: 10.0,
                size_max: 16.0,
                speed_factor: 0.04,
                sway_amp_min: 8.0,
                sway_amp_max: 16.0,
                opacity: 0.45,
                blur: 5.0,
                color_variation_min: 210,
                color_variation_max: 225,
                glyphs: vec!['•'],
                z_index: 17,
            },
            Self {
                layer: 5,
                size_min: 8.0,
                size_max: 12.0,
                speed_factor: 0.02,
                sway_amp_min: 8.0,
                sway_amp_max: 15.0,
                opacity: 0.35,
                blur: 7.0,
                color_variation_min: 200,
                color_variation_max: 215,
                glyphs: vec!['•'],
                z_index: 16,
            },
            Self {
                layer: 6,
                size_min: 6.0,
                size_max: 10.0,
                speed_factor: 0.01,
                sway_amp_min: 8.0,
                sway_amp_max: 15.0,
                opacity: 0.25,
                blur: 15.0,
                color_variation_min: 190,
                color_variation_max: 205,
                glyphs: vec!['•'],
                z_index: 15,
            },
        ]
    }

    /// Checks that the profile's own ranges are ordered.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.size_min <= self.size_max
            && self.sway_amp_min <= self.sway_amp_max
            && self.color_variation_min <= self.color_variation_max
            && (0.0..=1.0).contains(&self.opacity)
            && self.blur >= 0.0
            && !self.glyphs.is_empty()
    }
}

/// Checks that a profile table is ordered foreground to background:
/// non-increasing size, speed factor, and opacity, non-decreasing blur.
#[must_use]
pub fn validate_depth_ordering(profiles: &[LayerProfile]) -> bool {
    profiles.windows(2).all(|pair| {
        let (front, back) = (&pair[0], &pair[1]);
        front.size_max >= back.size_max
            && front.speed_factor >= back.speed_factor
            && front.opacity >= back.opacity
            && front.blur <= back.blur
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_six_layers() {
        let profiles = LayerProfile::builtin();
        assert_eq!(profiles.len(), 6);
        for (i, profile) in profiles.iter().enumerate() {
            assert_eq!(profile.layer, i as u32 + 1);
            assert!(profile.is_well_formed());
        }
    }

    #[test]
    fn test_builtin_depth_ordering_is_monotonic() {
        assert!(validate_depth_ordering(&LayerProfile::builtin()));
    }

    #[test]
    fn test_depth_ordering_rejects_shuffled_table() {
        let mut profiles = LayerProfile::builtin();
        profiles.swap(0, 5);
        assert!(!validate_depth_ordering(&profiles));
    }

    #[test]
    fn test_malformed_profile_detected() {
        let mut profile = LayerProfile::builtin().remove(0);
        profile.size_min = 50.0;
        assert!(!profile.is_well_formed());
    }
}
