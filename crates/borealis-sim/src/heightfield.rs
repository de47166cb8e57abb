//! Segmented snow-pile accumulation surface.
//!
//! One height value per fixed-width horizontal segment, measured downward
//! from the top of the viewport: a smaller value is a taller pile. Particles
//! deposit onto the field, deposits saturate as the pile grows, and repeated
//! 3-point averaging keeps the skyline smooth.

use crate::particle::uniform;

/// Horizontal width of one pile segment in pixels.
pub const SEGMENT_WIDTH: f32 = 5.0;

/// Cap on the saturation counter; deposits have no effect past it.
pub const MAX_ACCUMULATED: f32 = 40.0;

/// Initial pile baseline offset from the bottom of the viewport.
const BASELINE_OFFSET: f32 = 18.0;

/// The pile may never rise closer than this to the top of the viewport
/// bottom, i.e. heights are floored at `height - PILE_CEILING`.
const PILE_CEILING: f32 = 100.0;

/// How many segments on each side of a deposit receive spillover.
const SPREAD: usize = 2;

/// A one-dimensional accumulation surface spanning the viewport width.
#[derive(Debug, Clone)]
pub struct HeightField {
    heights: Vec<f32>,
    width: f32,
    height: f32,
    accumulated: f32,
}

impl HeightField {
    /// Builds a field of `ceil(width / SEGMENT_WIDTH)` segments with a
    /// randomized but smoothed skyline around `height - 18`.
    #[must_use]
    pub fn new(width: f32, height: f32, rng: &mut fastrand::Rng) -> Self {
        let num_segments = (width / SEGMENT_WIDTH).ceil() as usize;
        let baseline = height - BASELINE_OFFSET;
        let max_height = baseline + 8.0;
        let min_height = baseline - 15.0;

        let mut heights = Vec::with_capacity(num_segments);
        for j in 0..num_segments {
            if j == 0 {
                heights.push(baseline + uniform(rng, -4.0, 4.0));
            } else {
                let next = heights[j - 1] + uniform(rng, -2.5, 2.5);
                heights.push(next.clamp(min_height, max_height));
            }
        }

        let mut field = Self {
            heights,
            width,
            height,
            accumulated: 0.0,
        };
        field.smooth(3);
        field
    }

    /// Number of segments in the field.
    #[must_use]
    pub fn num_segments(&self) -> usize {
        self.heights.len()
    }

    /// Per-segment heights, for rendering the pile outline.
    #[must_use]
    pub fn segments(&self) -> &[f32] {
        &self.heights
    }

    /// Current saturation counter, in `[0, MAX_ACCUMULATED]`.
    #[must_use]
    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    /// Pile height at horizontal position `x`.
    ///
    /// Positions outside `[0, width)` return the full viewport height — the
    /// "no pile" sentinel, so off-screen particles never interact with pile
    /// logic.
    #[must_use]
    pub fn height_at(&self, x: f32) -> f32 {
        let index = (x / SEGMENT_WIDTH).floor();
        if index < 0.0 || index >= self.heights.len() as f32 {
            return self.height;
        }
        self.heights[index as usize]
    }

    /// Deposits a particle of the given size at `x`, raising the pile there
    /// and spilling onto the neighboring segments.
    ///
    /// Deposits saturate: as `accumulated` approaches [`MAX_ACCUMULATED`],
    /// each deposit raises the pile less. Returns the height delta applied to
    /// the primary segment (0.0 when `x` is out of range).
    pub fn deposit(&mut self, x: f32, size: f32) -> f32 {
        let index = (x / SEGMENT_WIDTH).floor();
        if index < 0.0 || index >= self.heights.len() as f32 {
            return 0.0;
        }
        let index = index as usize;

        self.accumulated = (self.accumulated + size * 0.008).min(MAX_ACCUMULATED);

        // Raising the pile means decreasing the height value.
        let delta = size * 0.4 * (1.0 - self.accumulated / MAX_ACCUMULATED);
        self.heights[index] -= delta;

        for i in 1..=SPREAD {
            if index >= i {
                self.heights[index - i] -= delta * 0.15;
            }
            if index + i < self.heights.len() {
                self.heights[index + i] -= delta * 0.15;
            }
        }

        let floor = self.height - PILE_CEILING;
        let lo = index.saturating_sub(SPREAD);
        let hi = (index + SPREAD).min(self.heights.len() - 1);
        for h in &mut self.heights[lo..=hi] {
            *h = h.max(floor);
        }

        self.smooth(1);
        delta
    }

    /// Runs `iterations` passes of 3-point box averaging over the interior
    /// segments. Edge segments are left untouched.
    pub fn smooth(&mut self, iterations: usize) {
        for _ in 0..iterations {
            let mut smoothed = self.heights.clone();
            for i in 1..self.heights.len().saturating_sub(1) {
                smoothed[i] =
                    (self.heights[i - 1] + self.heights[i] + self.heights[i + 1]) / 3.0;
            }
            self.heights = smoothed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field_1000x800(seed: u64) -> HeightField {
        let mut rng = fastrand::Rng::with_seed(seed);
        HeightField::new(1000.0, 800.0, &mut rng)
    }

    #[test]
    fn test_segment_count_matches_viewport() {
        let field = field_1000x800(1);
        assert_eq!(field.num_segments(), 200);

        let mut rng = fastrand::Rng::with_seed(1);
        let odd = HeightField::new(1003.0, 800.0, &mut rng);
        assert_eq!(odd.num_segments(), 201);
    }

    #[test]
    fn test_initial_heights_within_baseline_bounds() {
        let field = field_1000x800(2);
        let baseline = 800.0 - 18.0;
        for &h in field.segments() {
            assert!(h >= baseline - 15.0 - 0.001);
            assert!(h <= baseline + 8.0 + 0.001);
        }
    }

    #[test]
    fn test_initial_skyline_is_smooth() {
        let field = field_1000x800(3);
        for pair in field.segments().windows(2) {
            assert!((pair[0] - pair[1]).abs() <= 2.6);
        }
    }

    #[test]
    fn test_height_at_out_of_range_returns_sentinel() {
        let field = field_1000x800(4);
        assert!((field.height_at(-1.0) - 800.0).abs() < f32::EPSILON);
        assert!((field.height_at(1000.0) - 800.0).abs() < f32::EPSILON);
        assert!((field.height_at(5000.0) - 800.0).abs() < f32::EPSILON);
        assert!(field.height_at(500.0) < 800.0);
    }

    #[test]
    fn test_deposit_out_of_range_is_a_no_op() {
        let mut field = field_1000x800(5);
        let before = field.segments().to_vec();
        let delta = field.deposit(-10.0, 20.0);
        assert!((delta - 0.0).abs() < f32::EPSILON);
        assert_eq!(field.segments(), before.as_slice());
        assert!((field.accumulated() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_first_deposit_arithmetic() {
        // Viewport 1000x800, deposit a size-20 flake at x = 500 (segment 100).
        let mut field = field_1000x800(6);
        let before = field.segments().to_vec();

        let delta = field.deposit(500.0, 20.0);

        // accumulated advances to 0.16 before the delta is computed, so the
        // applied delta is 8 * (1 - 0.16/40) = 7.968.
        assert!((field.accumulated() - 0.16).abs() < 1e-6);
        assert!((delta - 7.968).abs() < 1e-3);

        // Primary segment rose (height decreased), far segments untouched.
        assert!(field.segments()[100] < before[100]);
        // Far segments only move through the global smoothing pass.
        assert!((field.segments()[90] - before[90]).abs() < 1.0);
    }

    #[test]
    fn test_deposit_raises_neighbors_less_than_primary() {
        let mut field = field_1000x800(7);
        let before = field.segments().to_vec();
        field.deposit(500.0, 30.0);

        let primary_rise = before[100] - field.segments()[100];
        let neighbor_rise = before[102] - field.segments()[102];
        assert!(primary_rise > 0.0);
        assert!(neighbor_rise > 0.0);
        assert!(neighbor_rise < primary_rise);
    }

    #[test]
    fn test_deposits_saturate() {
        let mut field = field_1000x800(8);

        let mut last_delta = f32::INFINITY;
        for _ in 0..50 {
            let delta = field.deposit(500.0, 36.0);
            assert!(delta < last_delta, "deposit effect must strictly decrease");
            last_delta = delta;
        }
        assert!(field.accumulated() <= MAX_ACCUMULATED);

        // Drive saturation to its cap; further deposits have no effect.
        for _ in 0..200 {
            field.deposit(500.0, 36.0);
        }
        assert!((field.accumulated() - MAX_ACCUMULATED).abs() < 1e-3);
        assert!(field.deposit(500.0, 36.0) < 1e-3);
    }

    #[test]
    fn test_pile_never_exceeds_ceiling() {
        let mut field = field_1000x800(9);
        for _ in 0..5000 {
            field.deposit(500.0, 36.0);
        }
        for &h in field.segments() {
            assert!(h >= 800.0 - 100.0 - 0.001);
        }
    }

    proptest! {
        #[test]
        fn prop_heights_bounded_after_any_deposits(
            seed in 0u64..256,
            deposits in proptest::collection::vec((0.0f32..1000.0, 6.0f32..36.0), 0..60),
        ) {
            let mut rng = fastrand::Rng::with_seed(seed);
            let mut field = HeightField::new(1000.0, 800.0, &mut rng);
            let upper = 800.0 - 18.0 + 8.0;

            for (x, size) in deposits {
                field.deposit(x, size);
            }

            for &h in field.segments() {
                prop_assert!(h >= 800.0 - 100.0 - 0.001);
                prop_assert!(h <= upper + 0.001);
            }
        }

        #[test]
        fn prop_adjacent_segments_stay_close(
            seed in 0u64..256,
            deposits in proptest::collection::vec((0.0f32..1000.0, 6.0f32..36.0), 0..60),
        ) {
            let mut rng = fastrand::Rng::with_seed(seed);
            let mut field = HeightField::new(1000.0, 800.0, &mut rng);

            for (x, size) in deposits {
                field.deposit(x, size);
            }

            // Edge segments never get smoothed, so a run of deposits next to
            // the border can open a gap of ~35 px before the clamp floor
            // catches up. 45 bounds both interior and edge behavior.
            for pair in field.segments().windows(2) {
                prop_assert!((pair[0] - pair[1]).abs() <= 45.0);
            }
        }
    }
}
