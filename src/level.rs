//! Nearest-level search.
//!
//! Quantizes a requested brightness (or tint) onto an evenly spaced grid of
//! `steps` levels between a floor and a ceiling. Three interchangeable
//! integer-only strategies are provided; they return identical results for
//! every input and differ only in code size and speed:
//!
//! - [`SearchStrategy::Linear`] walks the grid from the floor up. Smallest
//!   code, O(steps). This is the reference.
//! - [`SearchStrategy::Binary`] bisects the grid. O(log steps).
//! - [`SearchStrategy::ClosedForm`] computes the grid index with one
//!   rounding-up division. O(1), needs a 32-bit multiply.

/// Which implementation of the grid search to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SearchStrategy {
    /// Scan grid points from the floor up.
    #[default]
    Linear,

    /// Bisect the grid.
    Binary,

    /// Compute the grid index directly.
    ClosedForm,
}

impl SearchStrategy {
    /// Every strategy, for cross-checking.
    pub const ALL: [SearchStrategy; 3] = [
        SearchStrategy::Linear,
        SearchStrategy::Binary,
        SearchStrategy::ClosedForm,
    ];
}

/// Finds the allowed level closest to `target` using the reference strategy.
///
/// - `steps == 0` is a continuous ramp: `target` clamped to `[floor, ceil]`.
/// - `steps == 1` is a single level: the integer midpoint of floor and ceiling,
///   whatever the target.
/// - Otherwise the grid is `floor + i * (ceil - floor) / (steps - 1)` for
///   `i` in `0..steps`, and the result is the first grid point within half a
///   (truncated) step of `target`. Truncation can leave a gap one wider than
///   that window; a target in the middle of such a gap matches nothing and
///   resolves to `ceil`.
///
/// `target` may lie outside `[floor, ceil]`; callers overshoot on purpose when
/// ramping past an end. `floor <= ceil` is assumed.
#[inline]
pub fn nearest_level(target: i16, floor: u8, ceil: u8, steps: u8) -> u8 {
    nearest_level_with(SearchStrategy::Linear, target, floor, ceil, steps)
}

/// Same as [`nearest_level`], with an explicit search strategy.
pub fn nearest_level_with(
    strategy: SearchStrategy,
    target: i16,
    floor: u8,
    ceil: u8,
    steps: u8,
) -> u8 {
    if steps == 1 {
        return ((floor as u16 + ceil as u16) >> 1) as u8;
    }
    if target >= ceil as i16 {
        return ceil;
    }
    if target <= floor as i16 {
        return floor;
    }
    if steps == 0 {
        return target as u8;
    }

    // floor < target < ceil from here on, so the range is at least 2
    let grid = Grid::new(floor, ceil, steps);
    match strategy {
        SearchStrategy::Linear => grid.linear(target),
        SearchStrategy::Binary => grid.binary(target),
        SearchStrategy::ClosedForm => grid.closed_form(target),
    }
}

/// An evenly spaced set of levels with truncating integer spacing.
#[derive(Debug, Clone, Copy)]
struct Grid {
    floor: u8,
    range: u16,
    intervals: u16,
    radius: i16,
}

impl Grid {
    fn new(floor: u8, ceil: u8, steps: u8) -> Self {
        let range = (ceil - floor) as u16;
        let intervals = steps as u16 - 1;
        Self {
            floor,
            range,
            intervals,
            radius: ((range / intervals) >> 1) as i16,
        }
    }

    #[inline]
    fn point(&self, i: u16) -> u8 {
        (self.floor as u16 + i * self.range / self.intervals) as u8
    }

    fn linear(&self, target: i16) -> u8 {
        for i in 0..self.intervals {
            let guess = self.point(i);
            if (target - guess as i16).abs() <= self.radius {
                return guess;
            }
        }
        // the ceiling, whether it matched or the scan ran out
        self.point(self.intervals)
    }

    /// The first point at or above `target - radius`, if it is also no more
    /// than `radius` above `target`. Otherwise no point matches and the scan
    /// would have run off the end at the ceiling.
    #[inline]
    fn accept(&self, index: u16, target: i16) -> u8 {
        let guess = self.point(index);
        if guess as i16 - target <= self.radius {
            guess
        } else {
            self.point(self.intervals)
        }
    }

    fn binary(&self, target: i16) -> u8 {
        let threshold = target - self.radius;
        // the last point is the ceiling, which is above target
        let (mut lo, mut hi) = (0u16, self.intervals);
        while lo < hi {
            let mid = (lo + hi) >> 1;
            if self.point(mid) as i16 >= threshold {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        self.accept(lo, target)
    }

    fn closed_form(&self, target: i16) -> u8 {
        let below = target - self.radius - self.floor as i16;
        if below <= 0 {
            return self.accept(0, target);
        }
        // smallest i with i * range / intervals >= below
        let index = (below as u32 * self.intervals as u32).div_ceil(self.range as u32);
        self.accept(index.min(self.intervals as u32) as u16, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_five_step_ramp() {
        let grid: [u8; 5] = core::array::from_fn(|i| Grid::new(1, 150, 5).point(i as u16));
        assert_eq!(grid, [1, 38, 75, 112, 150]);
        for strategy in SearchStrategy::ALL {
            assert_eq!(nearest_level_with(strategy, 80, 1, 150, 5), 75);
        }
    }

    #[test]
    fn gap_midpoint_falls_through_to_ceiling() {
        // grid 0, 3, 7, 11; radius 1; 5 sits two away from both neighbours
        for strategy in SearchStrategy::ALL {
            assert_eq!(nearest_level_with(strategy, 5, 0, 11, 4), 11);
            assert_eq!(nearest_level_with(strategy, 4, 0, 11, 4), 3);
            assert_eq!(nearest_level_with(strategy, 6, 0, 11, 4), 7);
        }
    }

    #[test]
    fn dense_grid_only_matches_exact_points() {
        // 7 steps over a range of 5: points 10, 10, 11, 12, 13, 14, 15; radius 0
        for strategy in SearchStrategy::ALL {
            assert_eq!(nearest_level_with(strategy, 11, 10, 15, 7), 11);
            assert_eq!(nearest_level_with(strategy, 14, 10, 15, 7), 14);
        }
    }

    #[test]
    fn strategies_agree_on_every_small_ramp() {
        for floor in 0u8..=24 {
            for ceil in floor..=floor + 40 {
                for steps in 0u8..=12 {
                    for target in -4i16..=(ceil as i16 + 4) {
                        let reference = nearest_level(target, floor, ceil, steps);
                        assert_eq!(
                            nearest_level_with(SearchStrategy::Binary, target, floor, ceil, steps),
                            reference,
                        );
                        assert_eq!(
                            nearest_level_with(SearchStrategy::ClosedForm, target, floor, ceil, steps),
                            reference,
                        );
                    }
                }
            }
        }
    }
}
