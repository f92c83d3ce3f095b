//! Vertical occupancy of the gaps between neighbouring lanes
//!
//! A message occupies every gap it crosses. Messages over disjoint gaps may
//! sit closer together than messages sharing a gap.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct GapTracker {
    /// Nothing may be placed above this position
    floor: f64,
    /// Last occupied y per gap, keyed by the order of the gap's left lane
    last: HashMap<isize, f64>,
}

impl GapTracker {
    pub fn new(floor: f64) -> Self {
        Self {
            floor,
            last: HashMap::new(),
        }
    }

    /// Forget every message above `y`
    pub fn reset(&mut self, y: f64) {
        self.floor = y;
        self.last.clear();
    }

    /// Lowest occupied position over the gaps between lane orders `a` and `b`
    pub fn occupied(&self, a: isize, b: isize) -> f64 {
        gaps(a, b)
            .filter_map(|gap| self.last.get(&gap).copied())
            .fold(self.floor, f64::max)
    }

    /// Mark the gaps between lane orders `a` and `b` as used down to `y`
    pub fn occupy(&mut self, a: isize, b: isize, y: f64) {
        for gap in gaps(a, b) {
            self.last.insert(gap, y);
        }
    }
}

fn gaps(a: isize, b: isize) -> std::ops::Range<isize> {
    a.min(b)..a.max(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disjoint_gaps_are_independent() {
        let mut gaps = GapTracker::new(60.0);
        assert_eq!(gaps.occupied(0, 1), 60.0);
        gaps.occupy(0, 1, 80.0);
        assert_eq!(gaps.occupied(1, 0), 80.0);
        assert_eq!(gaps.occupied(2, 3), 60.0);
        // spans the occupied gap
        assert_eq!(gaps.occupied(-1, 3), 80.0);
    }

    #[test]
    fn test_reset_raises_floor() {
        let mut gaps = GapTracker::new(60.0);
        gaps.occupy(0, 2, 100.0);
        gaps.reset(150.0);
        assert_eq!(gaps.occupied(0, 2), 150.0);
        // self calls cross no gap
        assert_eq!(gaps.occupied(1, 1), 150.0);
    }
}
