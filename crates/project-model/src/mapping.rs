//! Conversion between global time (raw concatenated sources) and final time
//! (the post-cut media).
//!
//! Both directions walk the merged keep regions in ascending order. Points
//! that land exactly on a boundary are resolved so that the mapping stays
//! monotonic:
//! - a global time on a keep-region start maps to the final time at the end
//!   of the previous keep region;
//! - a final time equal to the kept length so far maps to the start of the
//!   next keep region.

use crate::interval::{Interval, IntervalSet};

/// Boundary tolerance in seconds.
pub const BOUNDARY_EPS: f64 = 1e-9;

/// Map a global position to final time.
pub fn global_to_final(global: f64, cuts: &IntervalSet, total: f64) -> f64 {
    TimeMapper::new(cuts, total).global_to_final(global)
}

/// Map a final position back to global time.
pub fn final_to_global(final_s: f64, cuts: &IntervalSet, total: f64) -> f64 {
    TimeMapper::new(cuts, total).final_to_global(final_s)
}

/// Keep regions of a cut snapshot, cached for repeated conversions.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeMapper {
    keep: Vec<Interval>,
    total: f64,
    has_cuts: bool,
}

impl TimeMapper {
    pub fn new(cuts: &IntervalSet, total: f64) -> Self {
        let total = total.max(0.0);
        Self {
            keep: cuts.merged_keep_regions(total),
            total,
            has_cuts: !cuts.is_empty(),
        }
    }

    pub fn keep_regions(&self) -> &[Interval] {
        &self.keep
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Length of the media after all cuts are removed.
    pub fn final_duration(&self) -> f64 {
        self.keep.iter().map(Interval::len).sum()
    }

    pub fn global_to_final(&self, global: f64) -> f64 {
        let global = global.clamp(0.0, self.total);
        if !self.has_cuts {
            return global;
        }

        let mut kept_before = 0.0;
        for region in &self.keep {
            if global < region.start - BOUNDARY_EPS {
                break;
            }
            if (global - region.start).abs() <= BOUNDARY_EPS {
                return kept_before;
            }
            if region.start <= global && global < region.end - BOUNDARY_EPS {
                return kept_before + (global - region.start);
            }
            kept_before += region.len();
        }
        kept_before
    }

    pub fn final_to_global(&self, final_s: f64) -> f64 {
        let final_s = final_s.max(0.0);
        if !self.has_cuts {
            return final_s.min(self.total);
        }

        let mut remaining = final_s;
        for region in &self.keep {
            let len = region.len();
            if remaining < len - BOUNDARY_EPS {
                return region.start + remaining;
            }
            if (remaining - len).abs() <= BOUNDARY_EPS {
                remaining = 0.0;
            } else {
                remaining -= len;
            }
        }
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cuts(list: &[(f64, f64)]) -> IntervalSet {
        let mut set = IntervalSet::new();
        for &(start, end) in list {
            set.add(start, end);
        }
        set
    }

    #[test]
    fn test_no_cuts_is_identity() {
        let set = IntervalSet::new();
        assert!((global_to_final(57.3, &set, 100.0) - 57.3).abs() < 1e-9);
        assert!((final_to_global(57.3, &set, 100.0) - 57.3).abs() < 1e-9);
        assert!((global_to_final(150.0, &set, 100.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_cut_with_degenerate_rejected() {
        let set = cuts(&[(10.0, 20.0), (40.0, 40.0)]);
        assert_eq!(set.len(), 1);

        let mapper = TimeMapper::new(&set, 100.0);
        assert_eq!(
            mapper.keep_regions(),
            &[Interval::new(0.0, 10.0), Interval::new(20.0, 100.0)]
        );
        assert!((mapper.global_to_final(25.0) - 15.0).abs() < 1e-9);
        assert!((mapper.global_to_final(10.0) - 10.0).abs() < 1e-9);
        assert!((mapper.global_to_final(20.0) - 10.0).abs() < 1e-9);
        assert!((mapper.global_to_final(15.0) - 10.0).abs() < 1e-9);
        assert!((mapper.final_duration() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_final_to_global_snaps_forward_at_region_end() {
        let set = cuts(&[(10.0, 20.0)]);
        let mapper = TimeMapper::new(&set, 100.0);
        assert!((mapper.final_to_global(10.0) - 20.0).abs() < 1e-9);
        assert!((mapper.final_to_global(5.0) - 5.0).abs() < 1e-9);
        assert!((mapper.final_to_global(15.0) - 25.0).abs() < 1e-9);
        assert!((mapper.final_to_global(500.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_everything_cut() {
        let set = cuts(&[(0.0, 100.0)]);
        let mapper = TimeMapper::new(&set, 100.0);
        assert!(mapper.keep_regions().is_empty());
        assert!(mapper.global_to_final(50.0).abs() < 1e-9);
        assert!((mapper.final_to_global(0.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_duration() {
        let set = cuts(&[(1.0, 2.0)]);
        let mapper = TimeMapper::new(&set, 0.0);
        assert!(mapper.keep_regions().is_empty());
        assert_eq!(mapper.global_to_final(5.0), 0.0);
        assert_eq!(mapper.final_to_global(5.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_global_to_final_is_monotonic(
            raw in prop::collection::vec((0.0f64..100.0, 0.01f64..20.0), 0..6),
            a in 0.0f64..100.0,
            b in 0.0f64..100.0,
        ) {
            let set: IntervalSet = raw
                .into_iter()
                .map(|(s, len)| Interval::new(s, s + len))
                .collect();
            let mapper = TimeMapper::new(&set, 100.0);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(mapper.global_to_final(lo) <= mapper.global_to_final(hi) + 1e-9);
        }

        #[test]
        fn prop_round_trip_inside_keep_regions(
            raw in prop::collection::vec((0.0f64..100.0, 0.01f64..20.0), 0..6),
            pick in 0.0f64..1.0,
            frac in 0.05f64..0.95,
        ) {
            let set: IntervalSet = raw
                .into_iter()
                .map(|(s, len)| Interval::new(s, s + len))
                .collect();
            let mapper = TimeMapper::new(&set, 100.0);
            let keep = mapper.keep_regions();
            prop_assume!(!keep.is_empty());

            let idx = ((pick * keep.len() as f64) as usize).min(keep.len() - 1);
            let region = keep[idx];
            prop_assume!(region.len() > 1e-3);
            let g = region.start + region.len() * frac;

            let back = mapper.final_to_global(mapper.global_to_final(g));
            prop_assert!((back - g).abs() < 1e-6, "g={} back={}", g, back);
        }
    }
}
