//! Cut intervals and the ordered cut list.
//!
//! The cut list is kept in user-action order so the most recent cut can be
//! undone; sorted/merged views are derived on demand. All times are global
//! seconds (position in the concatenated source clips).

use serde::{Deserialize, Serialize};

/// Cuts shorter than this are rejected.
pub const MIN_CUT_SECS: f64 = 0.01;

/// A half-open time range `[start, end)` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Build an interval from two marks given in any order.
    pub fn ordered(a: f64, b: f64) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Length in seconds.
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    /// True when `start <= t < end`.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Clamp both ends into `[0, total]`.
    pub fn clamped(&self, total: f64) -> Self {
        let total = total.max(0.0);
        Self {
            start: self.start.clamp(0.0, total),
            end: self.end.clamp(0.0, total),
        }
    }

    /// Whether the two intervals overlap or share an endpoint.
    pub fn touches(&self, other: &Interval) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.3}s, {:.3}s)", self.start, self.end)
    }
}

/// Cut intervals in the order they were created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalSet {
    cuts: Vec<Interval>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cut. Returns the stored interval, or `None` when the range is
    /// shorter than [`MIN_CUT_SECS`]. Overlaps are kept as separate entries.
    pub fn add(&mut self, start: f64, end: f64) -> Option<Interval> {
        if !(end - start >= MIN_CUT_SECS) {
            tracing::debug!(start, end, "Cut interval too small, ignored");
            return None;
        }
        let interval = Interval::new(start, end);
        self.cuts.push(interval);
        Some(interval)
    }

    /// Remove the most recently added cut.
    pub fn remove_last(&mut self) -> Option<Interval> {
        self.cuts.pop()
    }

    /// First cut (in insertion order) containing `t`.
    pub fn contains(&self, t: f64) -> Option<Interval> {
        self.cuts.iter().copied().find(|cut| cut.contains(t))
    }

    /// Sorted cuts with overlapping and touching ranges merged.
    pub fn merged(&self) -> Vec<Interval> {
        let mut sorted = self.cuts.clone();
        sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
        for cut in sorted {
            match merged.last_mut() {
                Some(current) if cut.start <= current.end => {
                    current.end = current.end.max(cut.end);
                }
                _ => merged.push(cut),
            }
        }
        merged
    }

    /// Ranges that survive the cuts, ascending, covering `[0, total]`.
    pub fn merged_keep_regions(&self, total: f64) -> Vec<Interval> {
        if total <= 0.0 {
            return Vec::new();
        }
        if self.cuts.is_empty() {
            return vec![Interval::new(0.0, total)];
        }

        let mut keep = Vec::new();
        let mut pos = 0.0;
        for cut in self.merged() {
            let cut = cut.clamped(total);
            if cut.start > pos {
                keep.push(Interval::new(pos, cut.start));
            }
            pos = pos.max(cut.end);
        }
        if pos < total {
            keep.push(Interval::new(pos, total));
        }
        keep
    }

    /// Sum of raw cut lengths. Overlapping cuts are counted twice; use
    /// [`IntervalSet::merged_cut_seconds`] where exact duration matters.
    pub fn total_cut_seconds(&self) -> f64 {
        self.cuts.iter().map(Interval::len).sum()
    }

    /// Length actually removed from `[0, total]`.
    pub fn merged_cut_seconds(&self, total: f64) -> f64 {
        self.merged()
            .iter()
            .map(|cut| cut.clamped(total).len())
            .sum()
    }

    /// End of the cut that starts at the very beginning of the media, if any.
    /// Playback that is "stopped" rests here instead of at zero.
    pub fn leading_cut_end(&self) -> Option<f64> {
        self.cuts
            .iter()
            .filter(|cut| cut.start.abs() < 0.001)
            .map(|cut| cut.end)
            .fold(None, |best: Option<f64>, end| {
                Some(best.map_or(end, |b| b.max(end)))
            })
    }

    pub fn clear(&mut self) {
        self.cuts.clear();
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.cuts.iter()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.cuts
    }

    pub fn last(&self) -> Option<Interval> {
        self.cuts.last().copied()
    }
}

impl FromIterator<Interval> for IntervalSet {
    /// Collect cuts, dropping the ones `add` would reject.
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        let mut set = IntervalSet::new();
        for cut in iter {
            set.add(cut.start, cut.end);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_rejects_degenerate_interval() {
        let mut cuts = IntervalSet::new();
        assert!(cuts.add(10.0, 20.0).is_some());
        assert!(cuts.add(40.0, 40.0).is_none());
        assert!(cuts.add(50.0, 50.005).is_none());
        assert!(cuts.add(60.0, 55.0).is_none());
        assert_eq!(cuts.len(), 1);
        assert_eq!(cuts.as_slice()[0], Interval::new(10.0, 20.0));
    }

    #[test]
    fn test_contains_is_half_open() {
        let mut cuts = IntervalSet::new();
        cuts.add(10.0, 20.0);
        assert_eq!(cuts.contains(10.0), Some(Interval::new(10.0, 20.0)));
        assert_eq!(cuts.contains(19.999), Some(Interval::new(10.0, 20.0)));
        assert_eq!(cuts.contains(20.0), None);
        assert_eq!(cuts.contains(9.999), None);
    }

    #[test]
    fn test_contains_returns_first_in_insertion_order() {
        let mut cuts = IntervalSet::new();
        cuts.add(30.0, 50.0);
        cuts.add(25.0, 40.0);
        assert_eq!(cuts.contains(35.0), Some(Interval::new(30.0, 50.0)));
    }

    #[test]
    fn test_keep_regions_without_cuts() {
        let cuts = IntervalSet::new();
        assert_eq!(
            cuts.merged_keep_regions(100.0),
            vec![Interval::new(0.0, 100.0)]
        );
        assert!(cuts.merged_keep_regions(0.0).is_empty());
    }

    #[test]
    fn test_keep_regions_merge_overlapping_and_touching() {
        let mut cuts = IntervalSet::new();
        cuts.add(40.0, 50.0);
        cuts.add(10.0, 20.0);
        cuts.add(15.0, 25.0);
        cuts.add(50.0, 60.0);

        assert_eq!(
            cuts.merged(),
            vec![Interval::new(10.0, 25.0), Interval::new(40.0, 60.0)]
        );
        assert_eq!(
            cuts.merged_keep_regions(100.0),
            vec![
                Interval::new(0.0, 10.0),
                Interval::new(25.0, 40.0),
                Interval::new(60.0, 100.0),
            ]
        );
    }

    #[test]
    fn test_keep_regions_with_cut_at_edges() {
        let mut cuts = IntervalSet::new();
        cuts.add(0.0, 5.0);
        cuts.add(90.0, 100.0);
        assert_eq!(
            cuts.merged_keep_regions(100.0),
            vec![Interval::new(5.0, 90.0)]
        );
    }

    #[test]
    fn test_everything_cut_leaves_no_keep_region() {
        let mut cuts = IntervalSet::new();
        cuts.add(0.0, 100.0);
        assert!(cuts.merged_keep_regions(100.0).is_empty());
    }

    #[test]
    fn test_total_cut_seconds_counts_overlap_twice() {
        let mut cuts = IntervalSet::new();
        cuts.add(10.0, 20.0);
        cuts.add(15.0, 25.0);
        assert!((cuts.total_cut_seconds() - 20.0).abs() < 1e-9);
        assert!((cuts.merged_cut_seconds(100.0) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_remove_last_pops_most_recent() {
        let mut cuts = IntervalSet::new();
        cuts.add(40.0, 50.0);
        cuts.add(10.0, 20.0);
        assert_eq!(cuts.remove_last(), Some(Interval::new(10.0, 20.0)));
        assert_eq!(cuts.remove_last(), Some(Interval::new(40.0, 50.0)));
        assert_eq!(cuts.remove_last(), None);
    }

    #[test]
    fn test_leading_cut_end() {
        let mut cuts = IntervalSet::new();
        assert_eq!(cuts.leading_cut_end(), None);
        cuts.add(0.0, 4.0);
        cuts.add(0.0005, 7.5);
        cuts.add(20.0, 30.0);
        assert_eq!(cuts.leading_cut_end(), Some(7.5));
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut cuts = IntervalSet::new();
        cuts.add(1.0, 2.0);
        let json = serde_json::to_string(&cuts).unwrap();
        assert_eq!(json, r#"[{"start":1.0,"end":2.0}]"#);
        let parsed: IntervalSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cuts);
    }

    proptest! {
        #[test]
        fn prop_keep_regions_sorted_and_disjoint(
            raw in prop::collection::vec((0.0f64..200.0, 0.0f64..60.0), 0..12),
        ) {
            let total = 200.0;
            let mut cuts = IntervalSet::new();
            for (start, len) in raw {
                cuts.add(start, start + len);
            }

            let merged = cuts.merged();
            for pair in merged.windows(2) {
                prop_assert!(pair[0].end < pair[1].start);
            }

            let keep = cuts.merged_keep_regions(total);
            for region in &keep {
                prop_assert!(region.start < region.end);
                prop_assert!(region.start >= 0.0 && region.end <= total);
                prop_assert!(cuts.contains(region.start).is_none());
            }
            for pair in keep.windows(2) {
                prop_assert!(pair[0].end < pair[1].start);
            }

            let kept: f64 = keep.iter().map(Interval::len).sum();
            prop_assert!((kept + cuts.merged_cut_seconds(total) - total).abs() < 1e-6);
        }
    }
}
