//! GPX point times, used to pick the track point matching a video position.

/// Errors raised when building a [`TrackTimes`] index.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackError {
    #[error("GPX point {index} has a missing or decreasing timestamp")]
    UnsortedOrMissingTimestamp { index: usize },
}

/// GPX rows selected for a pair of marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkRows {
    pub b_row: usize,
    pub e_row: usize,
}

/// Seconds since the first track point, one entry per point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackTimes {
    rel_secs: Vec<f64>,
}

impl TrackTimes {
    /// Build from per-point times (seconds). Every point needs a time and
    /// times must not decrease.
    pub fn from_samples(samples: &[Option<f64>]) -> Result<Self, TrackError> {
        let mut rel_secs = Vec::with_capacity(samples.len());
        let mut first = None;
        let mut prev = f64::NEG_INFINITY;

        for (index, sample) in samples.iter().enumerate() {
            let t = match sample {
                Some(t) if t.is_finite() && *t >= prev => *t,
                _ => return Err(TrackError::UnsortedOrMissingTimestamp { index }),
            };
            let origin = *first.get_or_insert(t);
            rel_secs.push(t - origin);
            prev = t;
        }
        Ok(Self { rel_secs })
    }

    pub fn len(&self) -> usize {
        self.rel_secs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rel_secs.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.rel_secs
    }

    /// Track duration in seconds.
    pub fn duration(&self) -> f64 {
        self.rel_secs.last().copied().unwrap_or(0.0)
    }

    /// First index whose time is nearest to `final_s`; 0 for an empty track.
    pub fn closest_index(&self, final_s: f64) -> usize {
        let mut best = 0;
        let mut best_diff = f64::INFINITY;
        for (i, t) in self.rel_secs.iter().enumerate() {
            let diff = (t - final_s).abs();
            if diff < best_diff {
                best_diff = diff;
                best = i;
            }
        }
        best
    }

    /// Rows for a cut between two final-time marks. The begin row is one past
    /// the closest point so the point at the mark itself survives the cut.
    pub fn mark_rows(&self, b_final: f64, e_final: f64) -> MarkRows {
        let last = self.rel_secs.len().saturating_sub(1);
        MarkRows {
            b_row: (self.closest_index(b_final) + 1).min(last),
            e_row: self.closest_index(e_final),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> TrackTimes {
        TrackTimes::from_samples(&[Some(100.0), Some(101.0), Some(102.0), Some(104.0)]).unwrap()
    }

    #[test]
    fn test_times_are_relative() {
        let t = track();
        assert_eq!(t.as_slice(), &[0.0, 1.0, 2.0, 4.0]);
        assert!((t.duration() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_timestamp_reports_index() {
        let err = TrackTimes::from_samples(&[Some(0.0), None, Some(2.0)]).unwrap_err();
        assert_eq!(err, TrackError::UnsortedOrMissingTimestamp { index: 1 });
    }

    #[test]
    fn test_decreasing_timestamp_rejected() {
        let err = TrackTimes::from_samples(&[Some(5.0), Some(4.0)]).unwrap_err();
        assert_eq!(err, TrackError::UnsortedOrMissingTimestamp { index: 1 });
    }

    #[test]
    fn test_closest_index_prefers_first_on_tie() {
        let t = track();
        assert_eq!(t.closest_index(0.4), 0);
        assert_eq!(t.closest_index(0.5), 0);
        assert_eq!(t.closest_index(3.1), 3);
        assert_eq!(t.closest_index(99.0), 3);
        assert_eq!(TrackTimes::default().closest_index(3.0), 0);
    }

    #[test]
    fn test_mark_rows_clamp_to_last() {
        let t = track();
        assert_eq!(t.mark_rows(1.0, 2.0), MarkRows { b_row: 2, e_row: 2 });
        assert_eq!(t.mark_rows(4.0, 4.0), MarkRows { b_row: 3, e_row: 3 });
    }
}
