//! Ordered source clips and the global timeline they form.

use serde::{Deserialize, Serialize};

/// One source video file in the playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceClip {
    /// Path relative to the project root (or absolute).
    pub path: String,

    /// Duration in seconds.
    pub duration_secs: f64,
}

/// A global position resolved to a clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPosition {
    pub index: usize,
    pub local_secs: f64,
}

/// Part of a global range that falls inside a single clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipSpan {
    pub index: usize,
    pub local_start: f64,
    pub local_end: f64,
}

impl ClipSpan {
    pub fn len(&self) -> f64 {
        self.local_end - self.local_start
    }
}

/// Source clips in playback order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourcePlaylist {
    clips: Vec<SourceClip>,
}

impl SourcePlaylist {
    pub fn new(clips: Vec<SourceClip>) -> Self {
        Self { clips }
    }

    pub fn push(&mut self, clip: SourceClip) {
        self.clips.push(clip);
    }

    pub fn clips(&self) -> &[SourceClip] {
        &self.clips
    }

    pub fn get(&self, index: usize) -> Option<&SourceClip> {
        self.clips.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn total_duration(&self) -> f64 {
        self.clips.iter().map(|c| c.duration_secs.max(0.0)).sum()
    }

    /// Cumulative end offset of each clip.
    pub fn boundaries(&self) -> Vec<f64> {
        let mut offset = 0.0;
        self.clips
            .iter()
            .map(|clip| {
                offset += clip.duration_secs.max(0.0);
                offset
            })
            .collect()
    }

    /// Global start offset of a clip.
    pub fn clip_offset(&self, index: usize) -> f64 {
        self.clips
            .iter()
            .take(index)
            .map(|c| c.duration_secs.max(0.0))
            .sum()
    }

    /// Resolve a global position to a clip. Positions at or past the end
    /// resolve to the end of the last clip.
    pub fn locate(&self, global: f64) -> Option<ClipPosition> {
        let last = self.clips.len().checked_sub(1)?;
        let global = global.max(0.0);

        let mut prev = 0.0;
        for (index, end) in self.boundaries().into_iter().enumerate() {
            if global < end {
                return Some(ClipPosition {
                    index,
                    local_secs: global - prev,
                });
            }
            prev = end;
        }

        Some(ClipPosition {
            index: last,
            local_secs: self.clips[last].duration_secs.max(0.0),
        })
    }

    /// Split a global range into per-clip local ranges, in clip order.
    /// Empty pieces are dropped.
    pub fn split_range(&self, global_start: f64, global_end: f64) -> Vec<ClipSpan> {
        let mut spans = Vec::new();
        if global_end <= global_start {
            return spans;
        }

        let boundaries = self.boundaries();
        let Some(mut index) = boundaries.iter().position(|&b| global_start < b) else {
            return spans;
        };
        let mut prev = if index > 0 { boundaries[index - 1] } else { 0.0 };
        let mut current = global_start;

        while current < global_end && index < boundaries.len() {
            let upper = global_end.min(boundaries[index]);
            let local_start = current - prev;
            let local_end = upper - prev;
            if local_end > local_start {
                spans.push(ClipSpan {
                    index,
                    local_start,
                    local_end,
                });
            }
            current = upper;
            prev = boundaries[index];
            index += 1;
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist() -> SourcePlaylist {
        SourcePlaylist::new(vec![
            SourceClip {
                path: "a.mp4".into(),
                duration_secs: 30.0,
            },
            SourceClip {
                path: "b.mp4".into(),
                duration_secs: 20.0,
            },
            SourceClip {
                path: "c.mp4".into(),
                duration_secs: 50.0,
            },
        ])
    }

    #[test]
    fn test_total_and_boundaries() {
        let p = playlist();
        assert!((p.total_duration() - 100.0).abs() < 1e-9);
        assert_eq!(p.boundaries(), vec![30.0, 50.0, 100.0]);
        assert!((p.clip_offset(2) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_locate() {
        let p = playlist();
        assert_eq!(
            p.locate(35.0),
            Some(ClipPosition {
                index: 1,
                local_secs: 5.0
            })
        );
        assert_eq!(p.locate(30.0).map(|c| c.index), Some(1));
        assert_eq!(
            p.locate(120.0),
            Some(ClipPosition {
                index: 2,
                local_secs: 50.0
            })
        );
        assert_eq!(SourcePlaylist::default().locate(1.0), None);
    }

    #[test]
    fn test_split_range_across_clips() {
        let p = playlist();
        let spans = p.split_range(25.0, 60.0);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].index, 0);
        assert!((spans[0].local_start - 25.0).abs() < 1e-9);
        assert!((spans[0].local_end - 30.0).abs() < 1e-9);
        assert_eq!(spans[1].index, 1);
        assert!((spans[1].len() - 20.0).abs() < 1e-9);
        assert_eq!(spans[2].index, 2);
        assert!((spans[2].local_end - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_range_inside_one_clip() {
        let spans = playlist().split_range(55.0, 70.0);
        assert_eq!(
            spans,
            vec![ClipSpan {
                index: 2,
                local_start: 5.0,
                local_end: 20.0
            }]
        );
    }

    #[test]
    fn test_split_range_empty_inputs() {
        let p = playlist();
        assert!(p.split_range(40.0, 40.0).is_empty());
        assert!(p.split_range(150.0, 160.0).is_empty());
        assert!(SourcePlaylist::default().split_range(0.0, 1.0).is_empty());
    }
}
