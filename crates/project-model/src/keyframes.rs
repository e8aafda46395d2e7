//! Keyframe timestamps on the global timeline.
//!
//! Keyframes come from `ffprobe` runs over each source clip. Local clip
//! timestamps are shifted by the clip's global offset and merged into one
//! sorted, de-duplicated index that the step engine walks in `k` mode.

use serde::{Deserialize, Serialize};

/// Two keyframes closer than this to the current position are skipped.
pub const KEYFRAME_EPS: f64 = 0.005;

/// One keyframe entry as stored in `meta/keyframes.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeEntry {
    pub global_time: f64,
}

/// Sorted keyframe times in global seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframeIndex {
    times: Vec<f64>,
}

impl KeyframeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary times; non-finite values are dropped.
    pub fn from_times(times: impl IntoIterator<Item = f64>) -> Self {
        let mut index = Self::new();
        index.merge(times);
        index
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Merge additional global times into the index.
    pub fn merge(&mut self, times: impl IntoIterator<Item = f64>) {
        self.times.extend(times.into_iter().filter(|t| t.is_finite()));
        self.times.sort_by(f64::total_cmp);
        self.times.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    }

    /// Merge keyframes of one clip, given in clip-local seconds.
    pub fn extend_from_clip(&mut self, local_times: &[f64], clip_offset: f64) {
        self.merge(local_times.iter().map(|t| t + clip_offset));
    }

    /// The `n`-th keyframe strictly after `current` (beyond the tolerance).
    /// Clamps to the last keyframe when fewer than `n` remain.
    pub fn next_forward(&self, current: f64, n: usize) -> Option<f64> {
        let first = self
            .times
            .iter()
            .position(|&t| t > current + KEYFRAME_EPS)?;
        let idx = first
            .saturating_add(n.max(1) - 1)
            .min(self.times.len() - 1);
        Some(self.times[idx])
    }

    /// The `n`-th keyframe strictly before `current` (beyond the tolerance).
    /// Clamps to the first keyframe when fewer than `n` remain.
    pub fn next_backward(&self, current: f64, n: usize) -> Option<f64> {
        let last = self
            .times
            .iter()
            .rposition(|&t| t < current - KEYFRAME_EPS)?;
        let idx = last.saturating_sub(n.max(1) - 1);
        Some(self.times[idx])
    }

    /// Parse a keyframes JSON document: a list of objects with a
    /// `global_time` field (number or numeric string). Entries that cannot
    /// be read are skipped.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let total = entries.len();
        let times: Vec<f64> = entries
            .iter()
            .filter_map(|entry| match entry.get("global_time")? {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .collect();
        if times.len() < total {
            tracing::warn!(
                skipped = total - times.len(),
                "Ignoring unreadable keyframe entries"
            );
        }
        Ok(Self::from_times(times))
    }

    /// Serialize as a list of `{ "global_time": f64 }` entries.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let entries: Vec<KeyframeEntry> = self
            .times
            .iter()
            .map(|&global_time| KeyframeEntry { global_time })
            .collect();
        serde_json::to_string_pretty(&entries)
    }

    /// Parse `ffprobe -show_entries frame=key_frame,pts_time,pict_type
    /// -of csv=p=0` output (`key_frame,pts_time,pict_type` per line) and keep
    /// the key frames, shifted by `clip_offset`.
    pub fn parse_ffprobe_csv(text: &str, clip_offset: f64) -> Vec<f64> {
        text.lines()
            .filter_map(|line| {
                let mut cols = line.split(',').map(str::trim);
                let key_frame = cols.next()?;
                let pts: f64 = cols.next()?.parse().ok()?;
                (key_frame == "1").then_some(pts + clip_offset)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> KeyframeIndex {
        KeyframeIndex::from_times([0.0, 2.0, 4.0, 6.0, 8.0])
    }

    #[test]
    fn test_merge_sorts_and_dedups() {
        let mut idx = KeyframeIndex::from_times([4.0, 0.0, 2.0]);
        idx.merge([2.0, 1.0, f64::NAN]);
        assert_eq!(idx.times(), &[0.0, 1.0, 2.0, 4.0]);
    }

    #[test]
    fn test_extend_from_clip_applies_offset() {
        let mut idx = KeyframeIndex::new();
        idx.extend_from_clip(&[0.0, 1.5], 30.0);
        assert_eq!(idx.times(), &[30.0, 31.5]);
    }

    #[test]
    fn test_next_forward_skips_current() {
        let idx = index();
        assert_eq!(idx.next_forward(2.0, 1), Some(4.0));
        assert_eq!(idx.next_forward(2.003, 1), Some(4.0));
        assert_eq!(idx.next_forward(1.0, 2), Some(4.0));
        assert_eq!(idx.next_forward(1.0, 99), Some(8.0));
        assert_eq!(idx.next_forward(8.0, 1), None);
    }

    #[test]
    fn test_huge_step_count_clamps_without_overflow() {
        let idx = KeyframeIndex::from_times([0.0, 5.0, 12.0, 25.0, 30.0]);
        assert_eq!(idx.next_forward(6.0, usize::MAX), Some(30.0));
        assert_eq!(idx.next_backward(29.0, usize::MAX), Some(0.0));
    }

    #[test]
    fn test_next_backward() {
        let idx = index();
        assert_eq!(idx.next_backward(4.0, 1), Some(2.0));
        assert_eq!(idx.next_backward(5.0, 2), Some(2.0));
        assert_eq!(idx.next_backward(5.0, 99), Some(0.0));
        assert_eq!(idx.next_backward(0.0, 1), None);
    }

    #[test]
    fn test_json_accepts_numbers_and_strings() {
        let json = r#"[
            {"global_time": "1.500000", "pict_type": "I"},
            {"global_time": 0.5},
            {"pts_time": "3.0"},
            {"global_time": "garbage"}
        ]"#;
        let idx = KeyframeIndex::from_json_str(json).unwrap();
        assert_eq!(idx.times(), &[0.5, 1.5]);

        let round = KeyframeIndex::from_json_str(&idx.to_json_string().unwrap()).unwrap();
        assert_eq!(round, idx);
    }

    #[test]
    fn test_parse_ffprobe_csv_keeps_key_frames() {
        let csv = "1,0.000000,I\n0,0.040000,P\n1,2.002000,I\nbroken\n";
        let times = KeyframeIndex::parse_ffprobe_csv(csv, 10.0);
        assert_eq!(times.len(), 2);
        assert!((times[1] - 12.002).abs() < 1e-9);
    }
}
