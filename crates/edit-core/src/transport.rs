//! Collaborator traits the editing core talks to.
//!
//! The concrete player, keyframe store, and GPX view live outside this
//! crate; the session only sees these narrow seams.

use vgsync_project_model::{Interval, KeyframeIndex, MarkRows};

/// A media backend refused an operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{reason}")]
pub struct TransportError {
    pub reason: String,
}

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The video player, addressed in global seconds.
pub trait MediaTransport {
    /// Current playhead position.
    fn current_position_s(&self) -> f64;

    fn is_playing(&self) -> bool;

    /// Move the playhead. Backends may refuse (e.g. while switching clips).
    fn seek_to(&mut self, global_s: f64) -> Result<(), TransportError>;

    fn set_paused(&mut self, paused: bool);

    /// Sum of all source clip durations.
    fn total_duration_s(&self) -> f64;

    /// Whether a file is loaded and addressable.
    fn has_active_media(&self) -> bool {
        true
    }

    /// Frame rate of the current clip, when known.
    fn fps(&self) -> Option<f64> {
        None
    }

    /// Step one frame natively. `Ok(false)` means unsupported; the caller
    /// falls back to an approximate seek.
    fn frame_step(&mut self, _forward: bool) -> Result<bool, TransportError> {
        Ok(false)
    }
}

/// Sorted keyframe times for `k`-mode stepping.
pub trait KeyframeSource {
    fn keyframe_times(&self) -> &[f64];

    /// The `n`-th keyframe after `current`.
    fn next_forward(&self, current: f64, n: usize) -> Option<f64>;

    /// The `n`-th keyframe before `current`.
    fn next_backward(&self, current: f64, n: usize) -> Option<f64>;

    fn is_empty(&self) -> bool {
        self.keyframe_times().is_empty()
    }
}

impl KeyframeSource for KeyframeIndex {
    fn keyframe_times(&self) -> &[f64] {
        self.times()
    }

    fn next_forward(&self, current: f64, n: usize) -> Option<f64> {
        KeyframeIndex::next_forward(self, current, n)
    }

    fn next_backward(&self, current: f64, n: usize) -> Option<f64> {
        KeyframeIndex::next_backward(self, current, n)
    }
}

/// Mirrors video cuts onto the GPX track when auto-sync is on.
pub trait GpxSync {
    /// Remove the track points between `rows` for a new video cut.
    fn delete_range(&mut self, cut: Interval, rows: MarkRows);

    /// Revert the most recent `delete_range`.
    fn undo_delete(&mut self);
}
