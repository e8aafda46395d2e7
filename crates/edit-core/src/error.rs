//! Errors raised by editing operations.
//!
//! None of these are fatal: a rejected operation leaves the session exactly
//! as it was and the caller reports the message to the user.

use vgsync_common::error::VgsyncError;
use vgsync_project_model::{MarkError, TrackError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("Invalid mark: {0}")]
    InvalidMarkOrder(#[from] MarkError),

    #[error("Both MarkB and MarkE must be set before cutting")]
    MissingMarks,

    #[error("Cut {start:.3}s..{end:.3}s is shorter than the 0.01s minimum")]
    IntervalTooSmall { start: f64, end: f64 },

    #[error("No keyframes loaded; index the sources or switch off keyframe mode")]
    NoKeyframesLoaded,

    #[error("Step multiplier must be a positive number, got {0}")]
    InvalidMultiplier(f64),

    #[error("Unknown step mode '{0}' (expected s, m, k, or f)")]
    UnknownStepMode(String),

    #[error("Player refused seek to {target:.3}s: {reason}")]
    SeekRefused { target: f64, reason: String },

    #[error(transparent)]
    Track(#[from] TrackError),
}

pub type EditResult<T> = Result<T, EditError>;

impl From<EditError> for VgsyncError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::SeekRefused { .. } => VgsyncError::transport(err.to_string()),
            other => VgsyncError::edit(other.to_string()),
        }
    }
}
