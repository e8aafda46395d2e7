//! The pending cut selection: a begin mark (B) and an end mark (E).

use serde::{Deserialize, Serialize};

/// Why a mark could not be set.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MarkError {
    #[error("MarkB at {value:.3}s would be behind MarkE at {mark_e:.3}s")]
    BehindMarkE { value: f64, mark_e: f64 },

    #[error("MarkE at {value:.3}s would be in front of MarkB at {mark_b:.3}s")]
    InFrontOfMarkB { value: f64, mark_b: f64 },

    #[error("MarkB must be set first")]
    MarkBNotSet,
}

/// Snapshot of both marks after a change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarksChanged {
    pub mark_b: Option<f64>,
    pub mark_e: Option<f64>,
}

/// Begin/end marks in global seconds. When both are set, `mark_b < mark_e`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkState {
    mark_b: Option<f64>,
    mark_e: Option<f64>,
}

impl MarkState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_b(&self) -> Option<f64> {
        self.mark_b
    }

    pub fn mark_e(&self) -> Option<f64> {
        self.mark_e
    }

    /// Both marks, if set.
    pub fn pair(&self) -> Option<(f64, f64)> {
        self.mark_b.zip(self.mark_e)
    }

    pub fn is_empty(&self) -> bool {
        self.mark_b.is_none() && self.mark_e.is_none()
    }

    /// Set the begin mark. Fails without mutating if it would not lie
    /// strictly before an existing end mark.
    pub fn set_mark_b(&mut self, value: f64) -> Result<MarksChanged, MarkError> {
        if let Some(mark_e) = self.mark_e {
            if value >= mark_e {
                return Err(MarkError::BehindMarkE { value, mark_e });
            }
        }
        self.mark_b = Some(value);
        Ok(self.snapshot())
    }

    /// Set the end mark. Fails without mutating if it would not lie
    /// strictly after an existing begin mark.
    pub fn set_mark_e(&mut self, value: f64) -> Result<MarksChanged, MarkError> {
        if let Some(mark_b) = self.mark_b {
            if value <= mark_b {
                return Err(MarkError::InFrontOfMarkB { value, mark_b });
            }
        }
        self.mark_e = Some(value);
        Ok(self.snapshot())
    }

    /// Reset both marks. Returns a change only if something was set.
    pub fn clear(&mut self) -> Option<MarksChanged> {
        if self.is_empty() {
            return None;
        }
        self.mark_b = None;
        self.mark_e = None;
        Some(self.snapshot())
    }

    pub fn snapshot(&self) -> MarksChanged {
        MarksChanged {
            mark_b: self.mark_b,
            mark_e: self.mark_e,
        }
    }
}
