//! Mark, cut, and undo handling.
//!
//! The controller owns the cut list and the pending marks. It validates
//! first and only then mutates, and it returns the resulting events instead
//! of publishing them; [`crate::session::EditingSession`] forwards them.

use vgsync_project_model::{
    Interval, IntervalSet, MarkError, MarkState, MarksChanged, MIN_CUT_SECS,
};

use crate::error::{EditError, EditResult};
use crate::events::{CutChange, EditEvent};

/// Result of a successful cut.
#[derive(Debug, Clone, PartialEq)]
pub struct CutApplied {
    pub interval: Interval,
    pub events: Vec<EditEvent>,
}

#[derive(Debug, Clone, Default)]
pub struct CutController {
    cuts: IntervalSet,
    marks: MarkState,
}

impl CutController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing cut list (e.g. a loaded project). Undo pops
    /// these cuts as well.
    pub fn with_cuts(cuts: IntervalSet) -> Self {
        Self {
            cuts,
            marks: MarkState::new(),
        }
    }

    pub fn cuts(&self) -> &IntervalSet {
        &self.cuts
    }

    pub fn marks(&self) -> &MarkState {
        &self.marks
    }

    pub fn set_mark_b(&mut self, position: f64, total: f64) -> EditResult<MarksChanged> {
        let value = position.clamp(0.0, total.max(0.0));
        self.marks.set_mark_b(value).map_err(|err| {
            tracing::debug!(%err, "MarkB rejected");
            EditError::from(err)
        })
    }

    pub fn set_mark_e(&mut self, position: f64, total: f64) -> EditResult<MarksChanged> {
        let value = position.clamp(0.0, total.max(0.0));
        self.marks.set_mark_e(value).map_err(|err| {
            tracing::debug!(%err, "MarkE rejected");
            EditError::from(err)
        })
    }

    /// Put MarkE on the very end of the media. MarkB has to be set.
    pub fn mark_to_end(&mut self, total: f64) -> EditResult<MarksChanged> {
        if self.marks.mark_b().is_none() {
            return Err(MarkError::MarkBNotSet.into());
        }
        self.set_mark_e(total, total)
    }

    pub fn clear_marks(&mut self) -> Option<MarksChanged> {
        self.marks.clear()
    }

    /// Turn the marks into a cut.
    pub fn on_cut(&mut self, total: f64) -> EditResult<CutApplied> {
        let (b, e) = self.marks.pair().ok_or(EditError::MissingMarks)?;
        let interval = Interval::ordered(b, e).clamped(total);

        if interval.len() < MIN_CUT_SECS {
            tracing::debug!(start = interval.start, end = interval.end, "Cut too small, ignored");
            return Err(EditError::IntervalTooSmall {
                start: interval.start,
                end: interval.end,
            });
        }

        let stored = self
            .cuts
            .add(interval.start, interval.end)
            .ok_or(EditError::IntervalTooSmall {
                start: interval.start,
                end: interval.end,
            })?;
        let marks = self.marks.clear().unwrap_or_else(|| self.marks.snapshot());

        tracing::info!(start = stored.start, end = stored.end, "Cut added");
        Ok(CutApplied {
            interval: stored,
            events: vec![
                EditEvent::MarksChanged(marks),
                EditEvent::CutsChanged {
                    total_cut_seconds: self.cuts.total_cut_seconds(),
                    change: CutChange::Added(stored),
                },
            ],
        })
    }

    /// Remove the most recent cut. No redo.
    pub fn on_undo(&mut self) -> Option<(Interval, EditEvent)> {
        let removed = self.cuts.remove_last()?;
        tracing::info!(start = removed.start, end = removed.end, "Cut undone");
        Some((
            removed,
            EditEvent::CutsChanged {
                total_cut_seconds: self.cuts.total_cut_seconds(),
                change: CutChange::Removed(removed),
            },
        ))
    }

    /// Drop cuts and marks for a new project.
    pub fn reset(&mut self) {
        self.cuts.clear();
        self.marks = MarkState::new();
    }
}
