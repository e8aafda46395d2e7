//! Notifications emitted by the editing core.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use vgsync_project_model::{Interval, MarksChanged};

/// What happened to the cut list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "interval", rename_all = "snake_case")]
pub enum CutChange {
    Added(Interval),
    Removed(Interval),
}

/// State changes the UI (or a log) should hear about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditEvent {
    MarksChanged(MarksChanged),

    /// `total_cut_seconds` is the raw sum over all cuts, overlaps included.
    CutsChanged {
        total_cut_seconds: f64,
        change: CutChange,
    },

    /// Playback or stepping stopped at `position` next to `interval`.
    FreezeEngaged { interval: Interval, position: f64 },

    FreezeReleased { interval: Interval },

    /// Playback jumped over a cut.
    SkipPerformed {
        from: f64,
        to: f64,
        was_playing: bool,
    },
}

/// Receives [`EditEvent`]s from the session.
pub trait EventSink {
    fn publish(&mut self, event: &EditEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&EditEvent),
{
    fn publish(&mut self, event: &EditEvent) {
        self(event)
    }
}

/// Sink that logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&mut self, event: &EditEvent) {
        match event {
            EditEvent::MarksChanged(m) => {
                tracing::debug!(mark_b = ?m.mark_b, mark_e = ?m.mark_e, "Marks changed");
            }
            EditEvent::CutsChanged {
                total_cut_seconds,
                change,
            } => {
                tracing::info!(total_cut_seconds, change = ?change, "Cuts changed");
            }
            EditEvent::FreezeEngaged { interval, position } => {
                tracing::info!(%interval, position, "Freeze engaged");
            }
            EditEvent::FreezeReleased { interval } => {
                tracing::debug!(%interval, "Freeze released");
            }
            EditEvent::SkipPerformed {
                from,
                to,
                was_playing,
            } => {
                tracing::info!(from, to, was_playing, "Skipped cut");
            }
        }
    }
}

/// Shared in-memory event list. Clones see the same events, so a test can
/// keep one handle and give the other to the session.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Rc<RefCell<Vec<EditEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EditEvent> {
        self.events.borrow().clone()
    }

    /// Drain and return everything recorded so far.
    pub fn take(&self) -> Vec<EditEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSink for EventLog {
    fn publish(&mut self, event: &EditEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
