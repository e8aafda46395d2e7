//! VGSync Edit Core
//!
//! The playback-control side of the editor:
//! - **CutController:** MarkB/MarkE handling, cut and undo
//! - **PlaybackSkipEngine:** auto-skip over cuts on the periodic tick
//! - **StepEngine:** `s`/`m`/`k`/`f` stepping with cut-boundary freeze
//! - **EditingSession:** owns all of the above plus the resume scheduler
//!
//! The player, keyframe store and GPX view are reached through the traits
//! in [`transport`]; [`sim::SimulatedTransport`] implements the player side
//! in memory.

pub mod cut_controller;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod session;
pub mod sim;
pub mod skip;
pub mod step;
pub mod transport;

pub use cut_controller::{CutApplied, CutController};
pub use error::{EditError, EditResult};
pub use events::{CutChange, EditEvent, EventLog, EventSink, TracingSink};
pub use scheduler::ResumeScheduler;
pub use session::EditingSession;
pub use sim::SimulatedTransport;
pub use skip::{PlaybackSkipEngine, SkipOutcome, SkipState, SkipTick};
pub use step::{Direction, StepAction, StepContext, StepEngine, StepMode};
pub use transport::{GpxSync, KeyframeSource, MediaTransport, TransportError};
