//! The editing session: one place that owns the cut list, the marks, and
//! the playback-control state machines for a loaded project.
//!
//! Every public method is a single atomic step. Time only enters through
//! [`EditingSession::tick`], which the host calls with a monotonic
//! millisecond timestamp (see `vgsync_common::clock::SessionClock`).

use vgsync_common::clock::{TickGate, TimestampMs};
use vgsync_common::config::PlaybackConfig;
use vgsync_project_model::{
    Interval, IntervalSet, KeyframeIndex, MarkState, MarksChanged, Overlay, OverlayStore,
    TimeMapper, TrackTimes,
};

use crate::cut_controller::CutController;
use crate::error::{EditError, EditResult};
use crate::events::{EditEvent, EventSink, TracingSink};
use crate::scheduler::ResumeScheduler;
use crate::skip::{PlaybackSkipEngine, SkipOutcome, SkipState};
use crate::step::{Direction, StepAction, StepContext, StepEngine, StepMode};
use crate::transport::{GpxSync, KeyframeSource, MediaTransport};

/// Positions closer to zero than this count as the media start.
const LEADING_CUT_EPS: f64 = 0.001;

struct GpxLink {
    sync: Box<dyn GpxSync>,
    track: TrackTimes,
}

pub struct EditingSession<T: MediaTransport> {
    config: PlaybackConfig,
    transport: T,
    controller: CutController,
    overlays: OverlayStore,
    skip: PlaybackSkipEngine,
    step: StepEngine,
    resume: ResumeScheduler,
    keyframes: Box<dyn KeyframeSource>,
    sink: Box<dyn EventSink>,
    gpx: Option<GpxLink>,
    tick_gate: TickGate,
    now_ms: TimestampMs,
}

impl<T: MediaTransport> EditingSession<T> {
    /// Create a session over `transport`. Fails if the configured default
    /// step mode or multiplier is invalid.
    pub fn new(transport: T, config: PlaybackConfig) -> EditResult<Self> {
        let mode: StepMode = config.default_step_mode.parse()?;
        let step = StepEngine::new(mode, config.default_step_multiplier)?;

        Ok(Self {
            skip: PlaybackSkipEngine::new(config.skip_tolerance_secs),
            tick_gate: TickGate::new(config.skip_tick_ms),
            step,
            config,
            transport,
            controller: CutController::new(),
            overlays: OverlayStore::new(),
            resume: ResumeScheduler::new(),
            keyframes: Box::new(KeyframeIndex::new()),
            sink: Box::new(TracingSink),
            gpx: None,
            now_ms: 0,
        })
    }

    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_cuts(mut self, cuts: IntervalSet) -> Self {
        self.controller = CutController::with_cuts(cuts);
        self
    }

    pub fn with_overlays(mut self, overlays: Vec<Overlay>) -> Self {
        self.overlays = OverlayStore::from_overlays(overlays);
        self
    }

    pub fn set_keyframes(&mut self, keyframes: impl KeyframeSource + 'static) {
        self.keyframes = Box::new(keyframes);
    }

    /// Attach a GPX view. `samples` are the point times in seconds; cuts are
    /// mirrored onto it while `auto_sync_gpx` is enabled.
    pub fn attach_gpx(
        &mut self,
        sync: impl GpxSync + 'static,
        samples: &[Option<f64>],
    ) -> EditResult<()> {
        let track = TrackTimes::from_samples(samples)?;
        tracing::info!(points = track.len(), "GPX track attached");
        self.gpx = Some(GpxLink {
            sync: Box::new(sync),
            track,
        });
        Ok(())
    }

    pub fn detach_gpx(&mut self) {
        self.gpx = None;
    }

    pub fn set_auto_sync_gpx(&mut self, enabled: bool) {
        self.config.auto_sync_gpx = enabled;
    }

    // --- accessors -------------------------------------------------------

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Direct player access, e.g. to advance a simulated playhead. Actions
    /// taken through it bypass the session's bookkeeping.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn cuts(&self) -> &IntervalSet {
        self.controller.cuts()
    }

    pub fn overlays(&self) -> &[Overlay] {
        self.overlays.overlays()
    }

    pub fn marks(&self) -> &MarkState {
        self.controller.marks()
    }

    pub fn skip_state(&self) -> SkipState {
        self.skip.state()
    }

    pub fn step_mode(&self) -> StepMode {
        self.step.mode()
    }

    pub fn step_multiplier(&self) -> f64 {
        self.step.multiplier()
    }

    /// Cut the step engine is frozen against.
    pub fn step_freeze(&self) -> Option<Interval> {
        self.step.frozen()
    }

    pub fn pending_resume_checks(&self) -> usize {
        self.resume.pending()
    }

    pub fn total_duration(&self) -> f64 {
        self.transport.total_duration_s().max(0.0)
    }

    // --- time mapping ----------------------------------------------------

    pub fn time_mapper(&self) -> TimeMapper {
        TimeMapper::new(self.controller.cuts(), self.total_duration())
    }

    pub fn keep_regions(&self) -> Vec<Interval> {
        self.controller
            .cuts()
            .merged_keep_regions(self.total_duration())
    }

    pub fn final_position(&self) -> f64 {
        self.time_mapper()
            .global_to_final(self.transport.current_position_s())
    }

    pub fn final_duration(&self) -> f64 {
        self.time_mapper().final_duration()
    }

    /// Raw sum of cut lengths, as shown to the user.
    pub fn total_cut_seconds(&self) -> f64 {
        self.controller.cuts().total_cut_seconds()
    }

    /// Where playback rests after `stop`: past a cut at the very start, or 0.
    pub fn start_position(&self) -> f64 {
        self.controller
            .cuts()
            .leading_cut_end()
            .filter(|end| *end > LEADING_CUT_EPS)
            .map_or(0.0, |end| end.min(self.total_duration()))
    }

    /// GPX row matching the current playhead.
    pub fn gpx_row_for_position(&self) -> Option<usize> {
        let final_s = self.final_position();
        self.gpx
            .as_ref()
            .map(|link| link.track.closest_index(final_s))
    }

    // --- marks and cuts --------------------------------------------------

    pub fn mark_b(&mut self) -> EditResult<MarksChanged> {
        self.supersede();
        let position = self.transport.current_position_s();
        let total = self.total_duration();
        let changed = self.controller.set_mark_b(position, total)?;
        self.release_step_freeze();
        self.publish(EditEvent::MarksChanged(changed));
        Ok(changed)
    }

    pub fn mark_e(&mut self) -> EditResult<MarksChanged> {
        self.supersede();
        let position = self.transport.current_position_s();
        let total = self.total_duration();
        let changed = self.controller.set_mark_e(position, total)?;
        self.release_step_freeze();
        self.publish(EditEvent::MarksChanged(changed));
        Ok(changed)
    }

    /// Set MarkE to the end of the media.
    pub fn mark_to_end(&mut self) -> EditResult<MarksChanged> {
        self.supersede();
        let total = self.total_duration();
        let changed = self.controller.mark_to_end(total)?;
        self.release_step_freeze();
        self.publish(EditEvent::MarksChanged(changed));
        Ok(changed)
    }

    pub fn clear_marks(&mut self) -> Option<MarksChanged> {
        let changed = self.controller.clear_marks()?;
        self.publish(EditEvent::MarksChanged(changed));
        Some(changed)
    }

    /// Cut the marked range.
    pub fn cut(&mut self) -> EditResult<Interval> {
        self.supersede();
        let total = self.total_duration();
        let before = TimeMapper::new(self.controller.cuts(), total);

        let applied = self.controller.on_cut(total)?;
        self.release_step_freeze();
        for event in &applied.events {
            self.sink.publish(event);
        }

        let interval = applied.interval;
        if self.config.auto_sync_gpx {
            if let Some(link) = self.gpx.as_mut() {
                let rows = link.track.mark_rows(
                    before.global_to_final(interval.start),
                    before.global_to_final(interval.end),
                );
                tracing::debug!(b_row = rows.b_row, e_row = rows.e_row, "Mirroring cut to GPX");
                link.sync.delete_range(interval, rows);
            }
        }
        Ok(interval)
    }

    /// Add an image overlay. Returns false if its range is empty.
    pub fn add_overlay(&mut self, overlay: Overlay) -> bool {
        self.overlays.add(overlay)
    }

    /// Remove the overlay spanning `[start, end]`.
    pub fn remove_overlay(&mut self, start: f64, end: f64) -> Option<Overlay> {
        self.overlays.remove_range(start, end)
    }

    /// Undo the most recent cut. The last overlay change is undone along
    /// with it, even when there is no cut left to remove.
    pub fn undo(&mut self) -> Option<Interval> {
        self.supersede();
        if self.overlays.undo() {
            tracing::debug!(overlays = self.overlays.len(), "Overlay change undone");
        }
        let (removed, event) = self.controller.on_undo()?;
        self.release_step_freeze();
        self.publish(event);

        if self.config.auto_sync_gpx {
            if let Some(link) = self.gpx.as_mut() {
                link.sync.undo_delete();
            }
        }
        Some(removed)
    }

    // --- navigation ------------------------------------------------------

    pub fn set_step_mode(&mut self, mode: StepMode) {
        self.step.set_mode(mode);
    }

    pub fn set_step_multiplier(&mut self, multiplier: f64) -> EditResult<()> {
        self.step.set_multiplier(multiplier)
    }

    pub fn step_forward(&mut self) -> EditResult<StepAction> {
        self.step(Direction::Forward)
    }

    pub fn step_backward(&mut self) -> EditResult<StepAction> {
        self.step(Direction::Backward)
    }

    fn step(&mut self, direction: Direction) -> EditResult<StepAction> {
        if self.transport.is_playing() {
            self.transport.set_paused(true);
        }
        self.supersede();

        let was_frozen = self.step.frozen();
        let total = self.total_duration();
        let fps = self
            .transport
            .fps()
            .filter(|fps| *fps > 0.0)
            .unwrap_or(self.config.fallback_fps);
        let ctx = StepContext {
            position: self.transport.current_position_s(),
            total,
            fps,
            cuts: self.controller.cuts(),
            keyframes: self.keyframes.as_ref(),
        };
        let action = self.step.plan(direction, &ctx)?;

        if let Some(interval) = was_frozen {
            self.publish(EditEvent::FreezeReleased { interval });
        }

        let moved = match action {
            StepAction::Seek { target }
            | StepAction::ReleaseFreeze { target, .. }
            | StepAction::SkipCut { target, .. } => self.seek_transport(target),
            StepAction::Freeze { target, interval } => {
                let moved = self.seek_transport(target);
                if moved.is_ok() {
                    self.publish(EditEvent::FreezeEngaged {
                        interval,
                        position: target,
                    });
                }
                moved
            }
            StepAction::FrameStep {
                frames,
                fallback_target,
            } => self.frame_step(direction == Direction::Forward, frames, fallback_target),
            StepAction::NoMove => return Ok(action),
        };

        if let Err(err) = moved {
            self.step.clear_freeze();
            return Err(err);
        }
        self.check_skip();
        Ok(action)
    }

    fn frame_step(&mut self, forward: bool, frames: u32, fallback: f64) -> EditResult<()> {
        for _ in 0..frames {
            let stepped = self
                .transport
                .frame_step(forward)
                .map_err(|err| EditError::SeekRefused {
                    target: fallback,
                    reason: err.reason,
                })?;
            if !stepped {
                return self.seek_transport(fallback);
            }
        }
        Ok(())
    }

    /// Explicit seek in global seconds. Resume checks triggered by the
    /// seek are timed from the last [`tick`](Self::tick); use
    /// [`seek_at`](Self::seek_at) when the current time is known.
    pub fn seek(&mut self, global_s: f64) -> EditResult<()> {
        self.supersede();
        self.release_step_freeze();
        let target = global_s.clamp(0.0, self.total_duration());
        self.seek_transport(target)?;
        self.check_skip();
        Ok(())
    }

    /// Explicit seek at `now_ms`.
    pub fn seek_at(&mut self, global_s: f64, now_ms: TimestampMs) -> EditResult<()> {
        self.now_ms = self.now_ms.max(now_ms);
        self.seek(global_s)
    }

    /// Explicit seek in final (post-cut) seconds.
    pub fn seek_final(&mut self, final_s: f64) -> EditResult<()> {
        let global = self.time_mapper().final_to_global(final_s);
        self.seek(global)
    }

    pub fn play(&mut self) {
        self.supersede();
        self.transport.set_paused(false);
    }

    pub fn pause(&mut self) {
        self.supersede();
        self.transport.set_paused(true);
    }

    /// Pause and return to the start of the kept media.
    pub fn stop(&mut self) -> EditResult<()> {
        self.supersede();
        self.step.clear_freeze();
        let target = self.start_position();
        self.seek_transport(target)?;
        self.transport.set_paused(true);
        Ok(())
    }

    /// Periodic driver. Runs due resume checks and, at most once per
    /// `skip_tick_ms`, the cut-skip check.
    pub fn tick(&mut self, now_ms: TimestampMs) -> Option<SkipOutcome> {
        self.now_ms = now_ms;
        self.resume.poll(now_ms, &mut self.transport);
        if !self.tick_gate.should_tick(now_ms) {
            return None;
        }
        self.check_skip()
    }

    /// Load a different cut list (e.g. a new project). Marks, overlays,
    /// freezes and pending checks are dropped.
    pub fn reset(&mut self, cuts: IntervalSet) {
        self.controller = CutController::with_cuts(cuts);
        self.overlays = OverlayStore::new();
        self.skip.reset();
        self.release_step_freeze();
        self.resume.supersede();
        self.tick_gate.reset();
    }

    // --- internals -------------------------------------------------------

    fn check_skip(&mut self) -> Option<SkipOutcome> {
        let report = self.skip.tick(self.controller.cuts(), &mut self.transport);
        for event in report.events() {
            self.sink.publish(&event);
        }
        let skip = report.skip?;
        if skip.was_playing {
            self.resume
                .schedule(self.now_ms, &self.config.resume_check_delays_ms);
        }
        Some(skip)
    }

    fn seek_transport(&mut self, target: f64) -> EditResult<()> {
        self.transport.seek_to(target).map_err(|err| {
            tracing::warn!(target, %err, "Seek refused");
            EditError::SeekRefused {
                target,
                reason: err.reason,
            }
        })
    }

    /// A newer user action invalidates pending resume checks and any
    /// skip freeze.
    fn supersede(&mut self) {
        self.resume.supersede();
        if let Some(interval) = self.skip.release() {
            self.publish(EditEvent::FreezeReleased { interval });
        }
    }

    /// Drop a step freeze whose cut may no longer exist.
    fn release_step_freeze(&mut self) {
        if let Some(interval) = self.step.clear_freeze() {
            self.publish(EditEvent::FreezeReleased { interval });
        }
    }

    fn publish(&mut self, event: EditEvent) {
        self.sink.publish(&event);
    }
}
