//! Auto-skip over cuts during playback.
//!
//! Called on the periodic tick and after explicit seeks. When the playhead
//! sits inside a cut it is moved to the cut's end. A skip while paused
//! leaves the player paused on the first frame after the cut (`Frozen`).

use vgsync_project_model::{Interval, IntervalSet};

use crate::events::EditEvent;
use crate::transport::MediaTransport;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipState {
    Running,
    Frozen(Interval),
}

/// A jump the engine performed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkipOutcome {
    pub from: f64,
    pub to: f64,
    pub interval: Interval,
    pub was_playing: bool,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkipTick {
    pub released: Option<Interval>,
    pub skip: Option<SkipOutcome>,
}

impl SkipTick {
    pub fn events(&self) -> Vec<EditEvent> {
        let mut events = Vec::new();
        if let Some(interval) = self.released {
            events.push(EditEvent::FreezeReleased { interval });
        }
        if let Some(skip) = self.skip {
            events.push(EditEvent::SkipPerformed {
                from: skip.from,
                to: skip.to,
                was_playing: skip.was_playing,
            });
            if !skip.was_playing {
                events.push(EditEvent::FreezeEngaged {
                    interval: skip.interval,
                    position: skip.to,
                });
            }
        }
        events
    }
}

#[derive(Debug, Clone)]
pub struct PlaybackSkipEngine {
    state: SkipState,
    last_skip_target: Option<f64>,
    tolerance: f64,
}

impl PlaybackSkipEngine {
    /// `tolerance`: targets closer than this to the previous one are ignored.
    pub fn new(tolerance: f64) -> Self {
        Self {
            state: SkipState::Running,
            last_skip_target: None,
            tolerance,
        }
    }

    pub fn state(&self) -> SkipState {
        self.state
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.state, SkipState::Frozen(_))
    }

    pub fn last_skip_target(&self) -> Option<f64> {
        self.last_skip_target
    }

    pub fn tick<T>(&mut self, cuts: &IntervalSet, transport: &mut T) -> SkipTick
    where
        T: MediaTransport + ?Sized,
    {
        let mut report = SkipTick::default();
        if !transport.has_active_media() {
            return report;
        }

        if let SkipState::Frozen(interval) = self.state {
            if transport.is_playing() {
                self.state = SkipState::Running;
                report.released = Some(interval);
            }
        }

        let position = transport.current_position_s();
        let Some(cut) = cuts.contains(position) else {
            self.last_skip_target = None;
            return report;
        };

        let target = cut.end;
        if self
            .last_skip_target
            .is_some_and(|last| (target - last).abs() < self.tolerance)
        {
            return report;
        }

        let was_playing = transport.is_playing();
        if let Err(err) = transport.seek_to(target) {
            tracing::warn!(target, %err, "Skip seek refused, will retry");
            return report;
        }
        self.last_skip_target = Some(target);

        if !was_playing {
            transport.set_paused(true);
            self.state = SkipState::Frozen(cut);
        }

        tracing::debug!(from = position, to = target, was_playing, "Skipped over cut");
        report.skip = Some(SkipOutcome {
            from: position,
            to: target,
            interval: cut,
            was_playing,
        });
        report
    }

    /// Leave the frozen state because a newer action took over.
    pub fn release(&mut self) -> Option<Interval> {
        match std::mem::replace(&mut self.state, SkipState::Running) {
            SkipState::Frozen(interval) => Some(interval),
            SkipState::Running => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = SkipState::Running;
        self.last_skip_target = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedTransport;

    fn cuts() -> IntervalSet {
        let mut set = IntervalSet::new();
        set.add(10.0, 20.0);
        set
    }

    #[test]
    fn test_skip_while_playing_keeps_running() {
        let mut engine = PlaybackSkipEngine::new(0.001);
        let mut player = SimulatedTransport::new(100.0);
        player.set_position(12.0);
        player.set_paused(false);

        let tick = engine.tick(&cuts(), &mut player);
        let skip = tick.skip.unwrap();
        assert!(skip.was_playing);
        assert_eq!(player.current_position_s(), 20.0);
        assert_eq!(engine.state(), SkipState::Running);
    }

    #[test]
    fn test_skip_while_paused_freezes() {
        let mut engine = PlaybackSkipEngine::new(0.001);
        let mut player = SimulatedTransport::new(100.0);
        player.set_position(15.0);

        let tick = engine.tick(&cuts(), &mut player);
        assert!(tick.skip.is_some());
        assert_eq!(engine.state(), SkipState::Frozen(Interval::new(10.0, 20.0)));
        assert!(!player.is_playing());
        assert_eq!(tick.events().len(), 2);

        player.set_paused(false);
        let tick = engine.tick(&cuts(), &mut player);
        assert_eq!(tick.released, Some(Interval::new(10.0, 20.0)));
        assert!(!engine.is_frozen());
    }

    #[test]
    fn test_repeated_target_skipped_once() {
        let mut engine = PlaybackSkipEngine::new(0.001);
        let mut player = SimulatedTransport::new(100.0);
        player.set_position(15.0);
        engine.tick(&cuts(), &mut player);

        // Player failed to move: the same target must not be sought again.
        player.set_position(15.0);
        let tick = engine.tick(&cuts(), &mut player);
        assert!(tick.skip.is_none());
        assert_eq!(player.seeks(), &[20.0]);
    }

    #[test]
    fn test_leaving_cut_clears_last_target() {
        let mut engine = PlaybackSkipEngine::new(0.001);
        let mut player = SimulatedTransport::new(100.0);
        player.set_position(15.0);
        engine.tick(&cuts(), &mut player);
        engine.tick(&cuts(), &mut player);
        assert_eq!(engine.last_skip_target(), None);

        player.set_position(15.0);
        assert!(engine.tick(&cuts(), &mut player).skip.is_some());
        assert_eq!(player.seeks().len(), 2);
    }

    #[test]
    fn test_refused_seek_retries_next_tick() {
        let mut engine = PlaybackSkipEngine::new(0.001);
        let mut player = SimulatedTransport::new(100.0);
        player.set_position(15.0);
        player.set_refuse_seeks(true);
        assert!(engine.tick(&cuts(), &mut player).skip.is_none());
        assert_eq!(engine.last_skip_target(), None);

        player.set_refuse_seeks(false);
        assert!(engine.tick(&cuts(), &mut player).skip.is_some());
    }

    #[test]
    fn test_no_active_media_does_nothing() {
        let mut engine = PlaybackSkipEngine::new(0.001);
        let mut player = SimulatedTransport::new(100.0);
        player.set_position(15.0);
        player.set_active_media(false);
        assert_eq!(engine.tick(&cuts(), &mut player), SkipTick::default());
        assert!(player.seeks().is_empty());
    }

    #[test]
    fn test_adjacent_cuts_skip_in_sequence() {
        let mut set = cuts();
        set.add(20.0, 30.0);
        let mut engine = PlaybackSkipEngine::new(0.001);
        let mut player = SimulatedTransport::new(100.0);
        player.set_position(11.0);

        engine.tick(&set, &mut player);
        engine.tick(&set, &mut player);
        assert_eq!(player.current_position_s(), 30.0);
    }
}
