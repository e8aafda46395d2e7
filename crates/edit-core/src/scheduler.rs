//! Delayed "ensure playing" checks after an auto-skip.
//!
//! A skip during playback seeks the player, which may briefly pause it (more
//! so when the seek crosses into another clip). Checks are queued at fixed
//! delays and re-start playback if it has not resumed by then. Every entry
//! carries the generation it was scheduled in; any newer user action bumps
//! the generation, so a stale check can never restart playback the user has
//! since paused.

use vgsync_common::clock::TimestampMs;

use crate::transport::MediaTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingCheck {
    due_ms: TimestampMs,
    generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ResumeScheduler {
    generation: u64,
    pending: Vec<PendingCheck>,
}

impl ResumeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any queued checks with new ones at `now_ms + delay`.
    /// Returns the generation the checks belong to.
    pub fn schedule(&mut self, now_ms: TimestampMs, delays_ms: &[u64]) -> u64 {
        self.supersede();
        let generation = self.generation;
        self.pending.extend(delays_ms.iter().map(|delay| PendingCheck {
            due_ms: now_ms.saturating_add(*delay),
            generation,
        }));
        self.pending.sort_by_key(|c| c.due_ms);
        generation
    }

    /// Invalidate every queued check.
    pub fn supersede(&mut self) {
        self.generation += 1;
        self.pending.clear();
    }

    /// Run the checks that are due. Returns true if playback was restarted.
    pub fn poll<T>(&mut self, now_ms: TimestampMs, transport: &mut T) -> bool
    where
        T: MediaTransport + ?Sized,
    {
        let current = self.generation;
        let mut resumed = false;

        while let Some(check) = self.pending.first().copied() {
            if check.due_ms > now_ms {
                break;
            }
            self.pending.remove(0);
            if check.generation != current {
                continue;
            }
            if !transport.is_playing() {
                tracing::debug!(due_ms = check.due_ms, "Playback not resumed after skip, restarting");
                transport.set_paused(false);
                resumed = true;
            }
        }
        resumed
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedTransport;

    #[test]
    fn test_checks_fire_when_due() {
        let mut sched = ResumeScheduler::new();
        let mut player = SimulatedTransport::new(100.0);
        sched.schedule(1_000, &[50, 500]);
        assert_eq!(sched.pending(), 2);

        assert!(!sched.poll(1_049, &mut player));
        assert!(sched.poll(1_050, &mut player));
        assert!(player.is_playing());
        assert_eq!(sched.pending(), 1);

        // Already playing at the late check: nothing to do.
        assert!(!sched.poll(1_500, &mut player));
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_supersede_drops_stale_checks() {
        let mut sched = ResumeScheduler::new();
        let mut player = SimulatedTransport::new(100.0);
        let first = sched.schedule(0, &[50, 500]);
        sched.supersede();
        assert!(sched.generation() > first);

        assert!(!sched.poll(1_000, &mut player));
        assert!(!player.is_playing());
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let mut sched = ResumeScheduler::new();
        sched.schedule(0, &[50, 500]);
        sched.schedule(100, &[50, 500]);
        assert_eq!(sched.pending(), 2);
    }
}
