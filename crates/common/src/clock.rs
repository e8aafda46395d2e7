//! Clock and timing utilities for the editing session.
//!
//! Every timer-driven part of the editor (the periodic cut-skip check and
//! the delayed "ensure playing" re-checks) works on a single monotonic
//! millisecond timeline anchored at session start. Callers read it from a
//! [`SessionClock`] in production and pass synthetic values in tests.

use std::time::Instant;

/// Milliseconds elapsed since the session epoch.
pub type TimestampMs = u64;

/// A session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment the editing session started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Milliseconds elapsed since session start.
    pub fn now_ms(&self) -> TimestampMs {
        self.epoch.elapsed().as_millis() as TimestampMs
    }

    /// Seconds elapsed since session start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Convert milliseconds to seconds.
    pub fn ms_to_secs(ms: TimestampMs) -> f64 {
        ms as f64 / 1_000.0
    }

    /// Convert seconds to milliseconds (negative input saturates at zero).
    pub fn secs_to_ms(secs: f64) -> TimestampMs {
        (secs.max(0.0) * 1_000.0).round() as TimestampMs
    }
}

/// Gate for a periodic tick.
#[derive(Debug, Clone)]
pub struct TickGate {
    interval_ms: TimestampMs,
    last_tick_ms: Option<TimestampMs>,
}

impl TickGate {
    /// Create a gate that opens at most once per `interval_ms`.
    pub fn new(interval_ms: TimestampMs) -> Self {
        Self {
            interval_ms,
            last_tick_ms: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, now_ms: TimestampMs) -> bool {
        match self.last_tick_ms {
            None => {
                self.last_tick_ms = Some(now_ms);
                true
            }
            Some(last) if now_ms >= last + self.interval_ms => {
                self.last_tick_ms = Some(now_ms);
                true
            }
            _ => false,
        }
    }

    /// Forget the last tick so the next call fires immediately.
    pub fn reset(&mut self) {
        self.last_tick_ms = None;
    }

    /// Tick interval in milliseconds.
    pub fn interval_ms(&self) -> TimestampMs {
        self.interval_ms
    }
}
