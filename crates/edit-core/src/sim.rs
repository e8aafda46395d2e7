//! In-memory media transport for tests and the `simulate` command.

use crate::transport::{MediaTransport, TransportError};

/// A player that advances a virtual playhead when told time has passed.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    position: f64,
    playing: bool,
    total: f64,
    fps: Option<f64>,
    rate: f64,
    active: bool,
    refuse_seeks: bool,
    native_frame_step: bool,
    seeks: Vec<f64>,
}

impl SimulatedTransport {
    pub fn new(total: f64) -> Self {
        Self {
            position: 0.0,
            playing: false,
            total: total.max(0.0),
            fps: None,
            rate: 1.0,
            active: true,
            refuse_seeks: false,
            native_frame_step: false,
            seeks: Vec::new(),
        }
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Playback speed multiplier used by [`SimulatedTransport::advance`].
    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate.max(0.0);
        self
    }

    pub fn with_native_frame_step(mut self) -> Self {
        self.native_frame_step = true;
        self
    }

    /// Place the playhead without recording a seek.
    pub fn set_position(&mut self, position: f64) {
        self.position = position.clamp(0.0, self.total);
    }

    pub fn set_refuse_seeks(&mut self, refuse: bool) {
        self.refuse_seeks = refuse;
    }

    pub fn set_active_media(&mut self, active: bool) {
        self.active = active;
    }

    /// Let `secs` of wall time pass. Playback stops at the end of the media.
    pub fn advance(&mut self, secs: f64) {
        if !self.playing {
            return;
        }
        self.position = (self.position + secs * self.rate).min(self.total);
        if self.position >= self.total {
            self.playing = false;
        }
    }

    /// Every accepted seek target, in order.
    pub fn seeks(&self) -> &[f64] {
        &self.seeks
    }
}

impl MediaTransport for SimulatedTransport {
    fn current_position_s(&self) -> f64 {
        self.position
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn seek_to(&mut self, global_s: f64) -> Result<(), TransportError> {
        if self.refuse_seeks {
            return Err(TransportError::new("seek refused by simulated player"));
        }
        self.position = global_s.clamp(0.0, self.total);
        self.seeks.push(self.position);
        Ok(())
    }

    fn set_paused(&mut self, paused: bool) {
        self.playing = !paused && self.position < self.total;
    }

    fn total_duration_s(&self) -> f64 {
        self.total
    }

    fn has_active_media(&self) -> bool {
        self.active
    }

    fn fps(&self) -> Option<f64> {
        self.fps
    }

    fn frame_step(&mut self, forward: bool) -> Result<bool, TransportError> {
        if !self.native_frame_step {
            return Ok(false);
        }
        let frame = 1.0 / self.fps.unwrap_or(25.0);
        let delta = if forward { frame } else { -frame };
        self.position = (self.position + delta).clamp(0.0, self.total);
        self.playing = false;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_only_while_playing() {
        let mut t = SimulatedTransport::new(10.0).with_rate(2.0);
        t.advance(1.0);
        assert_eq!(t.current_position_s(), 0.0);
        t.set_paused(false);
        t.advance(1.0);
        assert!((t.current_position_s() - 2.0).abs() < 1e-9);
        t.advance(100.0);
        assert_eq!(t.current_position_s(), 10.0);
        assert!(!t.is_playing());
    }

    #[test]
    fn test_refused_seek_is_not_recorded() {
        let mut t = SimulatedTransport::new(10.0);
        t.set_refuse_seeks(true);
        assert!(t.seek_to(5.0).is_err());
        assert!(t.seeks().is_empty());
        assert_eq!(t.current_position_s(), 0.0);
    }

    #[test]
    fn test_native_frame_step() {
        let mut t = SimulatedTransport::new(10.0)
            .with_fps(50.0)
            .with_native_frame_step();
        assert!(t.frame_step(true).unwrap());
        assert!((t.current_position_s() - 0.02).abs() < 1e-9);
        assert!(!SimulatedTransport::new(1.0).frame_step(true).unwrap());
    }
}
