//! Step navigation (`s`, `m`, `k`, `f` modes) with cut-boundary freeze.
//!
//! In time and frame modes a step that would land inside a cut first stops
//! just outside it ("freeze"); the next step in the same direction jumps
//! over the cut. Keyframe mode jumps over cuts directly.
//!
//! The engine only plans the move. The session executes it against the
//! transport.

use std::fmt;
use std::str::FromStr;

use vgsync_project_model::{Interval, IntervalSet};

use crate::error::{EditError, EditResult};
use crate::transport::KeyframeSource;

/// Gap kept between a freeze/jump position and the cut edge.
pub const CUT_EDGE_GAP_SECS: f64 = 0.001;

/// Larger frame steps seek directly instead of stepping frame by frame.
pub const MAX_NATIVE_FRAME_STEPS: u32 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepMode {
    Seconds,
    Minutes,
    Keyframe,
    Frame,
}

impl StepMode {
    pub fn as_char(&self) -> char {
        match self {
            StepMode::Seconds => 's',
            StepMode::Minutes => 'm',
            StepMode::Keyframe => 'k',
            StepMode::Frame => 'f',
        }
    }
}

impl fmt::Display for StepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for StepMode {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "s" | "seconds" => Ok(StepMode::Seconds),
            "m" | "minutes" => Ok(StepMode::Minutes),
            "k" | "keyframe" => Ok(StepMode::Keyframe),
            "f" | "frame" => Ok(StepMode::Frame),
            other => Err(EditError::UnknownStepMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Inputs for one step.
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    pub position: f64,
    pub total: f64,
    /// Frame rate to use in frame mode (already defaulted by the caller).
    pub fps: f64,
    pub cuts: &'a IntervalSet,
    pub keyframes: &'a dyn KeyframeSource,
}

/// The move the session should perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepAction {
    Seek { target: f64 },
    /// Stop next to a cut; the next same-direction step crosses it.
    Freeze { target: f64, interval: Interval },
    /// Leave a freeze by jumping over its cut.
    ReleaseFreeze { target: f64, interval: Interval },
    /// Keyframe target fell inside a cut; jump past it.
    SkipCut { target: f64, interval: Interval },
    /// Native frame step, or seek to `fallback_target` if unsupported.
    FrameStep { frames: u32, fallback_target: f64 },
    /// Nothing further in this direction.
    NoMove,
}

impl StepAction {
    /// Where the playhead should end up, if anywhere.
    pub fn target(&self) -> Option<f64> {
        match *self {
            StepAction::Seek { target }
            | StepAction::Freeze { target, .. }
            | StepAction::ReleaseFreeze { target, .. }
            | StepAction::SkipCut { target, .. } => Some(target),
            StepAction::FrameStep {
                fallback_target, ..
            } => Some(fallback_target),
            StepAction::NoMove => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepEngine {
    mode: StepMode,
    multiplier: f64,
    freeze: Option<(Interval, Direction)>,
}

impl StepEngine {
    pub fn new(mode: StepMode, multiplier: f64) -> EditResult<Self> {
        validate_multiplier(multiplier)?;
        Ok(Self {
            mode,
            multiplier,
            freeze: None,
        })
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn set_mode(&mut self, mode: StepMode) {
        self.mode = mode;
        tracing::debug!(%mode, "Step mode set");
    }

    pub fn set_multiplier(&mut self, multiplier: f64) -> EditResult<()> {
        validate_multiplier(multiplier)?;
        self.multiplier = multiplier;
        tracing::debug!(multiplier, "Step multiplier set");
        Ok(())
    }

    /// The cut the engine is frozen against, if any.
    pub fn frozen(&self) -> Option<Interval> {
        self.freeze.map(|(interval, _)| interval)
    }

    pub fn clear_freeze(&mut self) -> Option<Interval> {
        self.freeze.take().map(|(interval, _)| interval)
    }

    pub fn plan(&mut self, direction: Direction, ctx: &StepContext<'_>) -> EditResult<StepAction> {
        let total = ctx.total.max(0.0);

        if let Some((interval, frozen_dir)) = self.freeze {
            if frozen_dir == direction {
                self.freeze = None;
                let target = match direction {
                    Direction::Forward => (interval.end + CUT_EDGE_GAP_SECS).min(total),
                    Direction::Backward => (interval.start - CUT_EDGE_GAP_SECS).max(0.0),
                };
                tracing::debug!(%interval, target, "Frozen step crosses cut");
                return Ok(StepAction::ReleaseFreeze { target, interval });
            }
        }

        let previous = self.freeze.take();
        let result = self.plan_mode(direction, ctx, total);
        match (&result, previous) {
            (Err(_), Some(freeze)) => self.freeze = Some(freeze),
            (Ok(_), Some((interval, _))) => {
                tracing::debug!(%interval, "Freeze dropped by opposite step");
            }
            _ => {}
        }
        result
    }

    fn plan_mode(
        &mut self,
        direction: Direction,
        ctx: &StepContext<'_>,
        total: f64,
    ) -> EditResult<StepAction> {
        match self.mode {
            StepMode::Seconds | StepMode::Minutes => {
                let unit = if self.mode == StepMode::Minutes {
                    60.0
                } else {
                    1.0
                };
                let next = offset(ctx.position, unit * self.multiplier, direction, total);
                Ok(self
                    .freeze_if_entering_cut(next, direction, ctx.cuts, total)
                    .unwrap_or(StepAction::Seek { target: next }))
            }
            StepMode::Frame => {
                let fps = if ctx.fps > 0.0 { ctx.fps } else { 25.0 };
                let next = offset(ctx.position, self.multiplier / fps, direction, total);
                let frames = self.multiplier.round().max(1.0);
                let planned = if frames > f64::from(MAX_NATIVE_FRAME_STEPS) {
                    StepAction::Seek { target: next }
                } else {
                    StepAction::FrameStep {
                        frames: frames as u32,
                        fallback_target: next,
                    }
                };
                Ok(self
                    .freeze_if_entering_cut(next, direction, ctx.cuts, total)
                    .unwrap_or(planned))
            }
            StepMode::Keyframe => self.plan_keyframe(direction, ctx, total),
        }
    }

    fn plan_keyframe(
        &self,
        direction: Direction,
        ctx: &StepContext<'_>,
        total: f64,
    ) -> EditResult<StepAction> {
        if ctx.keyframes.is_empty() {
            return Err(EditError::NoKeyframesLoaded);
        }
        let n = self.multiplier.max(1.0) as usize;
        let next = match direction {
            Direction::Forward => ctx.keyframes.next_forward(ctx.position, n),
            Direction::Backward => ctx.keyframes.next_backward(ctx.position, n),
        };
        let Some(target) = next else {
            tracing::debug!(position = ctx.position, "No keyframe further in this direction");
            return Ok(StepAction::NoMove);
        };

        match ctx.cuts.contains(target) {
            Some(interval) => {
                let target = match direction {
                    Direction::Forward => (interval.end + CUT_EDGE_GAP_SECS).min(total),
                    Direction::Backward => (interval.start - CUT_EDGE_GAP_SECS).max(0.0),
                };
                Ok(StepAction::SkipCut { target, interval })
            }
            None => Ok(StepAction::Seek {
                target: target.clamp(0.0, total),
            }),
        }
    }

    fn freeze_if_entering_cut(
        &mut self,
        next: f64,
        direction: Direction,
        cuts: &IntervalSet,
        total: f64,
    ) -> Option<StepAction> {
        let (interval, target) = cuts.iter().find_map(|cut| match direction {
            Direction::Forward if cut.start <= next && next < cut.end => {
                Some((*cut, (cut.start - CUT_EDGE_GAP_SECS).max(0.0)))
            }
            Direction::Backward if cut.start < next && next <= cut.end => {
                Some((*cut, (cut.end + CUT_EDGE_GAP_SECS).min(total)))
            }
            _ => None,
        })?;

        tracing::debug!(%interval, target, "Step freezes at cut edge");
        self.freeze = Some((interval, direction));
        Some(StepAction::Freeze { target, interval })
    }
}

fn validate_multiplier(multiplier: f64) -> EditResult<()> {
    if multiplier.is_finite() && multiplier > 0.0 {
        Ok(())
    } else {
        Err(EditError::InvalidMultiplier(multiplier))
    }
}

fn offset(position: f64, delta: f64, direction: Direction, total: f64) -> f64 {
    let next = match direction {
        Direction::Forward => position + delta,
        Direction::Backward => position - delta,
    };
    next.clamp(0.0, total)
}
