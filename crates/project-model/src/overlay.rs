//! Image overlays burned into the export over a time range.

use serde::{Deserialize, Serialize};

/// Two overlays whose ends differ by less than this are the same range.
const RANGE_MATCH_EPS: f64 = 0.001;

/// One image overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Start on the final timeline (seconds).
    pub start: f64,
    pub end: f64,

    #[serde(default)]
    pub fade_in: f64,
    #[serde(default)]
    pub fade_out: f64,

    /// Image path.
    pub image: String,

    #[serde(default = "default_scale")]
    pub scale: f64,

    /// ffmpeg overlay position expressions, e.g. `(W-w)/2`.
    #[serde(default = "default_x")]
    pub x: String,
    #[serde(default = "default_y")]
    pub y: String,
}

fn default_scale() -> f64 {
    1.0
}

fn default_x() -> String {
    "(W-w)/2".to_string()
}

fn default_y() -> String {
    "(H-h)/2".to_string()
}

impl Overlay {
    pub fn new(start: f64, end: f64, image: impl Into<String>) -> Self {
        Self {
            start,
            end,
            fade_in: 0.0,
            fade_out: 0.0,
            image: image.into(),
            scale: default_scale(),
            x: default_x(),
            y: default_y(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Overlays with snapshot-based undo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayStore {
    overlays: Vec<Overlay>,
    history: Vec<Vec<Overlay>>,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_overlays(overlays: Vec<Overlay>) -> Self {
        Self {
            overlays,
            history: Vec::new(),
        }
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn into_overlays(self) -> Vec<Overlay> {
        self.overlays
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Add an overlay. Returns false (and changes nothing) if `end <= start`.
    pub fn add(&mut self, overlay: Overlay) -> bool {
        if overlay.end <= overlay.start {
            tracing::warn!(
                start = overlay.start,
                end = overlay.end,
                "Overlay end is not after start, ignored"
            );
            return false;
        }
        self.history.push(self.overlays.clone());
        tracing::debug!(start = overlay.start, end = overlay.end, image = %overlay.image, "Overlay added");
        self.overlays.push(overlay);
        true
    }

    /// Remove the first overlay covering `[start, end]`. Undoable.
    pub fn remove_range(&mut self, start: f64, end: f64) -> Option<Overlay> {
        let pos = self.overlays.iter().position(|o| {
            (o.start - start).abs() < RANGE_MATCH_EPS && (o.end - end).abs() < RANGE_MATCH_EPS
        })?;
        self.history.push(self.overlays.clone());
        Some(self.overlays.remove(pos))
    }

    /// Restore the state before the last `add` or `remove_range`.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.overlays = previous;
                true
            }
            None => false,
        }
    }
}
