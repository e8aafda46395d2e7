//! Project metadata and the on-disk project bundle.
//!
//! A project ties together the source clip playlist, the cut list in the
//! order the user created it, image overlays, and export settings. On disk
//! it is a directory:
//!
//! ```text
//! <root>/meta/project.json
//! <root>/meta/keyframes.json   (optional)
//! <root>/cache/
//! <root>/exports/
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::interval::IntervalSet;
use crate::keyframes::KeyframeIndex;
use crate::mapping::TimeMapper;
use crate::overlay::Overlay;
use crate::playlist::{SourceClip, SourcePlaylist};

/// Top-level project file (`project.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Schema version.
    pub version: String,

    /// Human-readable project name.
    pub name: String,

    /// Unique project identifier (UUID).
    pub id: String,

    /// Creation timestamp (ISO 8601).
    pub created_at: String,

    /// Last modified timestamp (ISO 8601).
    pub modified_at: String,

    /// Source clips in playback order.
    pub sources: SourcePlaylist,

    /// Cut intervals in global seconds, oldest first.
    #[serde(default)]
    pub cuts: IntervalSet,

    /// Image overlays.
    #[serde(default)]
    pub overlays: Vec<Overlay>,

    /// Export configuration.
    #[serde(default)]
    pub export: ExportSettings,
}

/// How the export is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Stream copy of the keep ranges, concatenated without re-encoding.
    #[default]
    Copy,
    /// Re-encode with crossfades and overlays.
    Encode,
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub mode: EditMode,

    /// Output file name, relative to `exports/` unless absolute.
    pub output_name: String,

    /// Settings for [`EditMode::Encode`].
    pub encoder: EncoderSettings,
}

/// Re-encode parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    /// Crossfade length at each cut, in seconds.
    pub xfade_secs: u32,

    /// Hardware encoder family (`none`, `nvidia`, `intel`, `amd`).
    pub hardware: String,

    /// Codec family (`x264` or `x265`).
    pub codec: String,

    pub crf: u32,
    pub fps: u32,
    pub preset: String,

    /// Output width in pixels; height follows the aspect ratio.
    pub width: u32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            mode: EditMode::Copy,
            output_name: "output_final.mp4".to_string(),
            encoder: EncoderSettings::default(),
        }
    }
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            xfade_secs: 2,
            hardware: "none".to_string(),
            codec: "x265".to_string(),
            crf: 25,
            fps: 30,
            preset: "fast".to_string(),
            width: 1280,
        }
    }
}

impl Project {
    /// Create a new project with defaults.
    pub fn new(name: impl Into<String>, sources: Vec<SourceClip>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: "1.0".to_string(),
            name: name.into(),
            id: uuid_v4(),
            created_at: now.clone(),
            modified_at: now,
            sources: SourcePlaylist::new(sources),
            cuts: IntervalSet::new(),
            overlays: Vec::new(),
            export: ExportSettings::default(),
        }
    }

    /// Sum of source clip durations.
    pub fn total_duration(&self) -> f64 {
        self.sources.total_duration()
    }

    /// Mapper over the current cuts.
    pub fn time_mapper(&self) -> TimeMapper {
        TimeMapper::new(&self.cuts, self.total_duration())
    }

    /// Bump the modification timestamp.
    pub fn touch(&mut self) {
        self.modified_at = chrono::Utc::now().to_rfc3339();
    }
}

/// The complete in-memory representation of a loaded project.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// Filesystem path to the project directory.
    pub root: PathBuf,

    /// Project metadata.
    pub project: Project,

    /// Keyframe index, empty until the sources have been indexed.
    pub keyframes: KeyframeIndex,
}

impl LoadedProject {
    /// Load a project from a directory.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();

        let project_path = root.join("meta").join("project.json");
        let keyframes_path = root.join("meta").join("keyframes.json");

        let project_json =
            std::fs::read_to_string(&project_path).map_err(|e| ProjectError::IoError {
                path: project_path.clone(),
                source: e,
            })?;

        let project: Project =
            serde_json::from_str(&project_json).map_err(|e| ProjectError::ParseError {
                path: project_path,
                source: e,
            })?;

        let keyframes = if keyframes_path.exists() {
            let keyframes_json =
                std::fs::read_to_string(&keyframes_path).map_err(|e| ProjectError::IoError {
                    path: keyframes_path.clone(),
                    source: e,
                })?;
            KeyframeIndex::from_json_str(&keyframes_json).map_err(|e| {
                ProjectError::ParseError {
                    path: keyframes_path,
                    source: e,
                }
            })?
        } else {
            KeyframeIndex::new()
        };

        tracing::debug!(
            name = %project.name,
            clips = project.sources.len(),
            cuts = project.cuts.len(),
            keyframes = keyframes.len(),
            "Project loaded"
        );

        Ok(Self {
            root,
            project,
            keyframes,
        })
    }

    /// Save project (and keyframes, when present) to disk.
    pub fn save(&self) -> Result<(), ProjectError> {
        let meta_dir = self.root.join("meta");
        std::fs::create_dir_all(&meta_dir).map_err(|e| ProjectError::IoError {
            path: meta_dir.clone(),
            source: e,
        })?;

        let project_path = meta_dir.join("project.json");
        let project_json =
            serde_json::to_string_pretty(&self.project).map_err(|e| ProjectError::ParseError {
                path: project_path.clone(),
                source: e,
            })?;
        std::fs::write(&project_path, project_json).map_err(|e| ProjectError::IoError {
            path: project_path,
            source: e,
        })?;

        if !self.keyframes.is_empty() {
            let keyframes_path = meta_dir.join("keyframes.json");
            let keyframes_json =
                self.keyframes
                    .to_json_string()
                    .map_err(|e| ProjectError::ParseError {
                        path: keyframes_path.clone(),
                        source: e,
                    })?;
            std::fs::write(&keyframes_path, keyframes_json).map_err(|e| {
                ProjectError::IoError {
                    path: keyframes_path,
                    source: e,
                }
            })?;
        }

        Ok(())
    }

    /// Create a new project on disk with the standard directory structure.
    pub fn create(
        root: impl AsRef<Path>,
        name: impl Into<String>,
        sources: Vec<SourceClip>,
    ) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();

        if let Some(clip) = sources.iter().find(|c| !(c.duration_secs > 0.0)) {
            return Err(ProjectError::ValidationError {
                message: format!("clip {} has invalid duration {}", clip.path, clip.duration_secs),
            });
        }

        for subdir in &["meta", "cache", "exports"] {
            std::fs::create_dir_all(root.join(subdir)).map_err(|e| ProjectError::IoError {
                path: root.join(subdir),
                source: e,
            })?;
        }

        let loaded = Self {
            root,
            project: Project::new(name, sources),
            keyframes: KeyframeIndex::new(),
        };
        loaded.save()?;
        Ok(loaded)
    }

    /// Absolute path of a source clip.
    pub fn source_path(&self, index: usize) -> Option<PathBuf> {
        self.project
            .sources
            .get(index)
            .map(|clip| self.root.join(&clip.path))
    }

    /// Where the export is written.
    pub fn output_path(&self) -> PathBuf {
        self.root
            .join("exports")
            .join(&self.project.export.output_name)
    }

    /// Validate that all referenced source files exist.
    pub fn validate_sources(&self) -> Vec<String> {
        let mut errors = vec![];

        if self.project.sources.is_empty() {
            errors.push("Project has no source clips".to_string());
        }

        for (i, clip) in self.project.sources.clips().iter().enumerate() {
            if !self.root.join(&clip.path).exists() {
                errors.push(format!("Clip {} source missing: {}", i + 1, clip.path));
            }
            if !(clip.duration_secs > 0.0) {
                errors.push(format!(
                    "Clip {} has invalid duration: {}",
                    i + 1,
                    clip.duration_secs
                ));
            }
        }

        let total = self.project.total_duration();
        for cut in self.project.cuts.iter() {
            if cut.start < 0.0 || cut.end > total + 1e-6 {
                errors.push(format!("Cut {cut} lies outside the media (0..{total:.3}s)"));
            }
        }

        errors
    }
}

/// Errors that can occur when working with projects.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}

/// Generate a simple UUID v4 without external dependency.
fn uuid_v4() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!(
        "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
        (seed & 0xFFFFFFFF) as u32,
        ((seed >> 32) & 0xFFFF) as u16,
        ((seed >> 48) & 0x0FFF) as u16,
        (((seed >> 60) & 0x3F) | 0x80) as u16 | (((seed >> 66) & 0x3FF) as u16) << 6,
        (seed >> 76) & 0xFFFFFFFFFFFF,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clips() -> Vec<SourceClip> {
        vec![
            SourceClip {
                path: "clip1.mp4".to_string(),
                duration_secs: 60.0,
            },
            SourceClip {
                path: "clip2.mp4".to_string(),
                duration_secs: 40.0,
            },
        ]
    }

    #[test]
    fn test_project_creation() {
        let project = Project::new("Ride", clips());
        assert_eq!(project.name, "Ride");
        assert!((project.total_duration() - 100.0).abs() < 1e-9);
        assert!(project.cuts.is_empty());
        assert_eq!(project.export.mode, EditMode::Copy);
    }

    #[test]
    fn test_project_serialization_keeps_cut_order() {
        let mut project = Project::new("Ride", clips());
        project.cuts.add(50.0, 60.0);
        project.cuts.add(10.0, 20.0);

        let json = serde_json::to_string_pretty(&project).unwrap();
        let parsed: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.cuts, project.cuts);
        assert_eq!(parsed.cuts.last().map(|c| c.start), Some(10.0));
        assert_eq!(parsed.version, "1.0");
    }

    #[test]
    fn test_minimal_project_file_fills_defaults() {
        let json = r#"{
            "version": "1.0", "name": "Old", "id": "x",
            "created_at": "", "modified_at": "",
            "sources": [{"path": "a.mp4", "duration_secs": 10.0}]
        }"#;
        let parsed: Project = serde_json::from_str(json).unwrap();
        assert!(parsed.cuts.is_empty());
        assert!(parsed.overlays.is_empty());
        assert_eq!(parsed.export.output_name, "output_final.mp4");
        assert_eq!(parsed.export.encoder.crf, 25);
    }

    #[test]
    fn test_loaded_project_create_and_load() {
        let dir = std::env::temp_dir().join("vgsync_test_project");
        let _ = std::fs::remove_dir_all(&dir);

        let mut created = LoadedProject::create(&dir, "Integration Test", clips()).unwrap();
        assert!(dir.join("cache").is_dir());
        assert!(dir.join("exports").is_dir());

        created.project.cuts.add(5.0, 15.0);
        created.keyframes.merge([0.0, 2.0, 4.0]);
        created.save().unwrap();

        let loaded = LoadedProject::load(&dir).unwrap();
        assert_eq!(loaded.project.name, "Integration Test");
        assert_eq!(loaded.project.cuts.len(), 1);
        assert_eq!(loaded.keyframes.times(), &[0.0, 2.0, 4.0]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_create_rejects_zero_length_clip() {
        let dir = std::env::temp_dir().join("vgsync_test_bad_clip");
        let bad = vec![SourceClip {
            path: "empty.mp4".to_string(),
            duration_secs: 0.0,
        }];
        let err = LoadedProject::create(&dir, "Bad", bad).unwrap_err();
        assert!(matches!(err, ProjectError::ValidationError { .. }));
        assert!(!dir.join("meta").exists());
    }

    #[test]
    fn test_load_missing_project_is_io_error() {
        let err = LoadedProject::load("/definitely/not/a/vgsync/project").unwrap_err();
        assert!(matches!(err, ProjectError::IoError { .. }));
    }

    #[test]
    fn test_validate_sources_reports_missing() {
        let dir = std::env::temp_dir().join("vgsync_test_validate");
        let _ = std::fs::remove_dir_all(&dir);

        let mut loaded = LoadedProject::create(&dir, "Validate Test", clips()).unwrap();
        std::fs::write(dir.join("clip1.mp4"), b"").unwrap();
        loaded.project.cuts.add(90.0, 120.0);

        let errors = loaded.validate_sources();
        assert!(errors.iter().any(|e| e.contains("Clip 2 source missing")));
        assert!(!errors.iter().any(|e| e.contains("Clip 1 source missing")));
        assert!(errors.iter().any(|e| e.contains("outside the media")));

        std::fs::remove_dir_all(&dir).ok();
    }
}
