//! Re-encode job description for the external encoder.
//!
//! In [`EditMode::Encode`](vgsync_project_model::EditMode) the editor does
//! not trim anything itself. It hands the encoder a JSON job listing the
//! source videos, the cuts to skip (with a crossfade length) and the
//! overlays to burn in.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vgsync_project_model::{LoadedProject, Overlay};

use crate::error::{write_file, ExportError};

pub const ENCODER_JOB_FILE: &str = "encoder_job.json";

/// Intermediate file the encoder concatenates the sources into.
const MERGED_OUTPUT: &str = "merged.mp4";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderJob {
    pub videos: Vec<String>,

    /// `[start, end, crossfade_secs]` per merged cut, in global seconds.
    pub skip_instructions: Vec<(f64, f64, u32)>,

    pub overlay_instructions: Vec<Overlay>,
    pub merged_output: String,
    pub final_output: String,
    pub hardware_encode: String,

    /// ffmpeg encoder name, e.g. `libx265`.
    pub encoder: String,

    pub crf: u32,
    pub fps: u32,
    pub width: u32,
    pub preset: String,
}

impl EncoderJob {
    pub fn for_project(
        loaded: &LoadedProject,
        output: Option<PathBuf>,
    ) -> Result<Self, ExportError> {
        let project = &loaded.project;
        if project.sources.is_empty() {
            return Err(ExportError::NoSources);
        }
        let total = project.total_duration();
        if project.cuts.merged_keep_regions(total).is_empty() {
            return Err(ExportError::NothingToExport);
        }

        let settings = &project.export.encoder;
        let videos = project
            .sources
            .clips()
            .iter()
            .map(|clip| loaded.root.join(&clip.path).display().to_string())
            .collect();
        let skip_instructions = project
            .cuts
            .merged()
            .into_iter()
            .map(|cut| {
                let cut = cut.clamped(total);
                (cut.start, cut.end, settings.xfade_secs)
            })
            .collect();
        let final_output = output
            .unwrap_or_else(|| loaded.output_path())
            .display()
            .to_string();

        Ok(Self {
            videos,
            skip_instructions,
            overlay_instructions: project.overlays.clone(),
            merged_output: MERGED_OUTPUT.to_string(),
            final_output,
            hardware_encode: settings.hardware.clone(),
            encoder: format!("lib{}", settings.codec),
            crf: settings.crf,
            fps: settings.fps,
            width: settings.width,
            preset: settings.preset.clone(),
        })
    }

    /// Write the job as pretty JSON into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        tracing::info!(
            videos = self.videos.len(),
            skips = self.skip_instructions.len(),
            overlays = self.overlay_instructions.len(),
            encoder = %self.encoder,
            "Writing encoder job"
        );
        let json = serde_json::to_string_pretty(self)?;
        write_file(dir.join(ENCODER_JOB_FILE), &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vgsync_project_model::{Project, SourceClip};

    fn loaded() -> LoadedProject {
        let mut project = Project::new(
            "Encode",
            vec![
                SourceClip {
                    path: "a.mp4".to_string(),
                    duration_secs: 30.0,
                },
                SourceClip {
                    path: "b.mp4".to_string(),
                    duration_secs: 30.0,
                },
            ],
        );
        project.cuts.add(20.0, 25.0);
        project.cuts.add(10.0, 22.0);
        project.overlays.push(Overlay::new(1.0, 4.0, "logo.png"));
        LoadedProject {
            root: PathBuf::from("/proj"),
            project,
            keyframes: Default::default(),
        }
    }

    #[test]
    fn test_job_uses_merged_cuts_and_settings() {
        let job = EncoderJob::for_project(&loaded(), None).unwrap();
        assert_eq!(job.videos, vec!["/proj/a.mp4", "/proj/b.mp4"]);
        assert_eq!(job.skip_instructions, vec![(10.0, 25.0, 2)]);
        assert_eq!(job.encoder, "libx265");
        assert_eq!(job.final_output, "/proj/exports/output_final.mp4");
        assert_eq!(job.overlay_instructions.len(), 1);
    }

    #[test]
    fn test_skip_instructions_serialize_as_triples() {
        let job = EncoderJob::for_project(&loaded(), Some(PathBuf::from("/out.mp4"))).unwrap();
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["skip_instructions"][0], serde_json::json!([10.0, 25.0, 2]));
        assert_eq!(value["final_output"], "/out.mp4");
        assert_eq!(value["overlay_instructions"][0]["image"], "logo.png");
    }

    #[test]
    fn test_all_cut_project_rejected() {
        let mut loaded = loaded();
        loaded.project.cuts.add(0.0, 60.0);
        let err = EncoderJob::for_project(&loaded, None).unwrap_err();
        assert!(matches!(err, ExportError::NothingToExport));
    }
}
