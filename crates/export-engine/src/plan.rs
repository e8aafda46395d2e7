//! Stream-copy export planning.
//!
//! The keep regions of a project are cut into per-clip trim segments,
//! each extracted with `ffmpeg -c copy`, then concatenated with the concat
//! demuxer:
//!
//! ```text
//! keep regions ──► split per clip ──► segment_000.mp4 ... segment_NNN.mp4
//!                                              │
//!                                     concat_list.txt ──► output
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use vgsync_project_model::{IntervalSet, LoadedProject, SourcePlaylist};

use crate::error::{write_file, ExportError};

/// Pieces this short or shorter are dropped from the export.
pub const MIN_SEGMENT_SECS: f64 = 0.01;

pub const CONCAT_LIST_FILE: &str = "concat_list.txt";
pub const JOB_FILE: &str = "export_job.json";
pub const FFMPEG: &str = "ffmpeg";

/// One trimmed piece of a source clip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSegment {
    pub clip_index: usize,
    pub source: PathBuf,
    pub local_start: f64,
    pub local_end: f64,

    /// Position of the segment on the final timeline.
    pub final_start: f64,

    pub output: PathBuf,
}

impl ExportSegment {
    pub fn duration(&self) -> f64 {
        self.local_end - self.local_start
    }

    /// Arguments for the trim invocation, without the program name.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-ss".to_string(),
            format!("{:.3}", self.local_start),
            "-to".to_string(),
            format!("{:.3}", self.local_end),
            "-i".to_string(),
            self.source.display().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            self.output.display().to_string(),
        ]
    }
}

/// Everything needed to produce a stream-copy export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportPlan {
    /// Directory holding segments and the concat list.
    pub work_dir: PathBuf,
    pub output: PathBuf,
    pub segments: Vec<ExportSegment>,
    pub final_duration: f64,
}

/// Paths written by [`ExportPlan::write`].
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenPlan {
    pub concat_list: PathBuf,
    pub job: PathBuf,
}

/// On-disk form of a plan, one argument vector per ffmpeg call.
#[derive(Debug, Serialize)]
struct JobFile<'a> {
    program: &'static str,
    output: &'a Path,
    final_duration: f64,
    segment_commands: Vec<Vec<String>>,
    concat_command: Vec<String>,
}

impl ExportPlan {
    /// Plan the export of `sources` with `cuts` removed.
    ///
    /// Relative clip paths are resolved against `source_root`.
    pub fn build(
        sources: &SourcePlaylist,
        source_root: &Path,
        cuts: &IntervalSet,
        work_dir: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Result<Self, ExportError> {
        if sources.is_empty() {
            return Err(ExportError::NoSources);
        }

        let work_dir = work_dir.into();
        let keep = cuts.merged_keep_regions(sources.total_duration());
        if keep.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        let mut segments = Vec::new();
        let mut final_start = 0.0;
        for region in &keep {
            for span in sources.split_range(region.start, region.end) {
                if span.len() <= MIN_SEGMENT_SECS {
                    tracing::debug!(
                        clip = span.index,
                        start = span.local_start,
                        end = span.local_end,
                        "Skipping sliver segment"
                    );
                    continue;
                }
                let Some(clip) = sources.get(span.index) else {
                    continue;
                };
                let output = work_dir.join(format!("segment_{:03}.mp4", segments.len()));
                segments.push(ExportSegment {
                    clip_index: span.index,
                    source: source_root.join(&clip.path),
                    local_start: span.local_start,
                    local_end: span.local_end,
                    final_start,
                    output,
                });
                final_start += span.len();
            }
        }

        if segments.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        Ok(Self {
            work_dir,
            output: output.into(),
            segments,
            final_duration: final_start,
        })
    }

    /// Plan a project export into `cache/export/`, writing to `output` or
    /// the project's configured output path.
    pub fn for_project(
        loaded: &LoadedProject,
        output: Option<PathBuf>,
    ) -> Result<Self, ExportError> {
        Self::build(
            &loaded.project.sources,
            &loaded.root,
            &loaded.project.cuts,
            loaded.root.join("cache").join("export"),
            output.unwrap_or_else(|| loaded.output_path()),
        )
    }

    pub fn concat_list_path(&self) -> PathBuf {
        self.work_dir.join(CONCAT_LIST_FILE)
    }

    /// Concat demuxer input, one `file '<segment>'` line per segment.
    pub fn concat_list(&self) -> String {
        self.segments
            .iter()
            .map(|segment| format!("file '{}'\n", quote_escape(&segment.output)))
            .collect()
    }

    pub fn concat_args(&self) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            self.concat_list_path().display().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            self.output.display().to_string(),
        ]
    }

    /// All ffmpeg invocations in execution order; the concat call is last.
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.segments
            .iter()
            .map(ExportSegment::ffmpeg_args)
            .chain(std::iter::once(self.concat_args()))
            .collect()
    }

    /// Write `concat_list.txt` and `export_job.json` into the work directory.
    pub fn write(&self) -> Result<WrittenPlan, ExportError> {
        tracing::info!(
            output = %self.output.display(),
            segments = self.segments.len(),
            final_duration = self.final_duration,
            "Writing export plan"
        );

        let concat_list = write_file(self.concat_list_path(), &self.concat_list())?;

        let job = JobFile {
            program: FFMPEG,
            output: &self.output,
            final_duration: self.final_duration,
            segment_commands: self.segments.iter().map(ExportSegment::ffmpeg_args).collect(),
            concat_command: self.concat_args(),
        };
        let json = serde_json::to_string_pretty(&job)?;
        let job = write_file(self.work_dir.join(JOB_FILE), &json)?;

        Ok(WrittenPlan { concat_list, job })
    }
}

/// Escape `'` for a single-quoted concat demuxer path.
fn quote_escape(path: &Path) -> String {
    path.display().to_string().replace('\'', "'\\''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vgsync_project_model::SourceClip;

    fn playlist() -> SourcePlaylist {
        SourcePlaylist::new(vec![
            SourceClip {
                path: "a.mp4".to_string(),
                duration_secs: 60.0,
            },
            SourceClip {
                path: "b.mp4".to_string(),
                duration_secs: 40.0,
            },
        ])
    }

    fn plan(cuts: &IntervalSet) -> Result<ExportPlan, ExportError> {
        ExportPlan::build(
            &playlist(),
            Path::new("/media"),
            cuts,
            "/tmp/work",
            "/out/final.mp4",
        )
    }

    #[test]
    fn test_no_cuts_one_segment_per_clip() {
        let plan = plan(&IntervalSet::new()).unwrap();
        assert_eq!(plan.segments.len(), 2);
        assert!((plan.final_duration - 100.0).abs() < 1e-9);
        assert_eq!(plan.segments[1].source, PathBuf::from("/media/b.mp4"));
        assert!((plan.segments[1].final_start - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_cut_across_clip_boundary() {
        let mut cuts = IntervalSet::new();
        cuts.add(50.0, 70.0);
        let plan = plan(&cuts).unwrap();

        let spans: Vec<_> = plan
            .segments
            .iter()
            .map(|s| (s.clip_index, s.local_start, s.local_end))
            .collect();
        assert_eq!(spans, vec![(0, 0.0, 50.0), (1, 10.0, 40.0)]);
        assert!((plan.final_duration - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_args_use_millisecond_precision() {
        let mut cuts = IntervalSet::new();
        cuts.add(0.0, 1.23456);
        let plan = plan(&cuts).unwrap();
        let args = plan.segments[0].ffmpeg_args();
        assert_eq!(
            args,
            vec![
                "-y",
                "-ss",
                "1.235",
                "-to",
                "60.000",
                "-i",
                "/media/a.mp4",
                "-c",
                "copy",
                "/tmp/work/segment_000.mp4"
            ]
        );
    }

    #[test]
    fn test_sliver_segments_skipped() {
        let mut cuts = IntervalSet::new();
        cuts.add(0.0, 59.995);
        let plan = plan(&cuts).unwrap();
        assert_eq!(plan.segments.len(), 1);
        assert_eq!(plan.segments[0].clip_index, 1);
        assert_eq!(
            plan.segments[0].output,
            PathBuf::from("/tmp/work/segment_000.mp4")
        );
    }

    #[test]
    fn test_everything_cut_is_an_error() {
        let mut cuts = IntervalSet::new();
        cuts.add(0.0, 100.0);
        let err = plan(&cuts).unwrap_err();
        assert!(matches!(err, ExportError::NothingToExport));
        assert_eq!(err.to_string(), "All time ranges are cut! Nothing to export.");
    }

    #[test]
    fn test_empty_playlist_is_an_error() {
        let err = ExportPlan::build(
            &SourcePlaylist::default(),
            Path::new("/"),
            &IntervalSet::new(),
            "/tmp",
            "/out.mp4",
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::NoSources));
    }

    #[test]
    fn test_concat_list_and_final_command() {
        let mut cuts = IntervalSet::new();
        cuts.add(10.0, 20.0);
        let plan = plan(&cuts).unwrap();

        assert_eq!(
            plan.concat_list(),
            "file '/tmp/work/segment_000.mp4'\n\
             file '/tmp/work/segment_001.mp4'\n\
             file '/tmp/work/segment_002.mp4'\n"
        );
        let commands = plan.commands();
        assert_eq!(commands.len(), 4);
        assert_eq!(
            commands[3],
            vec![
                "-y",
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                "/tmp/work/concat_list.txt",
                "-c",
                "copy",
                "/out/final.mp4"
            ]
        );
    }

    #[test]
    fn test_write_creates_list_and_job() {
        let dir = std::env::temp_dir().join("vgsync_test_export_plan");
        let _ = std::fs::remove_dir_all(&dir);

        let mut cuts = IntervalSet::new();
        cuts.add(5.0, 15.0);
        let plan = ExportPlan::build(
            &playlist(),
            Path::new("/media"),
            &cuts,
            &dir,
            dir.join("out.mp4"),
        )
        .unwrap();
        let written = plan.write().unwrap();

        let list = std::fs::read_to_string(&written.concat_list).unwrap();
        assert_eq!(list.lines().count(), 3);

        let job: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&written.job).unwrap()).unwrap();
        assert_eq!(job["program"], "ffmpeg");
        assert_eq!(job["segment_commands"].as_array().unwrap().len(), 3);
        assert_eq!(job["concat_command"][2], "concat");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_concat_list_escapes_single_quotes() {
        let plan = ExportPlan::build(
            &playlist(),
            Path::new("/media"),
            &IntervalSet::new(),
            "/tmp/rider's day",
            "/out/final.mp4",
        )
        .unwrap();
        let first = plan.concat_list().lines().next().unwrap().to_string();
        assert_eq!(first, r"file '/tmp/rider'\''s day/segment_000.mp4'");
    }
}
