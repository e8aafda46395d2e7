//! VGSync Export Engine
//!
//! Turns a project's cut list into an export job:
//! - [`EditMode::Copy`]: an [`ExportPlan`] of stream-copy trim segments plus
//!   a concat step, written as `concat_list.txt` and `export_job.json`
//! - [`EditMode::Encode`]: an [`EncoderJob`] for the external re-encoder
//!
//! Running ffmpeg is left to the caller; [`ffmpeg_available`] reports
//! whether it can.

pub mod encode;
pub mod error;
pub mod plan;

use std::path::PathBuf;
use std::process::Command;

use vgsync_project_model::{EditMode, LoadedProject};

pub use encode::{EncoderJob, ENCODER_JOB_FILE};
pub use error::ExportError;
pub use plan::{
    ExportPlan, ExportSegment, WrittenPlan, CONCAT_LIST_FILE, FFMPEG, JOB_FILE, MIN_SEGMENT_SECS,
};

/// Result of [`prepare_export`].
#[derive(Debug, Clone)]
pub enum PreparedExport {
    Copy { plan: ExportPlan, files: WrittenPlan },
    Encode { job: EncoderJob, path: PathBuf },
}

/// Build and write the export job for the project's edit mode.
pub fn prepare_export(
    loaded: &LoadedProject,
    output: Option<PathBuf>,
) -> Result<PreparedExport, ExportError> {
    tracing::info!(
        project = %loaded.project.name,
        mode = ?loaded.project.export.mode,
        cuts = loaded.project.cuts.len(),
        "Preparing export"
    );

    match loaded.project.export.mode {
        EditMode::Copy => {
            let plan = ExportPlan::for_project(loaded, output)?;
            let files = plan.write()?;
            Ok(PreparedExport::Copy { plan, files })
        }
        EditMode::Encode => {
            let job = EncoderJob::for_project(loaded, output)?;
            let path = job.write_to(&loaded.root.join("cache"))?;
            Ok(PreparedExport::Encode { job, path })
        }
    }
}

/// Whether `ffmpeg` is on `PATH`.
pub fn ffmpeg_available() -> bool {
    command_exists(FFMPEG)
}

fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
