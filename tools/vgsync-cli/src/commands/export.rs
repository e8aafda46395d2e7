//! Write the export job for a project.

use std::path::PathBuf;

use vgsync_export_engine::{ffmpeg_available, prepare_export, PreparedExport, FFMPEG};

use super::load_project;

pub fn run(path: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    println!("Exporting project at: {}", path.display());

    let project = load_project(&path)?;
    let prepared = prepare_export(&project, output)
        .map_err(|e| anyhow::anyhow!("Export failed: {e}"))?;

    match prepared {
        PreparedExport::Copy { plan, files } => {
            println!("  Mode: stream copy");
            println!("  Output: {}", plan.output.display());
            println!("  Segments: {}", plan.segments.len());
            println!("  Final duration: {:.3}s", plan.final_duration);
            println!("  Concat list: {}", files.concat_list.display());
            println!("  Job file: {}", files.job.display());
            println!();
            println!("Commands:");
            for args in plan.commands() {
                println!("  {FFMPEG} {}", args.join(" "));
            }
        }
        PreparedExport::Encode { job, path } => {
            println!("  Mode: re-encode ({})", job.encoder);
            println!("  Output: {}", job.final_output);
            println!("  Skips: {}", job.skip_instructions.len());
            println!("  Overlays: {}", job.overlay_instructions.len());
            println!("  Job file: {}", path.display());
        }
    }

    if !ffmpeg_available() {
        println!();
        println!("[WARN] {FFMPEG} not found in PATH; the job cannot be run on this machine.");
    }

    Ok(())
}
