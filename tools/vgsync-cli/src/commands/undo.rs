//! Remove the most recent cut.

use std::path::PathBuf;

use vgsync_edit_core::CutController;

use super::load_project;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let mut project = load_project(&path)?;

    let mut controller = CutController::with_cuts(project.project.cuts.clone());
    let Some((removed, _)) = controller.on_undo() else {
        println!("Nothing to undo.");
        return Ok(());
    };

    project.project.cuts = controller.cuts().clone();
    project.project.touch();
    project
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to save project: {e}"))?;

    println!("Removed cut: {removed}");
    println!("  Cuts left: {}", project.project.cuts.len());
    println!(
        "  Final duration: {:.3}s",
        project.project.time_mapper().final_duration()
    );

    Ok(())
}
