//! Add a cut to a project.

use std::path::PathBuf;

use vgsync_edit_core::CutController;

use super::load_project;

pub fn run(path: PathBuf, start: f64, end: f64) -> anyhow::Result<()> {
    let mut project = load_project(&path)?;
    let total = project.project.total_duration();

    let mut controller = CutController::with_cuts(project.project.cuts.clone());
    controller.set_mark_b(start.min(end), total)?;
    controller.set_mark_e(start.max(end), total)?;
    let applied = controller.on_cut(total)?;

    project.project.cuts = controller.cuts().clone();
    project.project.touch();
    project
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to save project: {e}"))?;

    let mapper = project.project.time_mapper();
    println!("Cut added: {}", applied.interval);
    println!("  Cuts: {}", project.project.cuts.len());
    println!("  Cut total: {:.3}s", project.project.cuts.total_cut_seconds());
    println!("  Final duration: {:.3}s", mapper.final_duration());

    Ok(())
}
