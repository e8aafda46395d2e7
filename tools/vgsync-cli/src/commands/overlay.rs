//! Add or remove image overlays.

use std::path::PathBuf;

use vgsync_project_model::{Overlay, OverlayStore};

use super::load_project;

pub enum OverlayEdit {
    Add(Overlay),
    Remove { start: f64, end: f64 },
}

pub fn run(path: PathBuf, edit: OverlayEdit) -> anyhow::Result<()> {
    let mut project = load_project(&path)?;
    let mut store = OverlayStore::from_overlays(std::mem::take(&mut project.project.overlays));

    match edit {
        OverlayEdit::Add(overlay) => {
            let summary = format!("{} [{:.3}s, {:.3}s]", overlay.image, overlay.start, overlay.end);
            if !store.add(overlay) {
                anyhow::bail!("Overlay end must be after its start: {summary}");
            }
            println!("Overlay added: {summary}");
        }
        OverlayEdit::Remove { start, end } => {
            let Some(removed) = store.remove_range(start, end) else {
                anyhow::bail!("No overlay spans [{start:.3}s, {end:.3}s]");
            };
            println!("Overlay removed: {}", removed.image);
        }
    }

    project.project.overlays = store.into_overlays();
    project.project.touch();
    project
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to save project: {e}"))?;
    println!("  Overlays: {}", project.project.overlays.len());

    Ok(())
}
