pub mod cut;
pub mod export;
pub mod info;
pub mod init;
pub mod keyframes;
pub mod map;
pub mod overlay;
pub mod simulate;
pub mod undo;
pub mod validate;

use std::path::Path;

use vgsync_project_model::LoadedProject;

pub(crate) fn load_project(path: &Path) -> anyhow::Result<LoadedProject> {
    LoadedProject::load(path).map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))
}
