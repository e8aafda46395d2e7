//! Initialize a new VGSync project.

use std::path::PathBuf;

use vgsync_project_model::{LoadedProject, SourceClip};

/// Parse `path:duration_secs`. The last `:` separates the duration so
/// paths containing colons still work.
pub fn parse_clip(arg: &str) -> Result<SourceClip, String> {
    let (path, secs) = arg
        .rsplit_once(':')
        .ok_or_else(|| format!("expected PATH:SECONDS, got '{arg}'"))?;
    if path.is_empty() {
        return Err(format!("missing clip path in '{arg}'"));
    }
    let duration_secs: f64 = secs
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration '{secs}' in '{arg}'"))?;
    if !(duration_secs > 0.0) {
        return Err(format!("clip duration must be positive, got {duration_secs}"));
    }
    Ok(SourceClip {
        path: path.to_string(),
        duration_secs,
    })
}

pub fn run(name: String, output: PathBuf, clips: Vec<SourceClip>) -> anyhow::Result<()> {
    let project_dir = output.join(&name);
    println!("Creating project '{}' at {}", name, project_dir.display());

    let project = LoadedProject::create(&project_dir, &name, clips)
        .map_err(|e| anyhow::anyhow!("Failed to create project: {e}"))?;

    println!("Project created successfully:");
    println!("  Directory: {}", project.root.display());
    println!("  Clips: {}", project.project.sources.len());
    println!("  Duration: {:.3}s", project.project.total_duration());
    println!();
    println!("Directory structure:");
    println!("  {}/", name);
    println!("  ├── meta/        (project.json, keyframes.json)");
    println!("  ├── cache/       (export work files)");
    println!("  └── exports/     (rendered output)");

    Ok(())
}
