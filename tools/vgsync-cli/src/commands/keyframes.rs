//! Import keyframe times for one clip from ffprobe CSV output.
//!
//! Expected input:
//! `ffprobe -select_streams v -show_entries frame=key_frame,pts_time,pict_type -of csv=p=0 <clip>`

use std::path::PathBuf;

use vgsync_project_model::KeyframeIndex;

use super::load_project;

pub fn run(path: PathBuf, clip: usize, csv: PathBuf) -> anyhow::Result<()> {
    let mut project = load_project(&path)?;

    let clips = project.project.sources.len();
    if clip == 0 || clip > clips {
        anyhow::bail!("Clip number {clip} out of range (project has {clips} clip(s))");
    }
    let index = clip - 1;

    let text = std::fs::read_to_string(&csv)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", csv.display()))?;
    let offset = project.project.sources.clip_offset(index);
    let times = KeyframeIndex::parse_ffprobe_csv(&text, offset);
    if times.is_empty() {
        anyhow::bail!("No key frames found in {}", csv.display());
    }

    let before = project.keyframes.len();
    project.keyframes.merge(times);
    project
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to save project: {e}"))?;

    println!(
        "Imported {} keyframe(s) for clip {clip} (offset {offset:.3}s)",
        project.keyframes.len() - before
    );
    println!("  Total keyframes: {}", project.keyframes.len());

    Ok(())
}
