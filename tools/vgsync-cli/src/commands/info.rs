//! Show project information.

use std::path::PathBuf;

use super::load_project;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let project = load_project(&path)?;
    let p = &project.project;
    let total = p.total_duration();
    let mapper = p.time_mapper();

    println!("Project: {}", p.name);
    println!("  ID: {}", p.id);
    println!("  Created: {}", p.created_at);
    println!("  Modified: {}", p.modified_at);
    println!();

    println!("Sources:");
    for (i, clip) in p.sources.clips().iter().enumerate() {
        println!(
            "  {}. {} ({:.3}s, starts at {:.3}s)",
            i + 1,
            clip.path,
            clip.duration_secs,
            p.sources.clip_offset(i)
        );
    }
    println!("  Total: {total:.3}s");
    println!("  Keyframes: {}", project.keyframes.len());
    println!();

    println!("Cuts (in the order they were made):");
    if p.cuts.is_empty() {
        println!("  (none)");
    }
    for cut in p.cuts.iter() {
        println!("  {cut}  {:.3}s", cut.len());
    }
    println!("  Cut total (raw): {:.3}s", p.cuts.total_cut_seconds());
    println!("  Cut total (merged): {:.3}s", p.cuts.merged_cut_seconds(total));
    println!("  Final duration: {:.3}s", mapper.final_duration());
    println!();

    println!("Keep regions:");
    for region in mapper.keep_regions() {
        println!(
            "  {region}  -> final {:.3}s",
            mapper.global_to_final(region.start)
        );
    }
    println!();

    println!("Overlays: {}", p.overlays.len());
    println!("Export:");
    println!("  Mode: {:?}", p.export.mode);
    println!("  Output: {}", project.output_path().display());

    Ok(())
}
