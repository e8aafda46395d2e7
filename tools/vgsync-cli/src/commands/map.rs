//! Convert positions between the global and final timelines.

use std::path::PathBuf;

use super::load_project;

pub fn run(path: PathBuf, global: Option<f64>, final_s: Option<f64>) -> anyhow::Result<()> {
    let project = load_project(&path)?;
    let mapper = project.project.time_mapper();

    match (global, final_s) {
        (Some(g), None) => {
            let mapped = mapper.global_to_final(g);
            println!("global {g:.3}s -> final {mapped:.3}s");
            if let Some(cut) = project.project.cuts.contains(g) {
                println!("  (inside cut {cut})");
            }
        }
        (None, Some(f)) => {
            let mapped = mapper.final_to_global(f);
            println!("final {f:.3}s -> global {mapped:.3}s");
        }
        _ => anyhow::bail!("Pass exactly one of --global or --final"),
    }

    Ok(())
}
