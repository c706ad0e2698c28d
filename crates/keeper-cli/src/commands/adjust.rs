use std::path::Path;

use colored::Colorize;
use keeper_mechanics::sheet::store::parse_resource;

pub fn run(file: &Path, resource: &str, delta: i64, write: bool) -> Result<(), String> {
    let mut store = super::load_store(file)?;
    let resource = parse_resource(resource).map_err(|e| e.to_string())?;

    let before = store.sheet().current(resource).map_err(|e| e.to_string())?;
    let after = store.adjust(resource, delta).map_err(|e| e.to_string())?;

    let change = format!("{delta:+}");
    let change = if delta < 0 { change.red() } else { change.green() };
    println!("  {resource}: {before} -> {} ({change})", after.to_string().bold());
    if store.sheet().track(resource).is_some_and(|t| t.is_depleted()) {
        println!("  {}", format!("{resource} depleted").yellow());
    }

    if write {
        store.save_to_path(file).map_err(|e| e.to_string())?;
        println!("  Saved {}", file.display());
    }

    Ok(())
}
