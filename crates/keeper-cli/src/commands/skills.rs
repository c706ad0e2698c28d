use std::path::Path;

use colored::Colorize;

pub fn run(file: &Path) -> Result<(), String> {
    let store = super::load_store(file)?;
    let skills = store.sheet().list_skills();

    if skills.is_empty() {
        println!("  No skills recorded.");
        return Ok(());
    }

    for entry in &skills {
        let indent = "  ".repeat(entry.depth + 1);
        match entry.value {
            Some(value) => println!("{indent}{:<24} {value:>3}", entry.name),
            None => println!("{indent}{}", entry.name.bold()),
        }
    }
    println!();
    println!(
        "  {} skills",
        skills.iter().filter(|e| e.value.is_some()).count()
    );

    Ok(())
}
