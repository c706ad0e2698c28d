use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use keeper_mechanics::Resource;
use keeper_mechanics::sheet::CHARACTERISTICS;

pub fn run(file: &Path) -> Result<(), String> {
    let store = super::load_store(file)?;
    let sheet = store.sheet();

    println!("  {}", sheet.name().bold());
    let mut details = Vec::new();
    if let Some(age) = sheet.age() {
        details.push(format!("age {age}"));
    }
    if let Some(pronoun) = sheet.pronoun() {
        details.push(pronoun.to_string());
    }
    if !details.is_empty() {
        println!("  {}", details.join(", ").dimmed());
    }
    if let Some(pulp) = sheet.pulp() {
        if let Some(archetype) = &pulp.archetype {
            println!("  Archetype: {archetype}");
        }
        if !pulp.talents.is_empty() {
            println!("  Talents: {}", pulp.talents.join(", "));
        }
    }
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Characteristic", "Value"]);
    if let Ok(characteristics) = sheet.resolve(CHARACTERISTICS) {
        for (name, node) in characteristics.as_group().into_iter().flatten() {
            // Resources are listed as tracks below.
            if Resource::parse(name).is_some() {
                continue;
            }
            if let Some(value) = node.as_int() {
                table.add_row(vec![name.clone(), value.to_string()]);
            }
        }
    }
    for track in sheet.tracks() {
        let value = match track.max {
            Some(max) => format!("{}/{max}", track.current),
            None => track.current.to_string(),
        };
        table.add_row(vec![track.name, value]);
    }
    table.add_row(vec!["Damage Bonus".to_string(), store.damage_bonus().to_string()]);
    println!("{table}");

    let weapons = sheet.weapons();
    if !weapons.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Weapon", "Damage", "Skill"]);
        for weapon in weapons {
            table.add_row(vec![
                weapon.name,
                weapon.damage.unwrap_or_else(|| "—".to_string()),
                weapon.skill.unwrap_or_else(|| "—".to_string()),
            ]);
        }
        println!();
        println!("{table}");
    }

    Ok(())
}
