use std::path::Path;

use colored::Colorize;
use keeper_mechanics::Session;

pub fn run(
    file: &Path,
    weapon: Option<&str>,
    seed: Option<u64>,
    config: Option<&Path>,
) -> Result<(), String> {
    let store = super::load_store(file)?;
    let rules = super::load_rules(config, seed)?;
    let mut session = Session::new(store, rules);

    let roll = session.roll_damage(weapon).map_err(|e| e.to_string())?;
    println!("  {} {} ({})", "Damage".bold(), roll.weapon, roll.expr);
    println!("  Damage Bonus: {}", session.damage_bonus());
    println!("  {} damage", roll.total.to_string().bold());

    Ok(())
}
