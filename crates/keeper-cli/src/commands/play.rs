use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use keeper_mechanics::Session;

pub fn run(file: &Path, seed: Option<u64>, save: bool, config: Option<&Path>) -> Result<(), String> {
    let store = super::load_store(file)?;
    let rules = super::load_rules(config, seed)?;
    let mut session = Session::new(store, rules);

    println!("  {} {}", "Playing".bold(), session.store().sheet().name());
    if let Some(seed) = session.rules().seed {
        println!("  Seed: {seed}");
    }
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match session.process(input) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
                    break;
                }
            }
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
            }
        }
    }

    let improve = session.skills_to_improve();
    if !improve.is_empty() {
        let names: Vec<&str> = improve.iter().map(String::as_str).collect();
        println!("  Marked for improvement: {}", names.join(", "));
    }

    if save {
        session
            .store()
            .save_to_path(file)
            .map_err(|e| e.to_string())?;
        println!("  Saved {}", file.display());
    }

    Ok(())
}
