use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(file: &Path, key: &str) -> Result<(), String> {
    let store = super::load_store(file)?;
    let matches = store.sheet().find_all(key);

    if matches.is_empty() {
        return Err(format!("no attribute named '{key}'"));
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Path", "Value"]);
    for (path, node) in &matches {
        table.add_row(vec![path.clone(), super::render_attribute(node)]);
    }

    println!("{table}");
    if matches.len() > 1 {
        println!();
        println!(
            "  {} matches; '{key}' alone selects {}",
            matches.len(),
            matches[0].0
        );
    }

    Ok(())
}
