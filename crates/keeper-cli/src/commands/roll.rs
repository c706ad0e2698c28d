use std::path::Path;

use keeper_mechanics::{RollRequest, perform_check};

use super::RollOptions;

pub fn run(value: i64, opts: &RollOptions, config: Option<&Path>) -> Result<(), String> {
    let rules = super::load_rules(config, opts.seed)?;
    let mut rng = rules.rng();

    let request = RollRequest::new(value)
        .map_err(|e| e.to_string())?
        .with_difficulty(opts.difficulty()?)
        .with_modifiers(opts.modifiers()?);
    let result = perform_check(&request, &rules, &mut rng);
    let pushed = super::push_if_asked(&result, opts, |push| push.push(&rules, &mut rng))?;

    super::report_check(&format!("against {value}"), &result, &pushed, opts)
}
