use std::path::Path;

use keeper_mechanics::Session;

use super::RollOptions;

pub fn run(
    file: &Path,
    skill: &str,
    opts: &RollOptions,
    config: Option<&Path>,
) -> Result<(), String> {
    let store = super::load_store(file)?;
    let rules = super::load_rules(config, opts.seed)?;
    let mut session = Session::new(store, rules);

    let result = session
        .skill_check(skill, opts.difficulty()?, opts.modifiers()?)
        .map_err(|e| e.to_string())?;
    let pushed = super::push_if_asked(&result, opts, |push| session.push(push))?;

    let subject = format!("{skill} for {}", session.store().sheet().name());
    super::report_check(&subject, &result, &pushed, opts)
}
