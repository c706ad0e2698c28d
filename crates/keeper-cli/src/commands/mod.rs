pub mod adjust;
pub mod check;
pub mod damage;
pub mod find;
pub mod play;
pub mod roll;
pub mod sheet;
pub mod skills;

use std::path::Path;

use colored::{ColoredString, Colorize};
use keeper_mechanics::push::PushSession;
use keeper_mechanics::session::describe;
use keeper_mechanics::{
    Attribute, CharacterStore, CheckResult, Difficulty, MechResult, Modifiers, RulesConfig, Tier,
};

/// Dice options as given on the command line.
pub struct RollOptions {
    pub difficulty: String,
    pub bonus: i64,
    pub penalty: i64,
    pub push: bool,
    pub seed: Option<u64>,
    pub json: bool,
}

impl RollOptions {
    fn difficulty(&self) -> Result<Difficulty, String> {
        Difficulty::parse(&self.difficulty).ok_or_else(|| {
            format!(
                "unknown difficulty '{}', use: normal, hard, extreme",
                self.difficulty
            )
        })
    }

    fn modifiers(&self) -> Result<Modifiers, String> {
        Modifiers::new(self.bonus, self.penalty).map_err(|e| e.to_string())
    }
}

/// Load a character sheet into a store.
fn load_store(file: &Path) -> Result<CharacterStore, String> {
    CharacterStore::load(file).map_err(|e| e.to_string())
}

/// Load the rules config, if one was given, and apply a seed override.
fn load_rules(config: Option<&Path>, seed: Option<u64>) -> Result<RulesConfig, String> {
    let rules = match config {
        Some(path) => RulesConfig::load(path).map_err(|e| e.to_string())?,
        None => RulesConfig::default(),
    };
    Ok(match seed {
        Some(seed) => rules.with_seed(seed),
        None => rules,
    })
}

/// Colour a tier with its indicator colour.
fn paint_tier(tier: Tier) -> ColoredString {
    let [r, g, b] = tier.led_rgb();
    tier.label().truecolor(r, g, b).bold()
}

/// What became of a `--push` request.
enum Pushed {
    NotAsked,
    Refused(String),
    Rolled(CheckResult),
}

/// Push a failed result when `--push` was given and the rules allow it.
fn push_if_asked<F>(result: &CheckResult, opts: &RollOptions, roll_push: F) -> Result<Pushed, String>
where
    F: FnOnce(&mut PushSession) -> MechResult<CheckResult>,
{
    if !opts.push || result.outcome.passed {
        return Ok(Pushed::NotAsked);
    }
    match PushSession::open(result.outcome.clone()) {
        Ok(mut push) => roll_push(&mut push)
            .map(Pushed::Rolled)
            .map_err(|e| e.to_string()),
        Err(e) => Ok(Pushed::Refused(e.to_string())),
    }
}

/// Print a check result and whatever happened to its push.
fn report_check(
    subject: &str,
    result: &CheckResult,
    pushed: &Pushed,
    opts: &RollOptions,
) -> Result<(), String> {
    if opts.json {
        let push = match pushed {
            Pushed::Rolled(p) => Some(p),
            _ => None,
        };
        let doc = serde_json::json!({ "check": result, "push": push });
        let text = serde_json::to_string_pretty(&doc).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    print_result("Rolling", subject, result);
    match pushed {
        Pushed::NotAsked => {}
        Pushed::Refused(reason) => println!("  {}", reason.yellow()),
        Pushed::Rolled(p) => {
            println!();
            print_result("Pushing", subject, p);
        }
    }
    Ok(())
}

fn print_result(verb: &str, subject: &str, result: &CheckResult) {
    println!("  {} {subject}", verb.bold());
    println!("  {}", describe(result));
    println!("  {}", paint_tier(result.outcome.tier));
}

/// Short display of a sheet node.
fn render_attribute(node: &Attribute) -> String {
    match node {
        Attribute::Value(v) => v.to_string(),
        Attribute::Number(n) => n.to_string(),
        Attribute::Flag(b) => b.to_string(),
        Attribute::Text(s) if s.is_empty() => "—".to_string(),
        Attribute::Text(s) => s.clone(),
        Attribute::List(items) => format!("[{} items]", items.len()),
        Attribute::Group(children) => format!("{{{} entries}}", children.len()),
        Attribute::Empty => "—".to_string(),
    }
}
