//! A play session for one character.
//!
//! `Session` owns the character store, the rules, and the random source, and
//! remembers which skills were used successfully for the development phase.
//! [`Session::process`] drives it from text commands.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::check::{CheckResult, RollRequest, perform_check};
use crate::config::RulesConfig;
use crate::damage::{self, DamageBonus, DamageExpr};
use crate::dice::{Modifiers, RandomSource};
use crate::error::{MechError, MechResult};
use crate::push::PushSession;
use crate::resolution::{Difficulty, RollOutcome};
use crate::sheet::{CharacterStore, Resource, SKILLS};

/// Damage used when no weapon is named.
pub const UNARMED_DAMAGE: &str = "1D3+DB";

/// One rolled damage result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRoll {
    /// Weapon the damage was rolled for.
    pub weapon: String,
    /// The expression that was rolled.
    pub expr: DamageExpr,
    /// Total damage, including any damage bonus.
    pub total: i32,
}

/// A character, the rules, and the dice.
pub struct Session<R = StdRng> {
    store: CharacterStore,
    rules: RulesConfig,
    rng: R,
    skills_to_improve: BTreeSet<String>,
    last_outcome: Option<RollOutcome>,
}

impl Session<StdRng> {
    /// Start a session, seeding from the config or from OS entropy.
    pub fn new(store: CharacterStore, rules: RulesConfig) -> Self {
        let rng = rules.rng();
        Self::with_rng(store, rules, rng)
    }
}

impl<R: RandomSource> Session<R> {
    /// Start a session with an explicit random source.
    pub fn with_rng(store: CharacterStore, rules: RulesConfig, rng: R) -> Self {
        info!(
            character = store.sheet().name(),
            seed = ?rules.seed,
            "session started"
        );
        Self {
            store,
            rules,
            rng,
            skills_to_improve: BTreeSet::new(),
            last_outcome: None,
        }
    }

    /// The character store.
    pub fn store(&self) -> &CharacterStore {
        &self.store
    }

    /// Mutable access to the character store.
    pub fn store_mut(&mut self) -> &mut CharacterStore {
        &mut self.store
    }

    /// Take the store back, ending the session.
    pub fn into_store(self) -> CharacterStore {
        self.store
    }

    /// The rules in effect.
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Skills used successfully this session, ready for improvement checks.
    pub fn skills_to_improve(&self) -> &BTreeSet<String> {
        &self.skills_to_improve
    }

    /// The character's damage bonus.
    pub fn damage_bonus(&self) -> DamageBonus {
        self.store.damage_bonus()
    }

    /// Check a skill or characteristic from the sheet.
    ///
    /// `path_or_key` is tried as a dotted path (`Skills.Fighting.Brawl`),
    /// then as a path under `Skills` (`Fighting.Brawl`), then as a key
    /// searched across the whole sheet.
    pub fn skill_check(
        &mut self,
        path_or_key: &str,
        difficulty: Difficulty,
        modifiers: Modifiers,
    ) -> MechResult<CheckResult> {
        let value = self.store.sheet().value_of(path_or_key)?;
        let (name, _) = self.store.sheet().locate(path_or_key)?;
        let request = RollRequest::new(value)?
            .with_difficulty(difficulty)
            .with_modifiers(modifiers);
        let result = self.roll(&request);
        let skill = name
            .strip_prefix(SKILLS)
            .map(|rest| rest.trim_start_matches('.'));
        if let Some(skill) = skill.filter(|_| result.outcome.passed) {
            debug!(skill, "marked for improvement");
            self.skills_to_improve.insert(skill.to_string());
        }
        Ok(result)
    }

    /// Check against a bare value, without the sheet.
    pub fn roll_against(
        &mut self,
        skill_value: i64,
        difficulty: Difficulty,
        modifiers: Modifiers,
    ) -> MechResult<CheckResult> {
        let request = RollRequest::new(skill_value)?
            .with_difficulty(difficulty)
            .with_modifiers(modifiers);
        Ok(self.roll(&request))
    }

    /// Attack with a weapon from the sheet, checking the skill it names.
    pub fn attack(
        &mut self,
        weapon: &str,
        difficulty: Difficulty,
        modifiers: Modifiers,
    ) -> MechResult<CheckResult> {
        let weapon = self.store.sheet().weapon(weapon)?;
        let skill = weapon.skill.ok_or_else(|| {
            MechError::MissingAttribute(format!("skill for weapon '{}'", weapon.name))
        })?;
        debug!(weapon = %weapon.name, %skill, "attack");
        self.skill_check(&skill, difficulty, modifiers)
    }

    /// Open a push on an outcome.
    pub fn open_push(&self, outcome: RollOutcome) -> MechResult<PushSession> {
        PushSession::open(outcome)
    }

    /// Roll a push.
    pub fn push(&mut self, push: &mut PushSession) -> MechResult<CheckResult> {
        let result = push.push(&self.rules, &mut self.rng)?;
        self.last_outcome = Some(result.outcome.clone());
        Ok(result)
    }

    /// Roll damage for a weapon on the sheet, or unarmed when `None`.
    pub fn roll_damage(&mut self, weapon: Option<&str>) -> MechResult<DamageRoll> {
        let (weapon, text) = match weapon {
            Some(name) => {
                let weapon = self.store.sheet().weapon(name)?;
                let text = weapon.damage.ok_or_else(|| {
                    MechError::MissingAttribute(format!("damage for weapon '{}'", weapon.name))
                })?;
                (weapon.name, text)
            }
            None => ("Unarmed".to_string(), UNARMED_DAMAGE.to_string()),
        };
        let expr = DamageExpr::parse(&text)?;
        let total = damage::roll_damage(&expr, &self.store.damage_bonus(), &mut self.rng)?;
        Ok(DamageRoll {
            weapon,
            expr,
            total,
        })
    }

    fn roll(&mut self, request: &RollRequest) -> CheckResult {
        let result = perform_check(request, &self.rules, &mut self.rng);
        self.last_outcome = Some(result.outcome.clone());
        result
    }

    /// Process a line of user input and return a response.
    pub fn process(&mut self, input: &str) -> MechResult<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        let (cmd, rest) = match trimmed.split_once(' ') {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (trimmed.to_lowercase(), ""),
        };

        if let Some(resource) = Resource::parse(&cmd) {
            return self.do_adjust(resource, rest);
        }

        match cmd.as_str() {
            "check" => self.do_check(rest),
            "roll" => self.do_roll(rest),
            "attack" => self.do_attack(rest),
            "push" => self.do_push(),
            "damage" => self.do_damage(rest),
            "status" => Ok(self.do_status()),
            "skills" => Ok(self.do_skills()),
            "improve" => Ok(self.do_improve()),
            "help" => Ok(HELP.to_string()),
            "quit" | "q" => Ok("Goodbye!".to_string()),
            other => Err(MechError::InvalidInput(format!(
                "unknown command '{other}', type 'help' for commands"
            ))),
        }
    }

    fn do_check(&mut self, rest: &str) -> MechResult<String> {
        let (skill, difficulty, modifiers) = parse_check_args(rest)?;
        if skill.is_empty() {
            return Err(MechError::InvalidInput(
                "usage: check <skill> [hard|extreme] [+N] [-N]".to_string(),
            ));
        }
        let result = self.skill_check(&skill, difficulty, modifiers)?;
        Ok(format!("{skill}: {}", describe(&result)))
    }

    fn do_roll(&mut self, rest: &str) -> MechResult<String> {
        let (value, difficulty, modifiers) = parse_check_args(rest)?;
        let value: i64 = value.parse().map_err(|_| {
            MechError::InvalidInput("usage: roll <value> [hard|extreme] [+N] [-N]".to_string())
        })?;
        let result = self.roll_against(value, difficulty, modifiers)?;
        Ok(describe(&result))
    }

    fn do_attack(&mut self, rest: &str) -> MechResult<String> {
        let (weapon, difficulty, modifiers) = parse_check_args(rest)?;
        if weapon.is_empty() {
            return Err(MechError::InvalidInput(
                "usage: attack <weapon> [hard|extreme] [+N] [-N]".to_string(),
            ));
        }
        let result = self.attack(&weapon, difficulty, modifiers)?;
        let mut out = format!("{weapon}: {}", describe(&result));
        if result.outcome.passed {
            let roll = self.roll_damage(Some(weapon.as_str()))?;
            out.push_str(&format!("\n{} ({}): {} damage", roll.weapon, roll.expr, roll.total));
        }
        Ok(out)
    }

    fn do_push(&mut self) -> MechResult<String> {
        let outcome = self
            .last_outcome
            .take()
            .ok_or_else(|| MechError::PushNotAllowed("nothing has been rolled yet".to_string()))?;
        let mut push = self.open_push(outcome)?;
        let result = self.push(&mut push)?;
        Ok(format!("Pushed: {}", describe(&result)))
    }

    fn do_damage(&mut self, rest: &str) -> MechResult<String> {
        let weapon = if rest.is_empty() { None } else { Some(rest) };
        let roll = self.roll_damage(weapon)?;
        Ok(format!("{} ({}): {} damage", roll.weapon, roll.expr, roll.total))
    }

    fn do_adjust(&mut self, resource: Resource, rest: &str) -> MechResult<String> {
        let delta: i64 = rest.parse().map_err(|_| {
            MechError::InvalidInput(format!("usage: {} <+N|-N>", resource.label().to_lowercase()))
        })?;
        let updated = self.store.adjust(resource, delta)?;
        Ok(format!("{resource}: {updated} ({delta:+})"))
    }

    fn do_status(&self) -> String {
        let sheet = self.store.sheet();
        let mut out = format!("{}\n", sheet.name());
        for track in sheet.tracks() {
            out.push_str(&format!("  {track}\n"));
        }
        out.push_str(&format!("  Damage Bonus: {}", self.damage_bonus()));
        out
    }

    fn do_skills(&self) -> String {
        self.store
            .sheet()
            .list_skills()
            .iter()
            .map(|entry| {
                let indent = "  ".repeat(entry.depth);
                match entry.value {
                    Some(value) => format!("{indent}{} {value}", entry.name),
                    None => format!("{indent}{}", entry.name),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn do_improve(&self) -> String {
        if self.skills_to_improve.is_empty() {
            return "No skills marked for improvement.".to_string();
        }
        let names: Vec<&str> = self.skills_to_improve.iter().map(String::as_str).collect();
        format!("Marked for improvement: {}", names.join(", "))
    }
}

const HELP: &str = "\
Commands:
  check <skill> [hard|extreme] [+N] [-N]   Skill check (+N bonus, -N penalty dice)
  roll <value> [hard|extreme] [+N] [-N]    Check against a bare value
  attack <weapon> [hard|extreme] [+N] [-N] Weapon skill check, damage on a hit
  push                                     Push the last failed roll
  damage [weapon]                          Roll damage (unarmed if no weapon)
  hp|mp|san|luck <+N|-N>                   Adjust a resource
  status                                   Show resources
  skills                                   List skills
  improve                                  Skills marked for improvement
  help                                     Show this help
  quit                                     Exit";

/// One line describing a check result.
pub fn describe(result: &CheckResult) -> String {
    let outcome = &result.outcome;
    let mut line = outcome.to_string();
    if !result.roll.tens_pool.is_empty() {
        line.push_str(&format!(" [tens {:?}]", result.roll.tens_pool));
    }
    if outcome.pushable {
        line.push_str(" - push available");
    }
    line
}

/// Split `<subject...> [normal|hard|extreme] [+N] [-N]`, reading options
/// from the end so skill names may contain spaces. Each option may appear
/// once.
fn parse_check_args(input: &str) -> MechResult<(String, Difficulty, Modifiers)> {
    let mut words: Vec<&str> = input.split_whitespace().collect();
    let mut difficulty = None;
    let mut bonus = None;
    let mut penalty = None;

    while let Some(&last) = words.last() {
        if let Some(d) = Difficulty::parse(last) {
            set_once(&mut difficulty, d, last)?;
        } else if let Some(n) = last.strip_prefix('+') {
            set_once(&mut bonus, parse_count(n, last)?, last)?;
        } else if let Some(n) = last.strip_prefix('-') {
            set_once(&mut penalty, parse_count(n, last)?, last)?;
        } else {
            break;
        }
        words.pop();
    }

    let modifiers = Modifiers::new(bonus.unwrap_or(0), penalty.unwrap_or(0))?;
    Ok((
        words.join(" "),
        difficulty.unwrap_or(Difficulty::Normal),
        modifiers,
    ))
}

fn set_once<T>(slot: &mut Option<T>, value: T, word: &str) -> MechResult<()> {
    if slot.is_some() {
        return Err(MechError::InvalidInput(format!("'{word}' repeats an option")));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_count(digits: &str, word: &str) -> MechResult<i64> {
    digits
        .parse()
        .map_err(|_| MechError::InvalidInput(format!("'{word}' is not a dice count")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedRolls;
    use crate::resolution::Tier;
    use crate::sheet::tests::harvey;

    fn session(rolls: Vec<u32>) -> Session<ScriptedRolls> {
        let store = CharacterStore::new(harvey()).unwrap();
        Session::with_rng(store, RulesConfig::default(), ScriptedRolls::new(rolls))
    }

    #[test]
    fn skill_check_by_key_and_path() {
        let mut s = session(vec![45]);
        let result = s
            .skill_check("Spot Hidden", Difficulty::Normal, Modifiers::NONE)
            .unwrap();
        assert_eq!(result.outcome.request.skill_value, 60);
        assert_eq!(result.outcome.tier, Tier::Success);

        let result = s
            .skill_check("Skills.Fighting.Sword", Difficulty::Normal, Modifiers::NONE)
            .unwrap();
        assert_eq!(result.outcome.request.skill_value, 20);
        assert!(!result.outcome.passed);
    }

    #[test]
    fn passes_are_marked_for_improvement() {
        let mut s = session(vec![10, 90]);
        s.skill_check("Brawl", Difficulty::Normal, Modifiers::NONE)
            .unwrap();
        s.skill_check("Library Use", Difficulty::Normal, Modifiers::NONE)
            .unwrap();
        let marked: Vec<_> = s.skills_to_improve().iter().cloned().collect();
        assert_eq!(marked, vec!["Fighting.Brawl"]);
    }

    #[test]
    fn every_listed_skill_can_be_checked() {
        let leaves: Vec<_> = harvey()
            .list_skills()
            .into_iter()
            .filter(|e| e.value.is_some())
            .collect();
        let mut s = session(vec![1]);
        for entry in &leaves {
            let result = s
                .skill_check(&entry.qualified_name, Difficulty::Normal, Modifiers::NONE)
                .unwrap();
            assert_eq!(Some(i64::from(result.outcome.request.skill_value)), entry.value);
        }
        let marked: Vec<_> = s.skills_to_improve().iter().cloned().collect();
        let listed: Vec<_> = leaves.into_iter().map(|e| e.qualified_name).collect();
        assert_eq!(marked, listed);
    }

    #[test]
    fn attack_uses_the_weapon_skill() {
        let mut s = session(vec![30]);
        let result = s
            .attack("unarmed", Difficulty::Normal, Modifiers::NONE)
            .unwrap();
        assert_eq!(result.outcome.request.skill_value, 45);
        assert!(result.outcome.passed);
        assert!(s.skills_to_improve().contains("Fighting.Brawl"));

        let result = s
            .attack(".38 Revolver", Difficulty::Normal, Modifiers::NONE)
            .unwrap();
        assert_eq!(result.outcome.request.skill_value, 30);
        assert!(s.attack("Elephant Gun", Difficulty::Normal, Modifiers::NONE).is_err());
    }

    #[test]
    fn attack_without_a_skill_fails() {
        let doc = crate::sheet::tests::HARVEY.replace(
            "\"Damage\": \"1D10\", \"Skill\": \"Firearms.Handgun\"",
            "\"Damage\": \"1D10\"",
        );
        let sheet = crate::sheet::CharacterSheet::from_json_str(&doc).unwrap();
        let store = CharacterStore::new(sheet).unwrap();
        let mut s = Session::with_rng(store, RulesConfig::default(), ScriptedRolls::new(vec![5]));
        assert!(matches!(
            s.attack(".38 Revolver", Difficulty::Normal, Modifiers::NONE),
            Err(MechError::MissingAttribute(_))
        ));
    }

    #[test]
    fn process_attack_rolls_damage_on_a_hit() {
        // 30 hits Brawl 45, then 1D3 shows 2 and the +1D4 bonus shows 3.
        let mut s = session(vec![30, 2, 3]);
        let out = s.process("attack Unarmed").unwrap();
        assert!(out.starts_with("Unarmed: 30 vs 45 (Normal): Success"), "{out}");
        assert!(out.ends_with("Unarmed (1D3+DB): 5 damage"), "{out}");

        let mut s = session(vec![90]);
        let out = s.process("attack Unarmed").unwrap();
        assert!(!out.contains("damage"), "{out}");
        assert!(s.process("attack").is_err());
    }

    #[test]
    fn characteristic_checks_are_not_marked() {
        let mut s = session(vec![5]);
        let result = s
            .skill_check("DEX", Difficulty::Normal, Modifiers::NONE)
            .unwrap();
        assert!(result.outcome.passed);
        assert!(s.skills_to_improve().is_empty());
    }

    #[test]
    fn unknown_skill_fails() {
        let mut s = session(vec![5]);
        assert!(matches!(
            s.skill_check("Cthulhu Mythos", Difficulty::Normal, Modifiers::NONE),
            Err(MechError::MissingAttribute(_))
        ));
        assert!(matches!(
            s.skill_check("Fighting", Difficulty::Normal, Modifiers::NONE),
            Err(MechError::NotANumber(_))
        ));
    }

    #[test]
    fn roll_against_checks_range() {
        let mut s = session(vec![30]);
        assert!(matches!(
            s.roll_against(150, Difficulty::Normal, Modifiers::NONE),
            Err(MechError::InvalidSkillValue(150))
        ));
        let result = s
            .roll_against(50, Difficulty::Hard, Modifiers::NONE)
            .unwrap();
        assert_eq!(result.outcome.tier, Tier::Success);
        assert!(!result.outcome.passed);
        assert!(result.outcome.pushable);
    }

    #[test]
    fn push_lifecycle() {
        let mut s = session(vec![80, 12]);
        let first = s
            .roll_against(40, Difficulty::Normal, Modifiers::NONE)
            .unwrap();
        let mut push = s.open_push(first.outcome).unwrap();
        let pushed = s.push(&mut push).unwrap();
        assert_eq!(pushed.outcome.raw_roll, 12);
        assert!(pushed.outcome.pushed);
        assert!(matches!(
            s.push(&mut push),
            Err(MechError::PushNotAllowed(_))
        ));
        assert!(s.open_push(pushed.outcome).is_err());
    }

    #[test]
    fn damage_rolls() {
        // Harvey's STR + SIZ is 125: +1D4.
        let mut s = session(vec![2, 3]);
        let unarmed = s.roll_damage(None).unwrap();
        assert_eq!(unarmed.weapon, "Unarmed");
        assert_eq!(unarmed.total, 5);

        let mut s = session(vec![7]);
        let revolver = s.roll_damage(Some(".38 revolver")).unwrap();
        assert_eq!(revolver.weapon, ".38 Revolver");
        assert_eq!(revolver.total, 7);

        assert!(s.roll_damage(Some("Elephant Gun")).is_err());
    }

    #[test]
    fn seeded_sessions_repeat() {
        let rules = RulesConfig::default().with_seed(1920);
        let mut a = Session::new(CharacterStore::new(harvey()).unwrap(), rules.clone());
        let mut b = Session::new(CharacterStore::new(harvey()).unwrap(), rules);
        for _ in 0..20 {
            let ra = a
                .skill_check("Spot Hidden", Difficulty::Normal, Modifiers::bonus(1))
                .unwrap();
            let rb = b
                .skill_check("Spot Hidden", Difficulty::Normal, Modifiers::bonus(1))
                .unwrap();
            assert_eq!(ra, rb);
        }
    }

    #[test]
    fn parse_check_arguments() {
        let (skill, d, m) = parse_check_args("Spot Hidden hard +1").unwrap();
        assert_eq!(skill, "Spot Hidden");
        assert_eq!(d, Difficulty::Hard);
        assert_eq!(m, Modifiers::bonus(1));

        let (skill, d, m) = parse_check_args("Library Use -2").unwrap();
        assert_eq!(skill, "Library Use");
        assert_eq!(d, Difficulty::Normal);
        assert_eq!(m, Modifiers::penalty(2));

        assert!(parse_check_args("Spot Hidden +x").is_err());
    }

    #[test]
    fn repeated_check_options_are_rejected() {
        for input in [
            "Spot Hidden +1 +2",
            "Spot Hidden -1 -1",
            "Spot Hidden hard extreme",
            "Spot Hidden +1 hard +1",
        ] {
            assert!(
                matches!(parse_check_args(input), Err(MechError::InvalidInput(_))),
                "{input}"
            );
        }
        let (_, d, m) = parse_check_args("Spot Hidden +1 -1 hard").unwrap();
        assert_eq!(d, Difficulty::Hard);
        assert_eq!(m.net(), 0);
    }

    #[test]
    fn process_commands() {
        let mut s = session(vec![45]);
        let out = s.process("check Spot Hidden").unwrap();
        assert!(out.starts_with("Spot Hidden: 45 vs 60 (Normal): Success"));

        assert_eq!(s.process("hp -4").unwrap(), "Hit Points: 8 (-4)");
        assert_eq!(s.process("SAN +2").unwrap(), "Sanity: 57 (+2)");
        assert!(s.process("status").unwrap().contains("Hit Points: 8/12"));
        assert!(s.process("skills").unwrap().contains("  Brawl 45"));
        assert!(s.process("improve").unwrap().contains("Spot Hidden"));
        assert_eq!(s.process("").unwrap(), "");
        assert!(matches!(
            s.process("dance"),
            Err(MechError::InvalidInput(_))
        ));
        assert!(s.process("hp lots").is_err());
    }

    #[test]
    fn process_push_uses_last_roll() {
        let mut s = session(vec![70, 20]);
        assert!(matches!(
            s.process("push"),
            Err(MechError::PushNotAllowed(_))
        ));
        let out = s.process("roll 40").unwrap();
        assert!(out.ends_with("push available"));
        let out = s.process("push").unwrap();
        assert!(out.starts_with("Pushed: 20 vs 40"));
        assert!(s.process("push").is_err());
    }
}
