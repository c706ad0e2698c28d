//! Skill checks: requests, results, and the roll-then-classify step.

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::dice::{Modifiers, PercentileRoll, RandomSource, roll_percentile};
use crate::error::{MechError, MechResult};
use crate::resolution::{self, Difficulty, RollOutcome};

/// A request to perform a percentile check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRequest {
    /// Skill or characteristic value being tested (0-100).
    pub skill_value: u32,
    /// Difficulty the check is made at.
    pub difficulty: Difficulty,
    /// Bonus and penalty dice.
    pub modifiers: Modifiers,
}

impl RollRequest {
    /// A Normal-difficulty request with no modifiers.
    pub fn new(skill_value: i64) -> MechResult<Self> {
        let skill_value = u32::try_from(skill_value)
            .ok()
            .filter(|v| *v <= 100)
            .ok_or(MechError::InvalidSkillValue(skill_value))?;
        Ok(Self {
            skill_value,
            difficulty: Difficulty::Normal,
            modifiers: Modifiers::NONE,
        })
    }

    /// Set the difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the bonus and penalty dice.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// The dice and classification of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The percentile roll, including the tens pool when modified.
    pub roll: PercentileRoll,
    /// The classified outcome.
    pub outcome: RollOutcome,
}

/// Roll and classify a check.
pub fn perform_check<R: RandomSource + ?Sized>(
    request: &RollRequest,
    rules: &RulesConfig,
    rng: &mut R,
) -> CheckResult {
    let roll = roll_percentile(request.modifiers, rules, rng);
    let outcome = resolution::classify(request, roll.value, rules);
    CheckResult { roll, outcome }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedRolls;
    use crate::resolution::Tier;

    #[test]
    fn request_rejects_out_of_range_skill() {
        assert!(matches!(
            RollRequest::new(101),
            Err(MechError::InvalidSkillValue(101))
        ));
        assert!(matches!(
            RollRequest::new(-5),
            Err(MechError::InvalidSkillValue(-5))
        ));
        assert_eq!(RollRequest::new(0).unwrap().skill_value, 0);
        assert_eq!(RollRequest::new(100).unwrap().skill_value, 100);
    }

    #[test]
    fn plain_check_scripted() {
        let request = RollRequest::new(60).unwrap();
        let mut script = ScriptedRolls::new(vec![45]);
        let result = perform_check(&request, &RulesConfig::default(), &mut script);
        assert_eq!(result.outcome.raw_roll, 45);
        assert_eq!(result.outcome.tier, Tier::Success);
        assert_eq!(script.draws(), 1);
    }

    #[test]
    fn bonus_check_scripted() {
        let request = RollRequest::new(80)
            .unwrap()
            .with_modifiers(Modifiers::bonus(1));
        let mut script = ScriptedRolls::new(vec![3, 2, 5]);
        let result = perform_check(&request, &RulesConfig::default(), &mut script);
        assert_eq!(result.roll.tens, Some(20));
        assert_eq!(result.outcome.raw_roll, 23);
        assert_eq!(result.outcome.tier, Tier::HardSuccess);
    }

    #[test]
    fn outcome_carries_request() {
        let request = RollRequest::new(35)
            .unwrap()
            .with_difficulty(Difficulty::Hard)
            .with_modifiers(Modifiers::penalty(2));
        let mut script = ScriptedRolls::new(vec![5]);
        let result = perform_check(&request, &RulesConfig::default(), &mut script);
        assert_eq!(result.outcome.request, request);
    }
}
