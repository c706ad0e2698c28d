//! Pushed rolls.
//!
//! A failed check that did not fumble may be pushed: rerolled once with the
//! same bonus and penalty dice. The new result stands even when it is worse,
//! and a pushed roll can never be pushed again.

use tracing::{debug, warn};

use crate::check::{CheckResult, perform_check};
use crate::config::RulesConfig;
use crate::dice::RandomSource;
use crate::error::{MechError, MechResult};
use crate::resolution::{RollOutcome, Tier};

/// A one-shot reroll opened on a failed outcome.
#[derive(Debug, Clone)]
pub struct PushSession {
    original: RollOutcome,
    used: bool,
}

impl PushSession {
    /// Open a push on an outcome. Fails unless the outcome is pushable.
    pub fn open(outcome: RollOutcome) -> MechResult<Self> {
        if !outcome.pushable {
            let reason = if outcome.tier == Tier::Fumble {
                "a fumble cannot be pushed"
            } else if outcome.pushed {
                "a pushed roll cannot be pushed again"
            } else {
                "only a failed roll can be pushed"
            };
            warn!(raw_roll = outcome.raw_roll, tier = %outcome.tier, reason, "push refused");
            return Err(MechError::PushNotAllowed(reason.to_string()));
        }
        Ok(Self {
            original: outcome,
            used: false,
        })
    }

    /// The outcome being pushed.
    pub fn original(&self) -> &RollOutcome {
        &self.original
    }

    /// Whether the push has already been rolled.
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Reroll the original request once.
    ///
    /// The returned outcome is marked as pushed and is never pushable.
    pub fn push<R: RandomSource + ?Sized>(
        &mut self,
        rules: &RulesConfig,
        rng: &mut R,
    ) -> MechResult<CheckResult> {
        if self.used {
            warn!("second push refused");
            return Err(MechError::PushNotAllowed(
                "this roll has already been pushed".to_string(),
            ));
        }

        let mut result = perform_check(&self.original.request, rules, rng);
        result.outcome.pushed = true;
        result.outcome.pushable = false;
        self.used = true;
        debug!(
            from = self.original.raw_roll,
            to = result.outcome.raw_roll,
            tier = %result.outcome.tier,
            "pushed roll"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::RollRequest;
    use crate::dice::{Modifiers, ScriptedRolls};
    use crate::resolution::classify;

    fn outcome(skill: i64, raw: u32) -> RollOutcome {
        let request = RollRequest::new(skill).unwrap();
        classify(&request, raw, &RulesConfig::default())
    }

    #[test]
    fn open_on_fumble_fails() {
        let err = PushSession::open(outcome(40, 98)).unwrap_err();
        assert!(matches!(err, MechError::PushNotAllowed(_)));
        assert!(err.to_string().contains("fumble"));
    }

    #[test]
    fn open_on_success_fails() {
        assert!(matches!(
            PushSession::open(outcome(40, 20)),
            Err(MechError::PushNotAllowed(_))
        ));
    }

    #[test]
    fn push_once_then_refuse() {
        let rules = RulesConfig::default();
        let mut session = PushSession::open(outcome(40, 70)).unwrap();
        let mut script = ScriptedRolls::new(vec![30, 12]);

        let pushed = session.push(&rules, &mut script).unwrap();
        assert_eq!(pushed.outcome.raw_roll, 30);
        assert_eq!(pushed.outcome.tier, Tier::Success);
        assert!(pushed.outcome.pushed);
        assert!(!pushed.outcome.pushable);
        assert!(session.is_used());

        let err = session.push(&rules, &mut script).unwrap_err();
        assert!(matches!(err, MechError::PushNotAllowed(_)));
        assert_eq!(script.draws(), 1);
    }

    #[test]
    fn failed_push_may_fumble() {
        let rules = RulesConfig::default();
        let mut session = PushSession::open(outcome(40, 70)).unwrap();
        let mut script = ScriptedRolls::new(vec![99]);
        let pushed = session.push(&rules, &mut script).unwrap();
        assert_eq!(pushed.outcome.tier, Tier::Fumble);
        assert!(PushSession::open(pushed.outcome).is_err());
    }

    #[test]
    fn push_reuses_modifiers() {
        let rules = RulesConfig::default();
        let request = RollRequest::new(50)
            .unwrap()
            .with_modifiers(Modifiers::penalty(1));
        let original = classify(&request, 80, &rules);
        let mut session = PushSession::open(original).unwrap();
        let mut script = ScriptedRolls::new(vec![4, 1, 3]);
        let pushed = session.push(&rules, &mut script).unwrap();
        assert_eq!(pushed.outcome.raw_roll, 34);
        assert_eq!(script.requests(), &[(0, 9), (0, 9), (0, 9)]);
    }
}
