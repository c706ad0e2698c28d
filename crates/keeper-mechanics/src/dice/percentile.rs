//! Percentile rolls with bonus and penalty dice.
//!
//! Without a modifier the roll is a single d100. With one, a shared ones
//! digit is rolled once and `modifier + 1` tens dice are rolled; bonus dice
//! keep the lowest tens value, penalty dice keep the highest. Only the
//! difference between bonus and penalty counts matters.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::RandomSource;
use crate::config::RulesConfig;
use crate::error::{MechError, MechResult};

/// Bonus and penalty dice applied to a percentile roll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Bonus dice (favor low rolls).
    pub bonus: u32,
    /// Penalty dice (favor high rolls).
    pub penalty: u32,
}

impl Modifiers {
    /// No bonus or penalty dice.
    pub const NONE: Self = Self {
        bonus: 0,
        penalty: 0,
    };

    /// Build modifiers from raw counts, rejecting negative values.
    pub fn new(bonus: i64, penalty: i64) -> MechResult<Self> {
        let invalid = || MechError::InvalidModifier { bonus, penalty };
        Ok(Self {
            bonus: u32::try_from(bonus).map_err(|_| invalid())?,
            penalty: u32::try_from(penalty).map_err(|_| invalid())?,
        })
    }

    /// `count` bonus dice.
    pub fn bonus(count: u32) -> Self {
        Self {
            bonus: count,
            penalty: 0,
        }
    }

    /// `count` penalty dice.
    pub fn penalty(count: u32) -> Self {
        Self {
            bonus: 0,
            penalty: count,
        }
    }

    /// The net number of extra tens dice: `|bonus - penalty|`.
    pub fn net(self) -> u32 {
        self.bonus.abs_diff(self.penalty)
    }

    /// True when bonus dice outnumber penalty dice.
    pub fn favors_low(self) -> bool {
        self.bonus > self.penalty
    }
}

impl std::fmt::Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.bonus, self.penalty) {
            (0, 0) => write!(f, "no modifiers"),
            (b, 0) => write!(f, "{b} bonus"),
            (0, p) => write!(f, "{p} penalty"),
            (b, p) => write!(f, "{b} bonus, {p} penalty"),
        }
    }
}

/// A finished percentile roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentileRoll {
    /// The final result, always in 1-100.
    pub value: u32,
    /// The ones digit, when the roll was split into tens and ones.
    pub ones: Option<u32>,
    /// The tens value selected from the pool, when the roll was split.
    pub tens: Option<u32>,
    /// Distinct tens candidates, ascending. Empty for an unmodified roll.
    pub tens_pool: Vec<u32>,
}

/// Roll a percentile die with the given modifiers.
///
/// A `00` + `0` result is not a valid percentile value. Bonus rolls then
/// take the next-lowest distinct tens value, or `rules.zero_roll_fallback`
/// when the pool holds a single value; penalty rolls become 100.
pub fn roll_percentile<R: RandomSource + ?Sized>(
    modifiers: Modifiers,
    rules: &RulesConfig,
    rng: &mut R,
) -> PercentileRoll {
    let modifier = modifiers.net();
    if modifier == 0 {
        let value = rng.range(1, 100);
        debug!(value, "percentile roll");
        return PercentileRoll {
            value,
            ones: None,
            tens: None,
            tens_pool: Vec::new(),
        };
    }

    let ones = rng.range(0, 9);
    let mut tens_pool: Vec<u32> = (0..=modifier).map(|_| rng.range(0, 9) * 10).collect();
    tens_pool.sort_unstable();
    tens_pool.dedup();

    let favor_low = modifiers.favors_low();
    let tens = if favor_low {
        tens_pool.first().copied().unwrap_or(0)
    } else {
        tens_pool.last().copied().unwrap_or(0)
    };

    let value = match (tens + ones, favor_low) {
        (0, true) => tens_pool
            .get(1)
            .copied()
            .unwrap_or(rules.zero_roll_fallback),
        (0, false) => 100,
        (sum, _) => sum,
    };

    debug!(value, ones, tens, ?tens_pool, %modifiers, "percentile roll");
    PercentileRoll {
        value,
        ones: Some(ones),
        tens: Some(tens),
        tens_pool,
    }
}
