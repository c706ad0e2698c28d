//! Damage bonus and weapon damage.
//!
//! The damage bonus comes from STR + SIZ: small characters subtract a flat
//! amount, large ones add a die. Weapon damage is written as an expression
//! like `1D8+1D4+2` or `1D6+DB`, where `DB` adds the wielder's bonus.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dice::{DicePool, Die, RandomSource};
use crate::error::{MechError, MechResult};

/// Most dice a single damage expression may roll.
pub const MAX_DAMAGE_DICE: u32 = 100;
/// Most sides a damage die may have.
pub const MAX_DAMAGE_SIDES: u32 = 1000;

/// Extra damage from physique: `dice`D`sides` plus a flat constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageBonus {
    /// Number of extra dice (0 for the flat brackets).
    pub dice: u32,
    /// Sides on each extra die (0 when there are no dice).
    pub sides: u32,
    /// Flat modifier (-2, -1 or 0).
    pub flat: i32,
}

impl DamageBonus {
    /// The bonus as a die, if it has one.
    pub fn die(&self) -> Option<Die> {
        if self.dice == 0 {
            None
        } else {
            Die::with_sides(self.sides)
        }
    }
}

impl std::fmt::Display for DamageBonus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.dice, self.flat) {
            (0, 0) => write!(f, "0"),
            (0, flat) => write!(f, "{flat}"),
            (dice, 0) => write!(f, "+{dice}D{}", self.sides),
            (dice, flat) => write!(f, "+{dice}D{}{flat:+}", self.sides),
        }
    }
}

/// The damage bonus bracket for a combined STR + SIZ.
pub fn bonus_for(str_plus_siz: i64) -> DamageBonus {
    match str_plus_siz {
        i64::MIN..=64 => DamageBonus {
            dice: 0,
            sides: 0,
            flat: -2,
        },
        65..=84 => DamageBonus {
            dice: 0,
            sides: 0,
            flat: -1,
        },
        85..=124 => DamageBonus::default(),
        125..=164 => DamageBonus {
            dice: 1,
            sides: 4,
            flat: 0,
        },
        _ => DamageBonus {
            dice: 1,
            sides: 6,
            flat: 0,
        },
    }
}

/// Roll the extra damage for a bonus. Flat brackets roll nothing.
pub fn roll_extra_damage<R: RandomSource + ?Sized>(bonus: &DamageBonus, rng: &mut R) -> i32 {
    let Some(die) = bonus.die() else {
        return bonus.flat;
    };
    let rolled = DicePool::new().add(die, bonus.dice).roll(rng);
    rolled.total() as i32 + bonus.flat
}

/// A parsed weapon damage expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageExpr {
    /// Dice groups as (count, die).
    pub dice: Vec<(u32, Die)>,
    /// Flat modifier.
    pub flat: i32,
    /// Whether the wielder's damage bonus is added.
    pub adds_bonus: bool,
}

impl DamageExpr {
    /// Parse an expression such as `1D6`, `1D8+1D4+2`, `2D6-1` or `1D4+DB`.
    pub fn parse(text: &str) -> MechResult<Self> {
        let compact: String = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        if compact.is_empty() {
            return Err(MechError::InvalidDamage(text.to_string()));
        }

        let mut expr = Self::default();
        let mut dice_count = 0u32;
        for (negative, term) in split_terms(&compact) {
            let invalid = || MechError::InvalidDamage(text.to_string());
            if term.is_empty() {
                return Err(invalid());
            }
            if term == "DB" {
                if negative {
                    return Err(invalid());
                }
                expr.adds_bonus = true;
            } else if let Some((count, sides)) = term.split_once('D') {
                if negative {
                    return Err(invalid());
                }
                let count = if count.is_empty() {
                    1
                } else {
                    count.parse::<u32>().map_err(|_| invalid())?
                };
                dice_count = dice_count
                    .checked_add(count)
                    .filter(|n| *n <= MAX_DAMAGE_DICE)
                    .ok_or_else(invalid)?;
                let die = sides
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n <= MAX_DAMAGE_SIDES)
                    .and_then(Die::with_sides)
                    .ok_or_else(invalid)?;
                expr.dice.push((count, die));
            } else {
                let value = term.parse::<i32>().map_err(|_| invalid())?;
                let flat = if negative {
                    expr.flat.checked_sub(value)
                } else {
                    expr.flat.checked_add(value)
                };
                expr.flat = flat.ok_or_else(invalid)?;
            }
        }
        Ok(expr)
    }
}

impl std::fmt::Display for DamageExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = self
            .dice
            .iter()
            .map(|(count, die)| format!("{count}{die}"))
            .collect();
        if self.flat != 0 || parts.is_empty() {
            parts.push(self.flat.to_string());
        }
        if self.adds_bonus {
            parts.push("DB".to_string());
        }
        write!(f, "{}", parts.join("+").replace("+-", "-"))
    }
}

/// Split `1D6+2-1` into signed terms: `[(false, "1D6"), (false, "2"), (true, "1")]`.
fn split_terms(text: &str) -> Vec<(bool, &str)> {
    let mut terms = Vec::new();
    let mut start = 0;
    let mut negative = false;
    for (i, c) in text.char_indices() {
        if c == '+' || c == '-' {
            if i > 0 {
                terms.push((negative, &text[start..i]));
            }
            negative = c == '-';
            start = i + 1;
        }
    }
    terms.push((negative, &text[start..]));
    terms
}

/// Roll weapon damage, adding the damage bonus when the expression asks for it.
///
/// Fails with `InvalidDamage` when the total does not fit in an `i32`.
pub fn roll_damage<R: RandomSource + ?Sized>(
    expr: &DamageExpr,
    bonus: &DamageBonus,
    rng: &mut R,
) -> MechResult<i32> {
    let pool = expr
        .dice
        .iter()
        .fold(DicePool::new(), |pool, (count, die)| pool.add(*die, *count));
    let rolled = pool.roll(rng);
    let extra = if expr.adds_bonus {
        roll_extra_damage(bonus, rng)
    } else {
        0
    };
    let total = i32::try_from(rolled.total())
        .ok()
        .and_then(|dice| dice.checked_add(expr.flat))
        .and_then(|sum| sum.checked_add(extra))
        .ok_or_else(|| MechError::InvalidDamage(format!("{expr} overflows")))?;
    debug!(%expr, %rolled, extra, total, "damage roll");
    Ok(total)
}
