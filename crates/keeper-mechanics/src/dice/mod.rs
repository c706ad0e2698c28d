//! Dice types, pools, and rolling.
//!
//! Supports the standard polyhedral dice (d4 through d100) and custom dice
//! for damage, plus the percentile roll with bonus and penalty dice used by
//! skill checks. Every roll takes its randomness from an explicit
//! [`RandomSource`].

pub mod percentile;
pub mod pool;
pub mod roll;
pub mod source;

pub use percentile::{Modifiers, PercentileRoll, roll_percentile};
pub use pool::DicePool;
pub use roll::{DieResult, RollResult};
pub use source::{RandomSource, ScriptedRolls};

use serde::{Deserialize, Serialize};

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Three-sided die (d6 halved on real tables).
    D3,
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D3 => 3,
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// The die with the given number of sides, or `None` below 2 sides.
    pub fn with_sides(sides: u32) -> Option<Self> {
        match sides {
            0 | 1 => None,
            3 => Some(Self::D3),
            4 => Some(Self::D4),
            6 => Some(Self::D6),
            8 => Some(Self::D8),
            10 => Some(Self::D10),
            12 => Some(Self::D12),
            20 => Some(Self::D20),
            100 => Some(Self::D100),
            n => Some(Self::Custom(n)),
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "D{}", self.sides())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_sides() {
        assert_eq!(Die::D3.sides(), 3);
        assert_eq!(Die::D4.sides(), 4);
        assert_eq!(Die::D6.sides(), 6);
        assert_eq!(Die::D8.sides(), 8);
        assert_eq!(Die::D10.sides(), 10);
        assert_eq!(Die::D12.sides(), 12);
        assert_eq!(Die::D20.sides(), 20);
        assert_eq!(Die::D100.sides(), 100);
        assert_eq!(Die::Custom(30).sides(), 30);
    }

    #[test]
    fn die_with_sides() {
        assert_eq!(Die::with_sides(20), Some(Die::D20));
        assert_eq!(Die::with_sides(6), Some(Die::D6));
        assert_eq!(Die::with_sides(30), Some(Die::Custom(30)));
        assert_eq!(Die::with_sides(1), None);
    }

    #[test]
    fn die_display() {
        assert_eq!(Die::D8.to_string(), "D8");
        assert_eq!(Die::Custom(30).to_string(), "D30");
    }
}
