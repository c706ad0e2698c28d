//! Dice roll results and aggregation.

use serde::{Deserialize, Serialize};

use super::Die;

/// The result of rolling a single die.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// The type of die that was rolled.
    pub die: Die,
    /// The value rolled (1 to die.sides()).
    pub value: u32,
}

/// The result of rolling an entire dice pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Individual die results.
    pub dice: Vec<DieResult>,
}

impl RollResult {
    /// Sum of all die values.
    pub fn total(&self) -> u32 {
        self.dice.iter().map(|d| d.value).sum()
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.dice.iter().map(|d| d.value.to_string()).collect();
        write!(f, "[{}] = {}", values.join(", "), self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(values: &[(Die, u32)]) -> RollResult {
        RollResult {
            dice: values
                .iter()
                .map(|(die, value)| DieResult {
                    die: *die,
                    value: *value,
                })
                .collect(),
        }
    }

    #[test]
    fn total() {
        let r = make_result(&[(Die::D8, 5), (Die::D4, 3)]);
        assert_eq!(r.total(), 8);
    }

    #[test]
    fn empty_result() {
        let r = RollResult::default();
        assert_eq!(r.total(), 0);
        assert_eq!(r.to_string(), "[] = 0");
    }

    #[test]
    fn display() {
        let r = make_result(&[(Die::D6, 3), (Die::D6, 5)]);
        assert_eq!(r.to_string(), "[3, 5] = 8");
    }
}
