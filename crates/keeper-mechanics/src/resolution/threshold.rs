//! Difficulty-threshold classification: pass or fail at one target.

use super::Difficulty;

/// Whether a raw roll passes a check at the given difficulty.
///
/// A roll of 1 always passes. A roll at or above the fumble threshold always
/// fails, even when the target is higher.
pub fn passes(raw_roll: u32, skill_value: u32, difficulty: Difficulty, fumble_threshold: u32) -> bool {
    if raw_roll >= fumble_threshold {
        false
    } else if raw_roll == 1 {
        true
    } else {
        raw_roll <= difficulty.target(skill_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::tier_for;

    #[test]
    fn normal_target() {
        assert!(passes(50, 50, Difficulty::Normal, 100));
        assert!(!passes(51, 50, Difficulty::Normal, 100));
    }

    #[test]
    fn hard_and_extreme_targets() {
        assert!(passes(25, 50, Difficulty::Hard, 100));
        assert!(!passes(26, 50, Difficulty::Hard, 100));
        assert!(passes(10, 50, Difficulty::Extreme, 100));
        assert!(!passes(11, 50, Difficulty::Extreme, 100));
    }

    #[test]
    fn one_always_passes() {
        assert!(passes(1, 0, Difficulty::Extreme, 96));
    }

    #[test]
    fn fumble_always_fails() {
        assert!(!passes(100, 100, Difficulty::Normal, 100));
        assert!(!passes(97, 99, Difficulty::Normal, 96));
    }

    #[test]
    fn agrees_with_tier_ladder() {
        for skill in 0..=100 {
            let fumble = if skill >= 50 { 100 } else { 96 };
            for raw in 1..=100 {
                let tier = tier_for(raw, skill, fumble);
                for difficulty in Difficulty::ALL {
                    assert_eq!(
                        passes(raw, skill, difficulty, fumble),
                        tier >= difficulty.required_tier(),
                        "raw {raw} skill {skill} {difficulty}"
                    );
                }
            }
        }
    }
}
