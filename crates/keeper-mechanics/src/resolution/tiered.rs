//! Tiered classification: the success ladder.

use super::Tier;

/// The tier of a raw roll for a skill value and fumble threshold.
///
/// Half and fifth thresholds truncate, so a skill of 63 is a hard success
/// at 31 and an extreme success at 12.
pub fn tier_for(raw_roll: u32, skill_value: u32, fumble_threshold: u32) -> Tier {
    if raw_roll >= fumble_threshold {
        Tier::Fumble
    } else if raw_roll == 1 {
        Tier::CriticalSuccess
    } else if raw_roll <= skill_value / 5 {
        Tier::ExtremeSuccess
    } else if raw_roll <= skill_value / 2 {
        Tier::HardSuccess
    } else if raw_roll <= skill_value {
        Tier::Success
    } else {
        Tier::Failure
    }
}
