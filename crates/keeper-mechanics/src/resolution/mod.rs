//! Outcome classification for percentile checks.
//!
//! Two views of the same roll:
//! - **Tiered** ([`tier_for`]): the qualitative ladder shown to players,
//!   from Fumble up to Critical Success.
//! - **Threshold** ([`passes`]): pass/fail against the target for a chosen
//!   [`Difficulty`], with a roll of 1 always passing and a fumble always
//!   failing.
//!
//! [`classify`] combines both into a [`RollOutcome`].

pub mod threshold;
pub mod tiered;

pub use threshold::passes;
pub use tiered::tier_for;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::check::RollRequest;
use crate::config::RulesConfig;

/// Qualitative result of a check, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Roll at or above the fumble threshold.
    Fumble,
    /// Roll above the skill value.
    Failure,
    /// Roll at or below the skill value.
    Success,
    /// Roll at or below half the skill value.
    HardSuccess,
    /// Roll at or below a fifth of the skill value.
    ExtremeSuccess,
    /// A roll of 1.
    CriticalSuccess,
}

impl Tier {
    /// All tiers, worst first.
    pub const ALL: [Tier; 6] = [
        Tier::Fumble,
        Tier::Failure,
        Tier::Success,
        Tier::HardSuccess,
        Tier::ExtremeSuccess,
        Tier::CriticalSuccess,
    ];

    /// True for every tier from Success upward.
    pub fn is_success(self) -> bool {
        self >= Tier::Success
    }

    /// Short label for a two-line display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fumble => "Fumble...",
            Self::Failure => "Failure.",
            Self::Success => "Success!",
            Self::HardSuccess => "Hard success!",
            Self::ExtremeSuccess => "Extreme success!",
            Self::CriticalSuccess => "Critical success!",
        }
    }

    /// RGB colour the keypad LEDs show for this result.
    pub fn led_rgb(self) -> [u8; 3] {
        match self {
            Self::Fumble => [0xff, 0x00, 0x00],
            Self::Failure => [0x66, 0x00, 0xcc],
            Self::Success => [0x00, 0xff, 0x00],
            Self::HardSuccess => [0x00, 0x20, 0x20],
            Self::ExtremeSuccess => [0x20, 0x20, 0x00],
            Self::CriticalSuccess => [0xff, 0xff, 0xff],
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fumble => write!(f, "Fumble"),
            Self::Failure => write!(f, "Failure"),
            Self::Success => write!(f, "Success"),
            Self::HardSuccess => write!(f, "Hard Success"),
            Self::ExtremeSuccess => write!(f, "Extreme Success"),
            Self::CriticalSuccess => write!(f, "Critical Success"),
        }
    }
}

/// Difficulty level a check is made at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Roll at or under the full skill value.
    #[default]
    Normal,
    /// Roll at or under half the skill value.
    Hard,
    /// Roll at or under a fifth of the skill value.
    Extreme,
}

impl Difficulty {
    /// All difficulty levels in menu order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Normal, Difficulty::Hard, Difficulty::Extreme];

    /// The target number for a skill at this difficulty.
    pub fn target(self, skill_value: u32) -> u32 {
        match self {
            Self::Normal => skill_value,
            Self::Hard => skill_value / 2,
            Self::Extreme => skill_value / 5,
        }
    }

    /// The lowest tier that counts as a pass at this difficulty.
    pub fn required_tier(self) -> Tier {
        match self {
            Self::Normal => Tier::Success,
            Self::Hard => Tier::HardSuccess,
            Self::Extreme => Tier::ExtremeSuccess,
        }
    }

    /// Parse a difficulty name ("normal", "Hard", "x", ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "n" | "regular" => Some(Self::Normal),
            "hard" | "h" => Some(Self::Hard),
            "extreme" | "x" | "e" => Some(Self::Extreme),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Hard => write!(f, "Hard"),
            Self::Extreme => write!(f, "Extreme"),
        }
    }
}

/// The classified result of one percentile roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// The percentile value rolled (1-100).
    pub raw_roll: u32,
    /// Qualitative tier of the roll.
    pub tier: Tier,
    /// Whether the roll passed at the requested difficulty.
    pub passed: bool,
    /// Target number at the requested difficulty.
    pub effective_threshold: u32,
    /// Roll at or above which the check fumbles.
    pub fumble_threshold: u32,
    /// Whether this outcome may be pushed.
    pub pushable: bool,
    /// Whether this outcome is the result of a push.
    pub pushed: bool,
    /// The request that produced this outcome.
    pub request: RollRequest,
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.passed { "pass" } else { "fail" };
        write!(
            f,
            "{} vs {} ({}): {} ({verdict})",
            self.raw_roll, self.effective_threshold, self.request.difficulty, self.tier
        )
    }
}

/// The fumble threshold for a skill value.
pub fn fumble_threshold(skill_value: u32, rules: &RulesConfig) -> u32 {
    if skill_value >= rules.fumble_skill_floor {
        100
    } else {
        rules.low_skill_fumble
    }
}

/// Classify a raw roll against a request.
pub fn classify(request: &RollRequest, raw_roll: u32, rules: &RulesConfig) -> RollOutcome {
    let fumble = fumble_threshold(request.skill_value, rules);
    let tier = tier_for(raw_roll, request.skill_value, fumble);
    let passed = passes(raw_roll, request.skill_value, request.difficulty, fumble);
    let pushable = !passed && tier != Tier::Fumble;
    debug!(raw_roll, %tier, passed, pushable, "classified roll");

    RollOutcome {
        raw_roll,
        tier,
        passed,
        effective_threshold: request.difficulty.target(request.skill_value),
        fumble_threshold: fumble,
        pushable,
        pushed: false,
        request: request.clone(),
    }
}
