//! Rules configuration for percentile checks.
//!
//! Defaults follow the published rules. Every constant that differs between
//! firmware revisions is exposed here so a table can pick its own.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MechError, MechResult};

/// Fumble threshold for skills below [`FUMBLE_SKILL_FLOOR`].
///
/// Older device firmware used 95, newer firmware 96. 96 is the rulebook
/// value (a roll of 96-100 fumbles when the skill is under 50).
pub const LOW_SKILL_FUMBLE: u32 = 96;

/// Skill value at and above which only a roll of 100 fumbles.
pub const FUMBLE_SKILL_FLOOR: u32 = 50;

/// Result returned when a bonus roll comes up `00` + `0` and the tens pool
/// holds a single distinct value, leaving nothing to substitute.
pub const ZERO_ROLL_FALLBACK: u32 = 10;

/// Tunable rule constants and the session seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Fumble threshold used below `fumble_skill_floor`.
    pub low_skill_fumble: u32,
    /// Skill value at which the fumble threshold becomes 100.
    pub fumble_skill_floor: u32,
    /// Value returned for an unresolvable zero roll on a bonus check.
    pub zero_roll_fallback: u32,
    /// RNG seed for reproducible sessions. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            low_skill_fumble: LOW_SKILL_FUMBLE,
            fumble_skill_floor: FUMBLE_SKILL_FLOOR,
            zero_roll_fallback: ZERO_ROLL_FALLBACK,
            seed: None,
        }
    }
}

impl RulesConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// A random source seeded from `seed`, or from OS entropy when unset.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Set the low-skill fumble threshold (clamped to 2-100).
    pub fn with_low_skill_fumble(mut self, threshold: u32) -> Self {
        self.low_skill_fumble = threshold.clamp(2, 100);
        self
    }

    /// Set the zero-roll fallback (clamped to 1-100).
    pub fn with_zero_roll_fallback(mut self, value: u32) -> Self {
        self.zero_roll_fallback = value.clamp(1, 100);
        self
    }

    /// Parse a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> MechResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| MechError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> MechResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| MechError::InvalidConfig(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded rules config from {:?}", path);
        Ok(config)
    }

    /// Check that every constant keeps rolls inside 1-100.
    pub fn validate(&self) -> MechResult<()> {
        if !(2..=100).contains(&self.low_skill_fumble) {
            return Err(MechError::InvalidConfig(format!(
                "low_skill_fumble must be 2-100, got {}",
                self.low_skill_fumble
            )));
        }
        if self.fumble_skill_floor > 100 {
            return Err(MechError::InvalidConfig(format!(
                "fumble_skill_floor must be 0-100, got {}",
                self.fumble_skill_floor
            )));
        }
        if !(1..=100).contains(&self.zero_roll_fallback) {
            return Err(MechError::InvalidConfig(format!(
                "zero_roll_fallback must be 1-100, got {}",
                self.zero_roll_fallback
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = RulesConfig::default();
        assert_eq!(cfg.low_skill_fumble, 96);
        assert_eq!(cfg.fumble_skill_floor, 50);
        assert_eq!(cfg.zero_roll_fallback, 10);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn builder_methods() {
        let cfg = RulesConfig::default()
            .with_seed(7)
            .with_low_skill_fumble(95)
            .with_zero_roll_fallback(1);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.low_skill_fumble, 95);
        assert_eq!(cfg.zero_roll_fallback, 1);
    }

    #[test]
    fn builder_clamps() {
        let cfg = RulesConfig::default()
            .with_low_skill_fumble(500)
            .with_zero_roll_fallback(0);
        assert_eq!(cfg.low_skill_fumble, 100);
        assert_eq!(cfg.zero_roll_fallback, 1);
    }

    #[test]
    fn toml_partial_keeps_defaults() {
        let cfg = RulesConfig::from_toml_str("low_skill_fumble = 95\nseed = 42\n").unwrap();
        assert_eq!(cfg.low_skill_fumble, 95);
        assert_eq!(cfg.fumble_skill_floor, 50);
        assert_eq!(cfg.seed, Some(42));
    }

    #[test]
    fn toml_out_of_range_rejected() {
        let err = RulesConfig::from_toml_str("zero_roll_fallback = 0").unwrap_err();
        assert!(matches!(err, MechError::InvalidConfig(_)));
        let err = RulesConfig::from_toml_str("low_skill_fumble = 101").unwrap_err();
        assert!(matches!(err, MechError::InvalidConfig(_)));
    }

    #[test]
    fn toml_garbage_rejected() {
        assert!(RulesConfig::from_toml_str("low_skill_fumble = \"high\"").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, "fumble_skill_floor = 60\n").unwrap();
        let cfg = RulesConfig::load(&path).unwrap();
        assert_eq!(cfg.fumble_skill_floor, 60);
        assert!(RulesConfig::load(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn seeded_rng_repeats() {
        use crate::dice::RandomSource;

        let cfg = RulesConfig::default().with_seed(5);
        let (mut a, mut b) = (cfg.rng(), cfg.rng());
        for _ in 0..10 {
            assert_eq!(a.range(1, 100), b.range(1, 100));
        }
    }
}
