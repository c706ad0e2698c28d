//! Percentile skill-check engine for investigative horror games.
//!
//! Rolls d100 checks with bonus and penalty dice, grades them into success
//! tiers at a chosen difficulty, handles pushed rolls and damage, and keeps
//! a character sheet whose resources change during play.
//!
//! Every roll takes its random source as a parameter; [`session::Session`]
//! bundles a seeded source with a character for interactive use.

pub mod check;
pub mod config;
pub mod damage;
pub mod dice;
pub mod error;
pub mod push;
pub mod resolution;
pub mod session;
pub mod sheet;

pub use check::{CheckResult, RollRequest, perform_check};
pub use config::RulesConfig;
pub use damage::{DamageBonus, DamageExpr, bonus_for, roll_damage, roll_extra_damage};
pub use dice::{DicePool, Die, Modifiers, PercentileRoll, RandomSource, ScriptedRolls, roll_percentile};
pub use error::{MechError, MechResult};
pub use push::PushSession;
pub use resolution::{Difficulty, RollOutcome, Tier, classify, fumble_threshold};
pub use session::{DamageRoll, Session};
pub use sheet::{
    Attribute, CharacterSheet, CharacterStore, PulpTraits, Resource, SharedCharacterStore, Track,
    Weapon,
};
