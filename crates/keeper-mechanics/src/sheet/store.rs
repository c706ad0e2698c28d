//! The character store: a loaded sheet plus the values derived from it.
//!
//! All resource changes go through the store so derived values stay in step
//! with the sheet.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::CharacterSheet;
use crate::damage::{self, DamageBonus};
use crate::error::{MechError, MechResult};

/// A resource that can be adjusted during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    /// Hit points.
    HitPoints,
    /// Magic points.
    MagicPoints,
    /// Sanity.
    Sanity,
    /// Luck.
    Luck,
}

impl Resource {
    /// Every resource, in display order.
    pub const ALL: [Resource; 4] = [
        Resource::HitPoints,
        Resource::MagicPoints,
        Resource::Sanity,
        Resource::Luck,
    ];

    /// Parse a short name: `hp`, `mp`, `san` or `luck`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hp" | "hit points" => Some(Self::HitPoints),
            "mp" | "magic points" => Some(Self::MagicPoints),
            "san" | "sanity" => Some(Self::Sanity),
            "luck" => Some(Self::Luck),
            _ => None,
        }
    }

    /// The sheet key for this resource.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HitPoints => "Hit Points",
            Self::MagicPoints => "Magic Points",
            Self::Sanity => "Sanity",
            Self::Luck => "Luck",
        }
    }

    pub(crate) fn segments(&self) -> &'static [&'static str] {
        match self {
            Self::HitPoints => &[super::CHARACTERISTICS, "Hit Points"],
            Self::MagicPoints => &[super::CHARACTERISTICS, "Magic Points"],
            Self::Sanity => &[super::CHARACTERISTICS, "Sanity"],
            Self::Luck => &[super::CHARACTERISTICS, "Luck"],
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Owns a character sheet and its derived damage bonus.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStore {
    sheet: CharacterSheet,
    damage_bonus: DamageBonus,
}

impl CharacterStore {
    /// Wrap a loaded sheet, deriving its damage bonus.
    pub fn new(sheet: CharacterSheet) -> MechResult<Self> {
        let damage_bonus = damage::bonus_for(sheet.str_plus_siz()?);
        Ok(Self {
            sheet,
            damage_bonus,
        })
    }

    /// Load a sheet from a JSON file.
    pub fn load(path: &Path) -> MechResult<Self> {
        Self::new(CharacterSheet::from_path(path)?)
    }

    /// The sheet.
    pub fn sheet(&self) -> &CharacterSheet {
        &self.sheet
    }

    /// The damage bonus derived at load time.
    pub fn damage_bonus(&self) -> DamageBonus {
        self.damage_bonus
    }

    /// Recompute the damage bonus from the sheet's current STR and SIZ.
    pub fn rederive_damage_bonus(&mut self) -> MechResult<DamageBonus> {
        self.damage_bonus = damage::bonus_for(self.sheet.str_plus_siz()?);
        Ok(self.damage_bonus)
    }

    /// Apply a signed delta to a resource and return its new value.
    pub fn adjust(&mut self, resource: Resource, delta: i64) -> MechResult<i64> {
        let updated = self.sheet.adjust(resource, delta)?;
        debug!(%resource, delta, updated, "adjusted resource");
        Ok(updated)
    }

    /// Apply a delta to current hit points.
    pub fn adjust_hit_points(&mut self, delta: i64) -> MechResult<i64> {
        self.adjust(Resource::HitPoints, delta)
    }

    /// Apply a delta to current magic points.
    pub fn adjust_magic_points(&mut self, delta: i64) -> MechResult<i64> {
        self.adjust(Resource::MagicPoints, delta)
    }

    /// Apply a delta to current sanity.
    pub fn adjust_sanity(&mut self, delta: i64) -> MechResult<i64> {
        self.adjust(Resource::Sanity, delta)
    }

    /// Apply a delta to luck.
    pub fn adjust_luck(&mut self, delta: i64) -> MechResult<i64> {
        self.adjust(Resource::Luck, delta)
    }

    /// Write the sheet to a file as pretty JSON.
    pub fn save_to_path(&self, path: &Path) -> MechResult<()> {
        let mut writer = BufWriter::new(std::fs::File::create(path)?);
        self.sheet.save(&mut writer)?;
        writer.flush()?;
        info!("Saved character '{}' to {:?}", self.sheet.name(), path);
        Ok(())
    }
}

/// A cloneable store handle; every call holds the one lock for its duration.
#[derive(Debug, Clone)]
pub struct SharedCharacterStore {
    inner: Arc<Mutex<CharacterStore>>,
}

impl SharedCharacterStore {
    /// Share a store.
    pub fn new(store: CharacterStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run a read-only closure against the store.
    pub fn read<T>(&self, f: impl FnOnce(&CharacterStore) -> T) -> T {
        f(&self.inner.lock())
    }

    /// Run a closure that may mutate the store.
    pub fn update<T>(&self, f: impl FnOnce(&mut CharacterStore) -> MechResult<T>) -> MechResult<T> {
        f(&mut self.inner.lock())
    }

    /// Apply a delta to a resource.
    pub fn adjust(&self, resource: Resource, delta: i64) -> MechResult<i64> {
        self.update(|store| store.adjust(resource, delta))
    }

    /// Take the store back out, if this is the last handle.
    pub fn try_unwrap(self) -> Result<CharacterStore, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<CharacterStore> for SharedCharacterStore {
    fn from(store: CharacterStore) -> Self {
        Self::new(store)
    }
}

/// Parse a resource name, failing with the name in the error.
pub fn parse_resource(name: &str) -> MechResult<Resource> {
    Resource::parse(name).ok_or_else(|| {
        MechError::InvalidInput(format!("unknown resource '{name}', use: hp, mp, san, luck"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::tests::{HARVEY, harvey};

    fn store() -> CharacterStore {
        CharacterStore::new(harvey()).unwrap()
    }

    #[test]
    fn derives_damage_bonus() {
        let store = store();
        // STR 45 + SIZ 80 = 125.
        assert_eq!(
            store.damage_bonus(),
            DamageBonus {
                dice: 1,
                sides: 4,
                flat: 0
            }
        );
    }

    #[test]
    fn oversized_characteristics_fail_to_load() {
        let doc = HARVEY.replace("\"STR\": 45", "\"STR\": 9223372036854775807");
        let sheet = CharacterSheet::from_json_str(&doc).unwrap();
        assert!(matches!(
            CharacterStore::new(sheet),
            Err(MechError::CharacterLoad(_))
        ));
    }

    #[test]
    fn mutators_apply_deltas() {
        let mut store = store();
        assert_eq!(store.adjust_hit_points(-4).unwrap(), 8);
        assert_eq!(store.adjust_magic_points(-2).unwrap(), 9);
        assert_eq!(store.adjust_sanity(-5).unwrap(), 50);
        assert_eq!(store.adjust_luck(10).unwrap(), 50);
        assert_eq!(store.sheet().current_hp().unwrap(), 8);
        assert_eq!(store.sheet().current_luck().unwrap(), 50);
    }

    #[test]
    fn mutators_do_not_clamp() {
        let mut store = store();
        assert_eq!(store.adjust_hit_points(-20).unwrap(), -8);
        assert_eq!(store.adjust_magic_points(100).unwrap(), 111);
    }

    #[test]
    fn luck_track_adjusts_current() {
        let doc = HARVEY.replace("\"Luck\": 40", "\"Luck\": { \"Current\": 40, \"Max\": 99 }");
        let mut store = CharacterStore::new(CharacterSheet::from_json_str(&doc).unwrap()).unwrap();
        assert_eq!(store.adjust_luck(-15).unwrap(), 25);
        let luck = store
            .sheet()
            .tracks()
            .into_iter()
            .find(|t| t.name == "Luck")
            .unwrap();
        assert_eq!(luck.max, Some(99));
        assert_eq!(luck.current, 25);
    }

    #[test]
    fn resource_names() {
        assert_eq!(Resource::parse("HP"), Some(Resource::HitPoints));
        assert_eq!(Resource::parse("san"), Some(Resource::Sanity));
        assert_eq!(Resource::parse("Luck"), Some(Resource::Luck));
        assert_eq!(Resource::parse("mana"), None);
        assert!(matches!(
            parse_resource("mana"),
            Err(MechError::InvalidInput(_))
        ));
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvey.json");
        let mut store = store();
        store.adjust_sanity(-7).unwrap();
        store.save_to_path(&path).unwrap();

        let reloaded = CharacterStore::load(&path).unwrap();
        assert_eq!(reloaded.sheet().current_sanity().unwrap(), 48);
        assert_eq!(reloaded, store);
    }

    #[test]
    fn shared_store_serializes_updates() {
        let shared = SharedCharacterStore::new(store());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        shared.adjust(Resource::Sanity, -1).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(shared.read(|s| s.sheet().current_sanity().unwrap()), -45);

        let store = shared.try_unwrap().unwrap();
        assert_eq!(store.sheet().current_sanity().unwrap(), -45);
    }

    #[test]
    fn shared_update_propagates_errors() {
        let shared: SharedCharacterStore = store().into();
        let err = shared
            .update(|s| s.adjust_hit_points(i64::MAX))
            .unwrap_err();
        assert!(matches!(err, MechError::InvalidInput(_)));
        assert_eq!(shared.read(|s| s.sheet().current_hp().unwrap()), 12);
    }
}
