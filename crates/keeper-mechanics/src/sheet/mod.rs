//! Character sheets, their attribute tree, and the store that owns them.
//!
//! A sheet is loaded from a JSON document with `Characteristics` and
//! `Skills` groups. Loading either yields a complete, validated sheet or an
//! error; nothing half-built escapes.

pub mod attribute;
pub mod extras;
pub mod store;
pub mod track;

pub use attribute::{Attribute, SkillEntry, normalize};
pub use extras::{PulpTraits, Weapon};
pub use store::{CharacterStore, Resource, SharedCharacterStore};
pub use track::Track;

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::error::{MechError, MechResult};

/// Group holding core characteristics.
pub const CHARACTERISTICS: &str = "Characteristics";
/// Group holding skills.
pub const SKILLS: &str = "Skills";

/// Paths every sheet must provide as integers.
const REQUIRED_VALUES: [&[&str]; 8] = [
    &[CHARACTERISTICS, "STR"],
    &[CHARACTERISTICS, "SIZ"],
    &[CHARACTERISTICS, "Hit Points", "Current"],
    &[CHARACTERISTICS, "Hit Points", "Max"],
    &[CHARACTERISTICS, "Magic Points", "Current"],
    &[CHARACTERISTICS, "Magic Points", "Max"],
    &[CHARACTERISTICS, "Sanity", "Current"],
    &[CHARACTERISTICS, "Luck"],
];

/// A loaded character: the normalized attribute tree plus optional
/// capabilities detected at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterSheet {
    root: BTreeMap<String, Attribute>,
    pulp: Option<PulpTraits>,
}

impl CharacterSheet {
    /// Load a sheet from a reader holding a JSON document.
    pub fn load<R: Read>(reader: R) -> MechResult<Self> {
        let document: serde_json::Value =
            serde_json::from_reader(reader).map_err(|e| MechError::CharacterLoad(e.to_string()))?;
        Self::from_document(&document)
    }

    /// Load a sheet from JSON text.
    pub fn from_json_str(text: &str) -> MechResult<Self> {
        let document: serde_json::Value =
            serde_json::from_str(text).map_err(|e| MechError::CharacterLoad(e.to_string()))?;
        Self::from_document(&document)
    }

    /// Load a sheet from a JSON file.
    pub fn from_path(path: &Path) -> MechResult<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| MechError::CharacterLoad(format!("{}: {e}", path.display())))?;
        let sheet = Self::load(std::io::BufReader::new(file))?;
        info!("Loaded character '{}' from {:?}", sheet.name(), path);
        Ok(sheet)
    }

    /// Build a sheet from an already-parsed document.
    pub fn from_document(document: &serde_json::Value) -> MechResult<Self> {
        let Attribute::Group(root) = normalize(document) else {
            return Err(MechError::CharacterLoad(
                "sheet must be a JSON object".to_string(),
            ));
        };
        validate(&root)?;
        let pulp = PulpTraits::from_root(&root);
        Ok(Self { root, pulp })
    }

    /// Write the sheet as pretty-printed JSON.
    pub fn save<W: Write>(&self, writer: W) -> MechResult<()> {
        serde_json::to_writer_pretty(writer, &self.root)
            .map_err(|e| MechError::Io(std::io::Error::other(e)))
    }

    /// The character's name.
    pub fn name(&self) -> &str {
        self.root
            .get("Name")
            .and_then(Attribute::as_text)
            .unwrap_or_default()
    }

    /// The character's age, if recorded.
    pub fn age(&self) -> Option<i64> {
        self.root.get("Age").and_then(Attribute::as_int)
    }

    /// The character's pronoun, if recorded.
    pub fn pronoun(&self) -> Option<&str> {
        self.root.get("Pronoun").and_then(Attribute::as_text)
    }

    /// The normalized attribute tree.
    pub fn root(&self) -> &BTreeMap<String, Attribute> {
        &self.root
    }

    /// Pulp traits, for sheets that carry them.
    pub fn pulp(&self) -> Option<&PulpTraits> {
        self.pulp.as_ref()
    }

    /// First node named `key` in sorted depth-first order.
    ///
    /// Lossy when a key repeats at several levels; see [`Self::find_all`].
    pub fn get(&self, key: &str) -> MechResult<&Attribute> {
        attribute::find_first(&self.root, key)
            .ok_or_else(|| MechError::MissingAttribute(key.to_string()))
    }

    /// Every node named `key`, with its dotted path.
    pub fn find_all(&self, key: &str) -> Vec<(String, &Attribute)> {
        attribute::find_all(&self.root, key)
    }

    /// Resolve an explicit dotted path such as `Skills.Fighting.Brawl`.
    pub fn resolve(&self, path: &str) -> MechResult<&Attribute> {
        attribute::resolve_path(&self.root, path)
            .ok_or_else(|| MechError::MissingAttribute(path.to_string()))
    }

    /// Find a node and its full dotted path.
    ///
    /// Tried in order: a path from the root, a path under `Skills` (the
    /// names [`Self::list_skills`] hands out), then the first key match.
    pub fn locate(&self, path_or_key: &str) -> MechResult<(String, &Attribute)> {
        if let Some(node) = attribute::resolve_path(&self.root, path_or_key) {
            return Ok((path_or_key.to_string(), node));
        }
        let under_skills = format!("{SKILLS}.{path_or_key}");
        if let Some(node) = attribute::resolve_path(&self.root, &under_skills) {
            return Ok((under_skills, node));
        }
        self.find_all(path_or_key)
            .into_iter()
            .next()
            .ok_or_else(|| MechError::MissingAttribute(path_or_key.to_string()))
    }

    /// The integer [`Self::locate`] finds.
    ///
    /// This is how a selected skill turns into a roll target.
    pub fn value_of(&self, path_or_key: &str) -> MechResult<i64> {
        let (_, node) = self.locate(path_or_key)?;
        node.as_int()
            .ok_or_else(|| MechError::NotANumber(path_or_key.to_string()))
    }

    /// A characteristic by name (e.g. "STR", "DEX").
    pub fn characteristic(&self, name: &str) -> MechResult<i64> {
        let path = format!("{CHARACTERISTICS}.{name}");
        let node = self.resolve(&path)?;
        node.as_int().ok_or_else(|| MechError::NotANumber(path))
    }

    /// The skill tree flattened for menus, with depth.
    pub fn list_skills(&self) -> Vec<SkillEntry> {
        self.root
            .get(SKILLS)
            .and_then(Attribute::as_group)
            .map(attribute::flatten_skills)
            .unwrap_or_default()
    }

    /// Core resource tracks in display order.
    pub fn tracks(&self) -> Vec<Track> {
        Resource::ALL
            .iter()
            .filter_map(|resource| self.track(*resource))
            .collect()
    }

    /// One resource as a track.
    pub fn track(&self, resource: Resource) -> Option<Track> {
        let node = attribute::resolve_segments(&self.root, resource.segments())?;
        Track::from_attribute(resource.label(), node)
    }

    /// The current value of a resource.
    pub fn current(&self, resource: Resource) -> MechResult<i64> {
        let path = self.value_path(resource);
        let node = attribute::resolve_segments(&self.root, &path)
            .ok_or_else(|| MechError::MissingAttribute(path.join(".")))?;
        node.as_int()
            .ok_or_else(|| MechError::NotANumber(path.join(".")))
    }

    /// Current hit points.
    pub fn current_hp(&self) -> MechResult<i64> {
        self.current(Resource::HitPoints)
    }

    /// Current magic points.
    pub fn current_mp(&self) -> MechResult<i64> {
        self.current(Resource::MagicPoints)
    }

    /// Current sanity.
    pub fn current_sanity(&self) -> MechResult<i64> {
        self.current(Resource::Sanity)
    }

    /// Current luck.
    pub fn current_luck(&self) -> MechResult<i64> {
        self.current(Resource::Luck)
    }

    /// Weapons from `Combat.Weapons`, in slot order.
    pub fn weapons(&self) -> Vec<Weapon> {
        attribute::resolve_path(&self.root, "Combat.Weapons")
            .and_then(Attribute::as_group)
            .map(extras::read_weapons)
            .unwrap_or_default()
    }

    /// A weapon by name, case-insensitive.
    pub fn weapon(&self, name: &str) -> MechResult<Weapon> {
        let wanted = name.to_lowercase();
        self.weapons()
            .into_iter()
            .find(|w| w.name.to_lowercase() == wanted)
            .ok_or_else(|| MechError::MissingAttribute(format!("weapon '{name}'")))
    }

    /// STR + SIZ, the input to the damage bonus table.
    pub fn str_plus_siz(&self) -> MechResult<i64> {
        let strength = self.characteristic("STR")?;
        let size = self.characteristic("SIZ")?;
        strength.checked_add(size).ok_or_else(|| {
            MechError::CharacterLoad(format!("STR {strength} + SIZ {size} overflows"))
        })
    }

    /// Where a resource's current value lives: the track's `Current` when it
    /// is stored as a group, the node itself when it is a bare integer.
    fn value_path(&self, resource: Resource) -> Vec<&'static str> {
        let mut path = resource.segments().to_vec();
        if let Some(Attribute::Group(_)) = attribute::resolve_segments(&self.root, &path) {
            path.push("Current");
        }
        path
    }

    /// Apply a signed delta to a resource and return the new value.
    ///
    /// The target is located and the sum checked before anything is
    /// written, so a failed adjustment leaves the sheet untouched.
    pub(crate) fn adjust(&mut self, resource: Resource, delta: i64) -> MechResult<i64> {
        let path = self.value_path(resource);
        let node = attribute::resolve_segments_mut(&mut self.root, &path)
            .ok_or_else(|| MechError::MissingAttribute(path.join(".")))?;
        let Attribute::Value(current) = node else {
            return Err(MechError::NotANumber(path.join(".")));
        };
        let updated = current
            .checked_add(delta)
            .ok_or_else(|| {
                MechError::InvalidInput(format!("adjusting {} by {delta} overflows", path.join(".")))
            })?;
        *current = updated;
        Ok(updated)
    }
}

/// Check the required groups and values, naming the first one missing.
fn validate(root: &BTreeMap<String, Attribute>) -> MechResult<()> {
    if root.get("Name").and_then(Attribute::as_text).is_none() {
        return Err(MechError::CharacterLoad("missing text field 'Name'".to_string()));
    }
    if root.get(SKILLS).and_then(Attribute::as_group).is_none() {
        return Err(MechError::CharacterLoad(format!("missing group '{SKILLS}'")));
    }
    for path in REQUIRED_VALUES {
        let node = attribute::resolve_segments(root, path)
            .ok_or_else(|| MechError::CharacterLoad(format!("missing '{}'", path.join("."))))?;
        let is_number = match node {
            Attribute::Value(_) => true,
            // Luck may be stored as a track.
            Attribute::Group(children) => children.get("Current").and_then(Attribute::as_int).is_some(),
            _ => false,
        };
        if !is_number {
            return Err(MechError::CharacterLoad(format!(
                "'{}' must be an integer",
                path.join(".")
            )));
        }
    }
    Ok(())
}
