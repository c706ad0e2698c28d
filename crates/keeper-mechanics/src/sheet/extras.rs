//! Optional sheet sections: weapons and pulp traits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attribute::Attribute;

/// A weapon entry from `Combat.Weapons`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    /// The key the weapon is stored under (e.g. "Weapon 1").
    pub slot: String,
    /// Display name.
    pub name: String,
    /// Damage expression, e.g. "1D6+DB".
    pub damage: Option<String>,
    /// Skill used to attack with it.
    pub skill: Option<String>,
}

/// Read the weapons group in slot order ("Weapon 2" before "Weapon 10").
pub fn read_weapons(group: &BTreeMap<String, Attribute>) -> Vec<Weapon> {
    let mut weapons: Vec<Weapon> = group
        .iter()
        .filter_map(|(slot, node)| {
            let fields = node.as_group()?;
            Some(Weapon {
                slot: slot.clone(),
                name: fields.get("Name")?.as_text()?.to_string(),
                damage: text_field(fields, "Damage"),
                skill: text_field(fields, "Skill"),
            })
        })
        .collect();
    weapons.sort_by_key(|w| (slot_number(&w.slot), w.slot.clone()));
    weapons
}

fn text_field(fields: &BTreeMap<String, Attribute>, key: &str) -> Option<String> {
    fields.get(key).and_then(Attribute::as_text).map(str::to_string)
}

fn slot_number(slot: &str) -> u32 {
    slot.rsplit(' ')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}

/// Pulp-specific traits, attached only to sheets that carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulpTraits {
    /// Hero archetype.
    pub archetype: Option<String>,
    /// Talent names.
    pub talents: Vec<String>,
}

impl PulpTraits {
    /// Read pulp traits from the sheet root, if any are present.
    pub fn from_root(root: &BTreeMap<String, Attribute>) -> Option<Self> {
        let archetype = root.get("Archetype").and_then(Attribute::as_text);
        let talents = root.get("Pulp Talents");
        if archetype.is_none() && talents.is_none() {
            return None;
        }

        let talents = match talents {
            Some(Attribute::Group(children)) => children.keys().cloned().collect(),
            Some(Attribute::List(items)) => items
                .iter()
                .filter_map(Attribute::as_text)
                .map(str::to_string)
                .collect(),
            Some(Attribute::Text(single)) => vec![single.clone()],
            _ => Vec::new(),
        };

        Some(Self {
            archetype: archetype.map(str::to_string),
            talents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::attribute::normalize;
    use serde_json::json;

    fn root(doc: serde_json::Value) -> BTreeMap<String, Attribute> {
        match normalize(&doc) {
            Attribute::Group(g) => g,
            _ => BTreeMap::new(),
        }
    }

    #[test]
    fn weapons_in_slot_order() {
        let r = root(json!({
            "Weapon 10": { "Name": "Shotgun", "Damage": "4D6" },
            "Weapon 2": { "Name": "Knife", "Damage": "1D4+DB", "Skill": "Fighting.Brawl" },
            "Weapon 1": { "Name": "Unarmed" },
            "Notes": "not a weapon"
        }));
        let weapons = read_weapons(&r);
        let names: Vec<_> = weapons.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Unarmed", "Knife", "Shotgun"]);
        assert_eq!(weapons[1].damage.as_deref(), Some("1D4+DB"));
        assert_eq!(weapons[1].skill.as_deref(), Some("Fighting.Brawl"));
        assert_eq!(weapons[0].damage, None);
    }

    #[test]
    fn pulp_traits_from_group() {
        let r = root(json!({
            "Archetype": "Adventurer",
            "Pulp Talents": { "Lucky": "Regain luck", "Quick Healer": "" }
        }));
        let pulp = PulpTraits::from_root(&r).unwrap();
        assert_eq!(pulp.archetype.as_deref(), Some("Adventurer"));
        assert_eq!(pulp.talents, vec!["Lucky", "Quick Healer"]);
    }

    #[test]
    fn pulp_traits_from_list() {
        let r = root(json!({ "Pulp Talents": ["Tough Guy"] }));
        let pulp = PulpTraits::from_root(&r).unwrap();
        assert_eq!(pulp.archetype, None);
        assert_eq!(pulp.talents, vec!["Tough Guy"]);
    }

    #[test]
    fn classic_sheet_has_no_pulp() {
        let r = root(json!({ "Name": "Harvey" }));
        assert!(PulpTraits::from_root(&r).is_none());
    }
}
