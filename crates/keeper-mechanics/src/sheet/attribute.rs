//! The attribute tree behind a character sheet.
//!
//! Sheets are free-form nested documents. Every mapping is normalized into a
//! [`BTreeMap`], so traversal and display order is the sorted key order
//! regardless of how the source document was written.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One node of a character sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribute {
    /// An integer score.
    Value(i64),
    /// A non-integer number.
    Number(f64),
    /// A boolean flag.
    Flag(bool),
    /// Free text.
    Text(String),
    /// An ordered list.
    List(Vec<Attribute>),
    /// A nested group, keys sorted.
    Group(BTreeMap<String, Attribute>),
    /// An explicit null.
    Empty,
}

impl Attribute {
    /// The integer value, if this node holds one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// The text, if this node holds any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The children, if this node is a group.
    pub fn as_group(&self) -> Option<&BTreeMap<String, Attribute>> {
        match self {
            Self::Group(children) => Some(children),
            _ => None,
        }
    }
}

/// Convert a parsed JSON document into a sorted attribute tree.
///
/// Purely structural: values are carried over unchanged, only mapping
/// order changes.
pub fn normalize(document: &serde_json::Value) -> Attribute {
    use serde_json::Value;

    match document {
        Value::Null => Attribute::Empty,
        Value::Bool(b) => Attribute::Flag(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Attribute::Value(i),
            None => Attribute::Number(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => Attribute::Text(s.clone()),
        Value::Array(items) => Attribute::List(items.iter().map(normalize).collect()),
        Value::Object(map) => Attribute::Group(
            map.iter()
                .map(|(k, v)| (k.clone(), normalize(v)))
                .collect(),
        ),
    }
}

/// Depth-first, pre-order search for the first node named `key`.
///
/// Keys repeat across groups (`Current` appears under every resource), so
/// this returns whichever comes first in sorted order. Prefer
/// [`resolve_path`] or [`find_all`] when the key may be ambiguous.
pub fn find_first<'a>(group: &'a BTreeMap<String, Attribute>, key: &str) -> Option<&'a Attribute> {
    for (name, node) in group {
        if name == key {
            return Some(node);
        }
        if let Attribute::Group(children) = node {
            if let Some(found) = find_first(children, key) {
                return Some(found);
            }
        }
    }
    None
}

/// Every node named `key`, with its dotted path, in traversal order.
pub fn find_all<'a>(group: &'a BTreeMap<String, Attribute>, key: &str) -> Vec<(String, &'a Attribute)> {
    let mut found = Vec::new();
    collect_matches(group, key, "", &mut found);
    found
}

fn collect_matches<'a>(
    group: &'a BTreeMap<String, Attribute>,
    key: &str,
    prefix: &str,
    found: &mut Vec<(String, &'a Attribute)>,
) {
    for (name, node) in group {
        let path = qualify(prefix, name);
        if name == key {
            found.push((path.clone(), node));
        }
        if let Attribute::Group(children) = node {
            collect_matches(children, key, &path, found);
        }
    }
}

/// Resolve an explicit dotted path such as `Skills.Fighting.Brawl`.
pub fn resolve_path<'a>(group: &'a BTreeMap<String, Attribute>, path: &str) -> Option<&'a Attribute> {
    let mut segments = path.split('.');
    let mut node = group.get(segments.next()?)?;
    for segment in segments {
        node = node.as_group()?.get(segment)?;
    }
    Some(node)
}

/// [`resolve_path`] over pre-split segments.
pub(crate) fn resolve_segments<'a>(
    group: &'a BTreeMap<String, Attribute>,
    segments: &[&str],
) -> Option<&'a Attribute> {
    let (first, rest) = segments.split_first()?;
    let mut node = group.get(*first)?;
    for segment in rest {
        node = node.as_group()?.get(*segment)?;
    }
    Some(node)
}

/// Mutable counterpart of [`resolve_segments`].
pub(crate) fn resolve_segments_mut<'a>(
    group: &'a mut BTreeMap<String, Attribute>,
    segments: &[&str],
) -> Option<&'a mut Attribute> {
    let (first, rest) = segments.split_first()?;
    let mut node = group.get_mut(*first)?;
    for segment in rest {
        node = match node {
            Attribute::Group(children) => children.get_mut(*segment)?,
            _ => return None,
        };
    }
    Some(node)
}

/// One line of a flattened skill tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    /// Dotted path below `Skills`, e.g. `Fighting.Brawl`.
    pub qualified_name: String,
    /// The entry's own key.
    pub name: String,
    /// Nesting depth, 0 for top-level skills and categories.
    pub depth: usize,
    /// The skill value; `None` for categories.
    pub value: Option<i64>,
}

/// Flatten a skill group in sorted order, categories before their members.
pub fn flatten_skills(group: &BTreeMap<String, Attribute>) -> Vec<SkillEntry> {
    let mut entries = Vec::new();
    flatten_into(group, "", 0, &mut entries);
    entries
}

fn flatten_into(
    group: &BTreeMap<String, Attribute>,
    prefix: &str,
    depth: usize,
    entries: &mut Vec<SkillEntry>,
) {
    for (name, node) in group {
        let qualified_name = qualify(prefix, name);
        entries.push(SkillEntry {
            qualified_name: qualified_name.clone(),
            name: name.clone(),
            depth,
            value: node.as_int(),
        });
        if let Attribute::Group(children) = node {
            flatten_into(children, &qualified_name, depth + 1, entries);
        }
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
