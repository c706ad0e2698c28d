//! Resource tracks (Hit Points, Magic Points, Sanity, Luck).
//!
//! A track is a read-only view of a resource on the sheet. Sheets store
//! them either as `{ "Current": n, "Max": m }` groups or as a bare integer.
//! Values are never clamped: damage may take a track below zero.

use serde::{Deserialize, Serialize};

use super::attribute::Attribute;

/// A named resource and its current and maximum values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Display name of the track.
    pub name: String,
    /// Current value.
    pub current: i64,
    /// Maximum value, when the sheet records one.
    pub max: Option<i64>,
}

impl Track {
    /// Read a track from a sheet node. `None` when it holds no current value.
    pub fn from_attribute(name: impl Into<String>, node: &Attribute) -> Option<Self> {
        let (current, max) = match node {
            Attribute::Value(v) => (*v, None),
            Attribute::Group(children) => (
                children.get("Current")?.as_int()?,
                children.get("Max").and_then(Attribute::as_int),
            ),
            _ => return None,
        };
        Some(Self {
            name: name.into(),
            current,
            max,
        })
    }

    /// Returns true if the track is at or below zero.
    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}: {}/{}", self.name, self.current, max),
            None => write!(f, "{}: {}", self.name, self.current),
        }
    }
}
