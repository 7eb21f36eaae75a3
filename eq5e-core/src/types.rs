//! Domain types shared by the EQ5e crates.
//!
//! Identifiers are string newtypes. Document payloads themselves stay as
//! `serde_json::Value`; see [`crate::record`] for the reserved metadata paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Stable identifier of a spell record, read from `flags.eq5e.spell.spellId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpellId(pub String);

impl fmt::Display for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SpellId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SpellId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Opaque document identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Dotted `<package>.<name>` key of a world collection, e.g.
/// `world.eq5e-spells-core`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionKey(pub String);

impl CollectionKey {
    /// Package segment (before the first dot). The whole key when undotted.
    pub fn package(&self) -> &str {
        self.0.split_once('.').map(|(pkg, _)| pkg).unwrap_or(&self.0)
    }

    /// Collection name (after the first dot). The whole key when undotted.
    pub fn name(&self) -> &str {
        self.0.split_once('.').map(|(_, name)| name).unwrap_or(&self.0)
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CollectionKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CollectionKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Authority of the caller invoking an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Game master; may create world collections.
    #[default]
    Gm,
    Player,
}

impl Role {
    pub fn is_gm(self) -> bool {
        matches!(self, Role::Gm)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Gm => write!(f, "gm"),
            Role::Player => write!(f, "player"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gm" | "gamemaster" => Ok(Role::Gm),
            "player" => Ok(Role::Player),
            other => Err(format!("unknown role '{other}'; expected: gm, player")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
