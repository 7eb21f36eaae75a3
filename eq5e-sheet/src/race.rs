//! Racial ability bonuses.
//!
//! The table is plain configuration passed into the sheet builder. Load it
//! once with [`RaceBonusTable::load_or_default`] and reuse it for every sheet.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{io_err, SheetError};

/// Ability key → bonus.
pub type AbilityBonuses = BTreeMap<String, i64>;

/// Normalized race key → bonuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RaceBonusTable(BTreeMap<String, AbilityBonuses>);

const BUILTIN: &[(&str, &[(&str, i64)])] = &[
    (
        "human",
        &[("str", 1), ("dex", 1), ("con", 1), ("int", 1), ("wis", 1), ("cha", 1)],
    ),
    ("barbarian", &[("str", 2), ("con", 1)]),
    ("erudite", &[("int", 2)]),
    ("elf", &[("dex", 2)]),
    ("woodelf", &[("dex", 2)]),
    ("highelf", &[("dex", 2), ("int", 1)]),
    ("darkelf", &[("dex", 2), ("cha", 1)]),
    ("halfelf", &[("cha", 2)]),
    ("dwarf", &[("con", 2)]),
    ("halfling", &[("dex", 2)]),
    ("gnome", &[("int", 2)]),
    ("ogre", &[("str", 2)]),
    ("troll", &[("con", 2)]),
    ("iksar", &[("str", 2)]),
    ("vahshir", &[("dex", 2)]),
    ("froglok", &[("con", 1), ("dex", 1)]),
    ("drakkin", &[("con", 1), ("str", 1)]),
];

/// Lowercase and keep only `[a-z0-9]`: "Wood Elf" → "woodelf".
pub fn normalize_race(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

impl Default for RaceBonusTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RaceBonusTable {
    /// The bundled Norrath races.
    pub fn builtin() -> Self {
        let table = BUILTIN
            .iter()
            .map(|(race, bonuses)| {
                let bonuses = bonuses.iter().map(|(k, v)| (k.to_string(), *v)).collect();
                (race.to_string(), bonuses)
            })
            .collect();
        Self(table)
    }

    /// Parse a `{ race: { ability: bonus } }` document. Race keys are
    /// normalized so "High Elf" and "highelf" land on the same entry.
    pub fn from_json(json: &str) -> Result<Self, SheetError> {
        let raw: BTreeMap<String, AbilityBonuses> =
            serde_json::from_str(json).map_err(SheetError::RaceTable)?;
        Ok(Self(
            raw.into_iter()
                .map(|(race, bonuses)| (normalize_race(&race), bonuses))
                .collect(),
        ))
    }

    pub fn load(path: &Path) -> Result<Self, SheetError> {
        let raw = fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        Self::from_json(&raw)
    }

    /// [`load`](Self::load), falling back to [`builtin`](Self::builtin) on
    /// any read or parse error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("failed to load race bonuses, using built-in table: {e}");
                Self::builtin()
            }
        }
    }

    /// Bonuses for a race name as written on the actor.
    pub fn bonuses_for(&self, race: &str) -> Option<&AbilityBonuses> {
        self.0.get(&normalize_race(race))
    }

    /// Bonus for one ability, 0 when the race or ability is unknown.
    pub fn bonus(&self, race: &str, ability: &str) -> i64 {
        self.bonuses_for(race)
            .and_then(|b| b.get(ability))
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
