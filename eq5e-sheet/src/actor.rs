//! Typed view of the actor fields the sheet reads.
//!
//! Every field is optional in the source data. Missing objects and explicit
//! `null`s both deserialize to their defaults; the sheet defaults (AC 10,
//! speed 30, level 1, ...) are applied by [`crate::context`], not here.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{io_err, SheetError};

/// Actor types that have a sheet.
pub const SUPPORTED_ACTOR_TYPES: &[&str] = &["character", "npc", "pet"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorData {
    #[serde(default, deserialize_with = "lenient_string_or_empty")]
    pub name: String,
    #[serde(default, rename = "type")]
    pub actor_type: Option<String>,
    /// Owned items, kept raw so they can be handed to the sheet unchanged.
    #[serde(default, deserialize_with = "null_default")]
    pub items: Vec<Value>,
    #[serde(default, deserialize_with = "null_default")]
    pub system: ActorSystem,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorSystem {
    #[serde(default, deserialize_with = "null_default")]
    pub details: Details,
    /// Legacy location of the class name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub attributes: Attributes,
    #[serde(default, deserialize_with = "null_default")]
    pub abilities: BTreeMap<String, Option<AbilityData>>,
    #[serde(default, deserialize_with = "null_default")]
    pub skills: BTreeMap<String, Option<SkillData>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Details {
    #[serde(default, deserialize_with = "lenient_string")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub race: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub level: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attributes {
    #[serde(default, deserialize_with = "null_default")]
    pub ac: ValueField,
    #[serde(default, deserialize_with = "null_default")]
    pub init: ValueField,
    #[serde(default, deserialize_with = "null_default")]
    pub movement: Movement,
    #[serde(default, deserialize_with = "null_default")]
    pub speed: ValueField,
    #[serde(default, deserialize_with = "null_default")]
    pub hp: HitPoints,
}

/// `{ "value": n }` wrapper used by most attributes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValueField {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Movement {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub walk: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitPoints {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub value: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub max: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AbilityData {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub value: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub save: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub total: Option<i64>,
    #[serde(default, rename = "mod", deserialize_with = "lenient_i64")]
    pub modifier: Option<i64>,
    #[serde(default, deserialize_with = "truthy")]
    pub proficient: bool,
}

impl ActorData {
    pub fn from_json(json: &str) -> Result<Self, SheetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SheetError> {
        let raw = fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        Self::from_json(&raw)
    }

    /// First owned item of type `class`.
    pub fn primary_class_item(&self) -> Option<&Value> {
        self.items
            .iter()
            .find(|item| item.get("type").and_then(Value::as_str) == Some("class"))
    }

    /// Class item name, then `system.details.class`, then `system.class`.
    pub fn class_name(&self) -> String {
        self.primary_class_item()
            .and_then(|item| item.get("name"))
            .and_then(scalar_string)
            .or_else(|| self.system.details.class.clone())
            .or_else(|| self.system.class.clone())
            .unwrap_or_default()
    }

    /// `Ok` for the supported types and for actors with no type at all.
    pub fn check_supported(&self) -> Result<(), SheetError> {
        match self.actor_type.as_deref() {
            None => Ok(()),
            Some(t) if SUPPORTED_ACTOR_TYPES.contains(&t) => Ok(()),
            Some(t) => Err(SheetError::UnsupportedActorType {
                actor_type: t.to_string(),
            }),
        }
    }
}

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Integers, floats (floored) and numeric strings; anything else is `None`.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.floor() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

/// Strings as-is; numbers and booleans in their JSON spelling.
fn scalar_string(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_string(&Value::deserialize(deserializer)?))
}

fn lenient_string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Loose truthiness: `null`, `false`, `0`, `""` are false.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}
