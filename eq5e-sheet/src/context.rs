//! Sheet context: the display-ready payload built from [`ActorData`].

use serde::Serialize;
use serde_json::Value;

use crate::actor::ActorData;
use crate::crest::{crest_for, PARCHMENT};
use crate::error::SheetError;
use crate::race::RaceBonusTable;

/// Display order for the six core abilities; anything else sorts after.
const ABILITY_ORDER: &[&str] = &["str", "dex", "con", "int", "wis", "cha"];

const DEFAULT_AC: i64 = 10;
const DEFAULT_SPEED: i64 = 30;
const DEFAULT_LEVEL: i64 = 1;
const DEFAULT_ABILITY_SCORE: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetContext {
    pub actor_name: String,
    /// Owned items, passed through unchanged.
    pub items: Vec<Value>,
    pub ui: UiCtx,
    pub sheet: SheetCtx,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiCtx {
    pub crest: String,
    pub parchment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetCtx {
    pub class_name: String,
    pub race: String,
    pub level: i64,
    pub vitals: VitalsCtx,
    pub abilities: Vec<AbilityCtx>,
    pub skills: Vec<SkillCtx>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HpCtx {
    pub value: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VitalsCtx {
    pub ac: Stat,
    pub init: Stat,
    pub speed: Stat,
    pub hp: HpCtx,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbilityCtx {
    pub key: String,
    pub label: String,
    pub base: i64,
    pub racial: i64,
    /// `base + racial`.
    pub value: i64,
    #[serde(rename = "mod")]
    pub modifier: i64,
    pub save: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCtx {
    pub key: String,
    pub label: String,
    pub total: i64,
    pub proficient: bool,
}

/// `floor((score - 10) / 2)`, so 9 → -1 and 1 → -5. Saturates at the `i64`
/// bounds.
pub fn ability_modifier(score: i64) -> i64 {
    score.saturating_sub(10).div_euclid(2)
}

impl SheetContext {
    /// Build the sheet for `actor`, applying racial bonuses from `races`.
    pub fn from_actor(actor: &ActorData, races: &RaceBonusTable) -> Result<Self, SheetError> {
        actor.check_supported()?;

        let class_item = actor.primary_class_item();
        let class_name = actor.class_name();
        let crest = crest_for(class_item, &class_name);
        tracing::debug!(
            "sheet context: actor={:?} class={:?} crest={}",
            actor.name,
            class_name,
            crest
        );

        let details = &actor.system.details;
        let race = details.race.clone().unwrap_or_default();

        Ok(SheetContext {
            actor_name: actor.name.clone(),
            items: actor.items.clone(),
            ui: UiCtx {
                crest,
                parchment: PARCHMENT.to_string(),
            },
            sheet: SheetCtx {
                abilities: abilities(actor, &race, races),
                skills: skills(actor),
                vitals: vitals(actor),
                level: details.level.unwrap_or(DEFAULT_LEVEL),
                class_name,
                race,
            },
        })
    }
}

fn vitals(actor: &ActorData) -> VitalsCtx {
    let attrs = &actor.system.attributes;
    VitalsCtx {
        ac: Stat {
            value: attrs.ac.value.unwrap_or(DEFAULT_AC),
        },
        init: Stat {
            value: attrs.init.value.unwrap_or(0),
        },
        speed: Stat {
            value: attrs
                .movement
                .walk
                .or(attrs.speed.value)
                .unwrap_or(DEFAULT_SPEED),
        },
        hp: HpCtx {
            value: attrs.hp.value.unwrap_or(0),
            max: attrs.hp.max.unwrap_or(0),
        },
    }
}

fn ability_rank(key: &str) -> usize {
    ABILITY_ORDER
        .iter()
        .position(|k| *k == key)
        .unwrap_or(ABILITY_ORDER.len())
}

fn abilities(actor: &ActorData, race: &str, races: &RaceBonusTable) -> Vec<AbilityCtx> {
    let mut rows: Vec<AbilityCtx> = actor
        .system
        .abilities
        .iter()
        .map(|(key, data)| {
            let data = data.clone().unwrap_or_default();
            let base = data.value.unwrap_or(DEFAULT_ABILITY_SCORE);
            let racial = races.bonus(race, key);
            let value = base.saturating_add(racial);
            AbilityCtx {
                label: data.label.unwrap_or_else(|| key.clone()).to_uppercase(),
                key: key.clone(),
                base,
                racial,
                value,
                modifier: ability_modifier(value),
                save: data.save.unwrap_or(0),
            }
        })
        .collect();
    // Map iteration is alphabetical, so a stable sort on rank keeps extras sorted.
    rows.sort_by_key(|row| ability_rank(&row.key));
    rows
}

fn skills(actor: &ActorData) -> Vec<SkillCtx> {
    actor
        .system
        .skills
        .iter()
        .map(|(key, data)| {
            let data = data.clone().unwrap_or_default();
            SkillCtx {
                label: data.label.unwrap_or_else(|| key.clone()),
                key: key.clone(),
                total: data.total.or(data.modifier).unwrap_or(0),
                proficient: data.proficient,
            }
        })
        .collect()
}
