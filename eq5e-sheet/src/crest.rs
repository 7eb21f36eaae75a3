//! Class crest selection.

use serde_json::Value;

/// Foundry's default item image; never used as a crest.
pub const MYSTERY_MAN: &str = "icons/svg/mystery-man.svg";

pub const UI_ASSET_DIR: &str = "systems/eq5e/assets/ui";

pub const PARCHMENT: &str = "systems/eq5e/assets/ui/parchment.png";

const FALLBACK_CREST: &str = "warrior";

/// Keyword → crest file stem, checked in order after the shadowknight
/// special case. The first match wins.
const CREST_RULES: &[(&[&str], &str)] = &[
    (&["warrior"], "warrior"),
    (&["paladin"], "paladin"),
    (&["berserker"], "berserker"),
    (&["druid"], "druid"),
    (&["ranger"], "ranger"),
    (&["shaman"], "shaman"),
    (&["beastlord", "beast", "warden"], "beastlord"),
    (&["cleric", "priest", "templar", "healer"], "cleric"),
    (&["wizard"], "wizard"),
    (&["magician", "mage"], "magician"),
    (&["enchanter"], "enchanter"),
    (&["necromancer"], "necromancer"),
    (&["rogue", "assassin"], "rogue"),
    (&["bard", "skald"], "bard"),
    (&["monk"], "monk"),
];

fn asset(stem: &str) -> String {
    format!("{UI_ASSET_DIR}/{stem}.png")
}

/// Crest stem for a class name, or `None` when no keyword matches.
pub fn crest_stem(class_name: &str) -> Option<&'static str> {
    let name = class_name.trim().to_lowercase();
    // "Shadow Knight", "Shadow  Knight" and "shadowknight" are one class.
    let squashed: String = name.split_whitespace().collect();
    if squashed.contains("shadowknight") {
        return Some("shadowknight");
    }
    CREST_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
        .map(|(_, stem)| *stem)
}

/// Image explicitly attached to a class item: `flags.eq5e.icon`, then `img`.
fn class_item_image(item: &Value) -> Option<&str> {
    let icon = item
        .pointer("/flags/eq5e/icon")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());
    icon.or_else(|| item.get("img").and_then(Value::as_str))
        .filter(|s| !s.is_empty() && *s != MYSTERY_MAN)
}

/// Crest path for an actor's primary class.
pub fn crest_for(class_item: Option<&Value>, class_name: &str) -> String {
    if let Some(img) = class_item.and_then(class_item_image) {
        return img.to_string();
    }
    match crest_stem(class_name) {
        Some(stem) => asset(stem),
        None => {
            let fallback = asset(FALLBACK_CREST);
            tracing::info!("no crest match for class {class_name:?}; using fallback {fallback}");
            fallback
        }
    }
}
