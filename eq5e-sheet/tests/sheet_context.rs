use std::fs;

use eq5e_sheet::{ActorData, RaceBonusTable, SheetContext, SheetError};
use serde_json::json;
use tempfile::TempDir;

fn wood_elf_druid() -> serde_json::Value {
    json!({
        "name": "Faelin Oakshade",
        "type": "character",
        "items": [
            { "type": "weapon", "name": "Scimitar", "img": "icons/scimitar.png" },
            { "type": "class", "name": "Druid", "img": "icons/svg/mystery-man.svg" }
        ],
        "system": {
            "details": { "race": "Wood Elf", "level": 5 },
            "attributes": {
                "ac": { "value": 14 },
                "init": { "value": 3 },
                "movement": { "walk": 35 },
                "hp": { "value": 31, "max": 38 }
            },
            "abilities": {
                "cha": { "value": 10 },
                "wis": { "value": 16, "save": 6 },
                "dex": { "value": 13 },
                "str": { "value": 8 },
                "int": { "value": 12 },
                "con": { "value": 14 }
            },
            "skills": {
                "nat": { "total": 4, "proficient": true },
                "sur": { "mod": 3, "proficient": 1 },
                "ath": { "mod": -1 }
            }
        }
    })
}

#[test]
fn full_actor_builds_complete_sheet() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("faelin.json");
    fs::write(&path, wood_elf_druid().to_string()).unwrap();

    let actor = ActorData::load(&path).expect("load actor");
    let ctx = SheetContext::from_actor(&actor, &RaceBonusTable::builtin()).expect("sheet");

    assert_eq!(ctx.actor_name, "Faelin Oakshade");
    assert_eq!(ctx.items.len(), 2);
    assert_eq!(ctx.ui.crest, "systems/eq5e/assets/ui/druid.png");
    assert_eq!(ctx.sheet.class_name, "Druid");
    assert_eq!(ctx.sheet.race, "Wood Elf");
    assert_eq!(ctx.sheet.level, 5);

    let v = &ctx.sheet.vitals;
    assert_eq!(
        (v.ac.value, v.init.value, v.speed.value, v.hp.value, v.hp.max),
        (14, 3, 35, 31, 38)
    );

    let keys: Vec<&str> = ctx.sheet.abilities.iter().map(|a| a.key.as_str()).collect();
    assert_eq!(keys, vec!["str", "dex", "con", "int", "wis", "cha"]);

    let dex = &ctx.sheet.abilities[1];
    assert_eq!((dex.base, dex.racial, dex.value, dex.modifier), (13, 2, 15, 2));
    let str_row = &ctx.sheet.abilities[0];
    assert_eq!((str_row.value, str_row.modifier), (8, -1));
    assert_eq!(ctx.sheet.abilities[4].save, 6);

    let skills: Vec<(&str, i64, bool)> = ctx
        .sheet
        .skills
        .iter()
        .map(|s| (s.key.as_str(), s.total, s.proficient))
        .collect();
    assert_eq!(
        skills,
        vec![("ath", -1, false), ("nat", 4, true), ("sur", 3, true)]
    );
}

#[test]
fn custom_race_table_from_file_is_applied() {
    let dir = TempDir::new().unwrap();
    let races_path = dir.path().join("race-bonuses.json");
    fs::write(&races_path, r#"{ "Wood Elf": { "dex": 1, "wis": 1 } }"#).unwrap();
    let races = RaceBonusTable::load_or_default(&races_path);

    let actor: ActorData = serde_json::from_value(wood_elf_druid()).unwrap();
    let ctx = SheetContext::from_actor(&actor, &races).unwrap();
    let dex = &ctx.sheet.abilities[1];
    let wis = &ctx.sheet.abilities[4];
    assert_eq!((dex.racial, dex.value), (1, 14));
    assert_eq!((wis.racial, wis.value, wis.modifier), (1, 17, 3));
}

#[test]
fn npc_without_class_item_uses_system_class() {
    let actor: ActorData = serde_json::from_value(json!({
        "name": "Lord Bob",
        "type": "npc",
        "system": { "details": { "class": "Shadow Knight" } }
    }))
    .unwrap();
    let ctx = SheetContext::from_actor(&actor, &RaceBonusTable::builtin()).unwrap();
    assert_eq!(ctx.sheet.class_name, "Shadow Knight");
    assert_eq!(ctx.ui.crest, "systems/eq5e/assets/ui/shadowknight.png");
}

#[test]
fn loading_missing_actor_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nobody.json");
    let err = ActorData::load(&path).unwrap_err();
    assert!(matches!(err, SheetError::Io { .. }));
    assert!(err.to_string().contains("nobody.json"));
}

#[test]
fn malformed_actor_is_an_actor_error() {
    let err = ActorData::from_json(r#"{ "items": 7 }"#).unwrap_err();
    assert!(matches!(err, SheetError::Actor(_)));
}

#[test]
fn vehicles_have_no_sheet() {
    let actor: ActorData = serde_json::from_value(json!({ "type": "vehicle" })).unwrap();
    let err = SheetContext::from_actor(&actor, &RaceBonusTable::builtin()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported actor type `vehicle` (expected character, npc or pet)"
    );
}

#[test]
fn bundled_race_table_matches_builtin() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../data/race-bonuses.json");
    let table = RaceBonusTable::load(&path).expect("bundled table");
    assert_eq!(table, RaceBonusTable::builtin());
}
