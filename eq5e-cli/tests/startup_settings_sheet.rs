use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::{json, Value};
use tempfile::TempDir;

use eq5e_core::{settings, CollectionKey};
use eq5e_sync::collection::collection_path_at;

fn eq5e_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("eq5e"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "warn");
    cmd
}

fn write_json(dir: &TempDir, name: &str, value: Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    path
}

fn spells(dir: &TempDir) -> PathBuf {
    write_json(
        dir,
        "spells-core.json",
        json!([{ "name": "Gate", "flags": { "eq5e": { "spell": { "spellId": "SPL010" } } } }]),
    )
}

fn pack_exists(home: &Path) -> bool {
    collection_path_at(home, &CollectionKey::from("world.eq5e-spells-core")).exists()
}

// ---------------------------------------------------------------------------
// settings
// ---------------------------------------------------------------------------

#[test]
fn settings_default_to_import_on_startup() {
    let home = TempDir::new().expect("home");
    let assert = eq5e_cmd(home.path())
        .args(["settings", "show", "--json"])
        .assert()
        .success();
    let shown: Value = serde_json::from_slice(&assert.get_output().stdout).expect("json");
    assert_eq!(shown["core_spells_on_startup"], true);
    assert!(shown["path"].as_str().unwrap().ends_with("settings.yaml"));
}

#[test]
fn settings_set_persists() {
    let home = TempDir::new().expect("home");
    eq5e_cmd(home.path())
        .args(["settings", "set", "core-spells-on-startup", "off"])
        .assert()
        .success()
        .stdout(contains("core-spells-on-startup = false"));

    let saved = settings::load_at(home.path()).expect("settings");
    assert!(!saved.core_spells_on_startup);
    assert!(saved.updated_at.is_some());

    eq5e_cmd(home.path())
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(contains("core-spells-on-startup"))
        .stdout(contains("off"));
}

#[test]
fn unknown_setting_is_rejected_by_parser() {
    let home = TempDir::new().expect("home");
    eq5e_cmd(home.path())
        .args(["settings", "set", "auto-loot", "true"])
        .assert()
        .failure()
        .stderr(contains("unknown setting 'auto-loot'"));
}

// ---------------------------------------------------------------------------
// startup
// ---------------------------------------------------------------------------

#[test]
fn startup_imports_for_gm_by_default() {
    let home = TempDir::new().expect("home");
    let data = TempDir::new().expect("data");
    let source = spells(&data);

    eq5e_cmd(home.path())
        .args(["startup", "--source"])
        .arg(&source)
        .assert()
        .success()
        .stdout(contains(
            "EQ5E: Core spells upserted: created 1, updated 0, skipped 0.",
        ));
    assert!(pack_exists(home.path()));
}

#[test]
fn startup_is_a_noop_for_players() {
    let home = TempDir::new().expect("home");
    let data = TempDir::new().expect("data");
    let source = spells(&data);

    eq5e_cmd(home.path())
        .args(["startup", "--role", "player", "--source"])
        .arg(&source)
        .assert()
        .success()
        .stdout(contains("nothing to do"));
    assert!(!pack_exists(home.path()));
}

#[test]
fn startup_respects_disabled_setting() {
    let home = TempDir::new().expect("home");
    let data = TempDir::new().expect("data");
    let source = spells(&data);
    settings::update_at(
        home.path(),
        eq5e_core::SettingKey::CoreSpellsOnStartup,
        false,
    )
    .expect("disable");

    eq5e_cmd(home.path())
        .args(["startup", "--source"])
        .arg(&source)
        .assert()
        .success()
        .stdout(contains("disabled"));
    assert!(!pack_exists(home.path()));
}

#[test]
fn startup_failure_is_reported() {
    let home = TempDir::new().expect("home");
    eq5e_cmd(home.path())
        .args(["startup", "--source"])
        .arg(home.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(contains(
            "EQ5E: Failed to generate core spells compendium (see log).",
        ));
}

// ---------------------------------------------------------------------------
// sheet
// ---------------------------------------------------------------------------

fn ogre_warrior(dir: &TempDir) -> PathBuf {
    write_json(
        dir,
        "grok.json",
        json!({
            "name": "Grok",
            "type": "character",
            "items": [{ "type": "class", "name": "Warrior" }],
            "system": {
                "details": { "race": "Ogre", "level": 3 },
                "attributes": { "ac": { "value": 16 }, "hp": { "value": 30, "max": 34 } },
                "abilities": { "str": { "value": 16 }, "int": { "value": 7 } },
                "skills": { "ath": { "total": 5, "proficient": true } }
            }
        }),
    )
}

#[test]
fn sheet_json_applies_racial_bonus() {
    let home = TempDir::new().expect("home");
    let data = TempDir::new().expect("data");
    let actor = ogre_warrior(&data);

    let assert = eq5e_cmd(home.path())
        .arg("sheet")
        .arg(&actor)
        .arg("--race-bonuses")
        .arg(data.path().join("absent.json"))
        .arg("--json")
        .assert()
        .success();
    let ctx: Value = serde_json::from_slice(&assert.get_output().stdout).expect("json");
    assert_eq!(ctx["actorName"], "Grok");
    assert_eq!(ctx["ui"]["crest"], "systems/eq5e/assets/ui/warrior.png");
    assert_eq!(ctx["sheet"]["abilities"][0]["key"], "str");
    assert_eq!(ctx["sheet"]["abilities"][0]["value"], 18);
    assert_eq!(ctx["sheet"]["abilities"][0]["mod"], 4);
    assert_eq!(ctx["sheet"]["abilities"][1]["mod"], -2);
    assert_eq!(ctx["sheet"]["vitals"]["speed"]["value"], 30);
}

#[test]
fn sheet_table_output() {
    let home = TempDir::new().expect("home");
    let data = TempDir::new().expect("data");
    let actor = ogre_warrior(&data);

    eq5e_cmd(home.path())
        .arg("sheet")
        .arg(&actor)
        .assert()
        .success()
        .stdout(contains("Grok | Warrior | level 3 | Ogre"))
        .stdout(contains("AC 16"))
        .stdout(contains("HP 30/34"))
        .stdout(contains("STR"));
}

#[test]
fn sheet_rejects_unsupported_actor_type() {
    let home = TempDir::new().expect("home");
    let data = TempDir::new().expect("data");
    let actor = write_json(&data, "cart.json", json!({ "name": "Cart", "type": "vehicle" }));

    eq5e_cmd(home.path())
        .arg("sheet")
        .arg(&actor)
        .assert()
        .failure()
        .stderr(contains("unsupported actor type `vehicle`"))
        .stdout(contains("Cart").not());
}
