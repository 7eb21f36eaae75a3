//! `eq5e settings show` and `eq5e settings set <key> <value>`.

use anyhow::{Context, Result};
use clap::{builder::BoolishValueParser, ArgAction, Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use eq5e_core::{paths, settings, SettingKey, Settings};

use super::home_dir;

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print every setting with its current value.
    Show(ShowArgs),

    /// Change one setting.
    Set(SetArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Setting name, e.g. `core-spells-on-startup`.
    pub key: SettingKey,

    /// New value: true/false (also yes/no, on/off, 1/0).
    #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub value: bool,
}

pub fn run(cmd: SettingsCommand) -> Result<()> {
    match cmd {
        SettingsCommand::Show(args) => show(args),
        SettingsCommand::Set(args) => set(args),
    }
}

#[derive(Serialize)]
struct SettingsJson<'a> {
    path: String,
    #[serde(flatten)]
    settings: &'a Settings,
}

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "setting")]
    name: &'static str,
    #[tabled(rename = "value")]
    value: String,
    #[tabled(rename = "label")]
    label: &'static str,
    #[tabled(rename = "description")]
    hint: &'static str,
}

fn show(args: ShowArgs) -> Result<()> {
    let current = settings::load().context("failed to load settings")?;
    let path = paths::settings_path(&home_dir()?);

    if args.json {
        let payload = SettingsJson {
            path: path.display().to_string(),
            settings: &current,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("failed to serialize settings JSON")?
        );
        return Ok(());
    }

    println!("{} {}", "Settings".bold(), path.display().to_string().bright_black());
    let rows: Vec<SettingRow> = SettingKey::all()
        .iter()
        .map(|key| SettingRow {
            name: key.name(),
            value: value_label(current.get(*key)),
            label: key.label(),
            hint: key.hint(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

fn set(args: SetArgs) -> Result<()> {
    let mut current = settings::load().context("failed to load settings")?;
    current.set(args.key, args.value);
    settings::save(&current).with_context(|| format!("failed to update '{}'", args.key.name()))?;
    println!("✓ {} = {}", args.key.name(), args.value);
    Ok(())
}

fn value_label(value: bool) -> String {
    if value {
        "on".green().to_string()
    } else {
        "off".red().to_string()
    }
}
