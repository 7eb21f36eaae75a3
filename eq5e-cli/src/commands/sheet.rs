//! `eq5e sheet <actor.json>`: render the character sheet view model.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use eq5e_sheet::{ActorData, RaceBonusTable, SheetContext};

/// Arguments for `eq5e sheet`.
#[derive(Args, Debug)]
pub struct SheetArgs {
    /// Actor document exported as JSON.
    pub actor: PathBuf,

    /// Race bonus table; the built-in table is used if it cannot be read.
    #[arg(long, default_value = "data/race-bonuses.json")]
    pub race_bonuses: PathBuf,

    /// Emit the full sheet context as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct AbilityRow {
    #[tabled(rename = "ability")]
    label: String,
    #[tabled(rename = "base")]
    base: i64,
    #[tabled(rename = "racial")]
    racial: String,
    #[tabled(rename = "score")]
    value: i64,
    #[tabled(rename = "mod")]
    modifier: String,
    #[tabled(rename = "save")]
    save: String,
}

#[derive(Tabled)]
struct SkillRow {
    #[tabled(rename = "skill")]
    label: String,
    #[tabled(rename = "total")]
    total: String,
    #[tabled(rename = "prof")]
    proficient: &'static str,
}

impl SheetArgs {
    pub fn run(self) -> Result<()> {
        let races = RaceBonusTable::load_or_default(&self.race_bonuses);
        let actor = ActorData::load(&self.actor)
            .with_context(|| format!("failed to read actor '{}'", self.actor.display()))?;
        let ctx = SheetContext::from_actor(&actor, &races)
            .with_context(|| format!("failed to build sheet for '{}'", self.actor.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&ctx).context("failed to serialize sheet JSON")?
            );
            return Ok(());
        }

        print_sheet(&ctx);
        Ok(())
    }
}

fn signed(n: i64) -> String {
    format!("{n:+}")
}

fn print_sheet(ctx: &SheetContext) {
    let sheet = &ctx.sheet;
    let name = if ctx.actor_name.is_empty() {
        "(unnamed)"
    } else {
        ctx.actor_name.as_str()
    };
    let class = if sheet.class_name.is_empty() {
        "no class"
    } else {
        sheet.class_name.as_str()
    };
    let mut heading = format!("{} | {class} | level {}", name.bold(), sheet.level);
    if !sheet.race.is_empty() {
        heading.push_str(&format!(" | {}", sheet.race));
    }
    println!("{heading}");
    println!("crest: {}", ctx.ui.crest.bright_black());

    let v = &sheet.vitals;
    println!(
        "AC {}  INIT {}  SPEED {}  HP {}/{}",
        v.ac.value,
        signed(v.init.value),
        v.speed.value,
        v.hp.value,
        v.hp.max
    );

    if !sheet.abilities.is_empty() {
        let rows: Vec<AbilityRow> = sheet
            .abilities
            .iter()
            .map(|a| AbilityRow {
                label: a.label.clone(),
                base: a.base,
                racial: signed(a.racial),
                value: a.value,
                modifier: signed(a.modifier),
                save: signed(a.save),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    if !sheet.skills.is_empty() {
        let rows: Vec<SkillRow> = sheet
            .skills
            .iter()
            .map(|s| SkillRow {
                label: s.label.clone(),
                total: signed(s.total),
                proficient: if s.proficient { "✓" } else { "" },
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }
}
