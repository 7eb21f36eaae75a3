//! `eq5e spells sync` and `eq5e spells diff`.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use eq5e_core::Role;
use eq5e_sync::{
    diff_core_spells, generate_core_spells, pipeline::DEFAULT_COLLECTION_LABEL,
    startup::FAILURE_MESSAGE, ChangeKind, FileCollections, UpsertSummary,
};

use super::{home_dir, PackArgs};

#[derive(Subcommand, Debug)]
pub enum SpellsCommand {
    /// Upsert the core spell list into the world pack.
    Sync(SyncArgs),

    /// Show unified diffs of what sync would write, without writing.
    Diff(DiffArgs),
}

/// Arguments for `eq5e spells sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub pack: PackArgs,

    /// Display label used if the pack has to be created.
    #[arg(long, default_value = DEFAULT_COLLECTION_LABEL)]
    pub label: String,

    /// Authority of the caller; only a GM may create the pack.
    #[arg(long, default_value_t = Role::Gm)]
    pub role: Role,

    /// Plan the import without creating the pack or writing documents.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `eq5e spells diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub pack: PackArgs,
}

pub fn run(cmd: SpellsCommand) -> Result<()> {
    match cmd {
        SpellsCommand::Sync(args) => args.run(),
        SpellsCommand::Diff(args) => args.run(),
    }
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let home = home_dir()?;
        let mut options = self.pack.options();
        options.label = self.label.clone();
        options.dry_run = self.dry_run;

        let mut collections = FileCollections::new(home);
        let summary = match generate_core_spells(&mut collections, self.role, &options) {
            Ok(summary) => summary,
            Err(err) => {
                tracing::error!("core spell sync failed: {err}");
                eprintln!("{}", FAILURE_MESSAGE.red());
                return Err(err)
                    .with_context(|| format!("sync failed for '{}'", options.key));
            }
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("failed to serialize summary")?
            );
        } else {
            print_summary(&summary);
        }
        Ok(())
    }
}

fn print_summary(summary: &UpsertSummary) {
    let prefix = if summary.dry_run { "[dry-run] " } else { "" };
    if summary.created == 0 && summary.updated == 0 {
        println!(
            "{prefix}{} '{}' already up to date",
            "✓".green(),
            summary.collection
        );
    } else {
        println!(
            "{prefix}{} '{}' ({} created, {} updated, {} unchanged)",
            "✓".green(),
            summary.collection,
            summary.created,
            summary.updated,
            summary.skipped
        );
    }
    if summary.ignored > 0 {
        println!(
            "  {}  {} record(s) without a spellId ignored",
            "!".yellow(),
            summary.ignored
        );
    }
    if summary.duplicates > 0 {
        println!(
            "  {}  {} duplicate spellId record(s) ignored",
            "!".yellow(),
            summary.duplicates
        );
    }
    if summary.unmatched > 0 {
        println!(
            "  {}  {} planned write(s) not applied by the store; rerun to retry",
            "!".yellow(),
            summary.unmatched
        );
    }
    println!("{}", summary.message());
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let home = home_dir()?;
        let options = self.pack.options();
        let collections = FileCollections::new(home);

        let result = diff_core_spells(&collections, &options)
            .with_context(|| format!("diff failed for '{}'", options.key))?;

        if result.diffs.is_empty() {
            println!(
                "No differences for '{}' ({} unchanged).",
                result.collection, result.skipped
            );
            return Ok(());
        }

        for diff in result.diffs {
            let tag = match &diff.kind {
                ChangeKind::Create => "create".green().to_string(),
                ChangeKind::Update { id } => format!("update {id}").yellow().to_string(),
            };
            println!("# {} [{tag}]", diff.spell_id);
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
