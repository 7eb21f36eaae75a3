//! eq5e: EQ5e world maintenance CLI.
//!
//! # Usage
//!
//! ```text
//! eq5e spells sync   [--source <path|url>] [--key <pack>] [--label <label>] [--role gm|player] [--dry-run] [--json]
//! eq5e spells diff   [--source <path|url>] [--key <pack>]
//! eq5e startup       [--role gm|player] [--source <path|url>] [--key <pack>]
//! eq5e settings show [--json]
//! eq5e settings set core-spells-on-startup <true|false>
//! eq5e sheet <actor.json> [--race-bonuses <path>] [--json]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    settings::SettingsCommand, sheet::SheetArgs, spells::SpellsCommand, startup::StartupArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "eq5e",
    version,
    about = "Maintain EQ5e world data: core spell packs, settings and actor sheets",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import or inspect the core spell pack.
    Spells {
        #[command(subcommand)]
        command: SpellsCommand,
    },

    /// Run the world-ready hook: import core spells if enabled for this role.
    Startup(StartupArgs),

    /// Show or change installation settings.
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Build the character sheet view for an actor JSON file.
    Sheet(SheetArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Spells { command } => commands::spells::run(command),
        Commands::Startup(args) => args.run(),
        Commands::Settings { command } => commands::settings::run(command),
        Commands::Sheet(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
