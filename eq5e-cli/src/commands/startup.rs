//! `eq5e startup`: the world-ready hook, run by hand.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use eq5e_core::{settings, Role};
use eq5e_sync::{on_ready, FileCollections, Notifier, StartupOutcome};

use super::{home_dir, PackArgs};

/// Arguments for `eq5e startup`.
#[derive(Args, Debug)]
pub struct StartupArgs {
    /// Authority of the caller; players never trigger the import.
    #[arg(long, default_value_t = Role::Gm)]
    pub role: Role,

    #[command(flatten)]
    pub pack: PackArgs,
}

/// Prints notifications to the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{}", message.red());
    }
}

impl StartupArgs {
    pub fn run(self) -> Result<()> {
        let home = home_dir()?;
        let settings = settings::load_at(&home).context("failed to load settings")?;
        let options = self.pack.options();
        let mut collections = FileCollections::new(home);

        match on_ready(&settings, self.role, &mut collections, &options, &ConsoleNotifier) {
            StartupOutcome::NotGm => {
                println!("Role '{}' does not import core spells; nothing to do.", self.role);
            }
            StartupOutcome::Disabled => {
                println!("core-spells-on-startup is disabled; nothing to do.");
                println!("Enable it with: eq5e settings set core-spells-on-startup true");
            }
            StartupOutcome::Completed(_) => {}
            StartupOutcome::Failed { error } => {
                anyhow::bail!("startup import failed: {error}");
            }
        }
        Ok(())
    }
}
