//! # eq5e-sheet
//!
//! Builds the display model for the EQ5e actor sheet: class crest, vitals,
//! abilities with racial bonuses, and skills.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use eq5e_sheet::{ActorData, RaceBonusTable, SheetContext};
//!
//! fn show(actor_path: &Path) -> Result<(), eq5e_sheet::SheetError> {
//!     let races = RaceBonusTable::load_or_default(Path::new("data/race-bonuses.json"));
//!     let actor = ActorData::load(actor_path)?;
//!     let sheet = SheetContext::from_actor(&actor, &races)?;
//!     println!("{} ({})", sheet.actor_name, sheet.sheet.class_name);
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod context;
pub mod crest;
pub mod error;
pub mod race;

pub use actor::ActorData;
pub use context::{ability_modifier, SheetContext};
pub use error::SheetError;
pub use race::{normalize_race, RaceBonusTable};
