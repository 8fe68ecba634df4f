//! specnote core
//!
//! Keeps metadata attached to the right story or scenario while the
//! specification text is edited, renamed, reordered or moved:
//!
//! - Resolves fuzzy and positional queries to stories and scenarios
//! - Reads and writes metadata at their content addresses
//! - Migrates scenario metadata across structural changes
//!
//! # Example
//!
//! ```rust,ignore
//! use specnote_core::{SpecStack, StackConfig};
//!
//! let stack = SpecStack::open(".", StackConfig::load("specnote.toml")?)?;
//! stack.add_scenario_metadata("login fails", Some("login"), "owner", "alice")?;
//!
//! let report = stack.migrate()?;
//! println!("copied {} entries", report.copied_entries());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod migration;
pub mod stack;
pub mod telemetry;

pub use config::StackConfig;
pub use error::{StackError, StackResult};
pub use migration::{
    MigrationOutcome, MigrationReport, ScenarioMigrator, SkipReason, Skipped, SnapshotKey,
    Transfer,
};
pub use stack::{Hook, ResolvedScenario, SpecStack};
pub use telemetry::init_tracing;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with specnote
    pub use crate::{
        Hook, MigrationOutcome, MigrationReport, SpecStack, StackConfig, StackError, StackResult,
    };
    pub use specnote_spec::{ResolveError, Scenario, Story};
    pub use specnote_store::{MetadataEntry, PlaintextPrinter};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
