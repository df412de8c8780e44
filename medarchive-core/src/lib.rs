//! medarchive core library: domain types, field resolution, version ledger,
//! archive state persistence, settings.
//!
//! - [`types`]: ids and remote records
//! - [`fields`]: [`FieldMap`] and first-non-empty-wins resolution
//! - [`ledger`]: [`VersionLedger`] and [`ProcessedSet`]
//! - [`state`]: `state.json` load / save
//! - [`settings`]: YAML run settings
//! - [`error`]: error enums

pub mod error;
pub mod fields;
pub mod ledger;
pub mod settings;
pub mod state;
pub mod types;

pub use error::{ConfigurationError, ResolveError, StateError};
pub use fields::{FieldMap, REQUIRED_FIELDS};
pub use ledger::{LedgerEntry, ProcessedSet, VersionLedger, VersionSlot};
pub use settings::{RendererSettings, Settings};
pub use state::ArchiveState;
pub use types::{FieldDef, FieldValue, FormRef, Submission, SubmissionId, SubmitterKey};
