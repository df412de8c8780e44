//! # medarchive-sync
//!
//! Runs the archive: fetches submissions through a [`Transport`], generates a
//! document per submission, keeps the version ledger and processed set, writes
//! the manifest and verifies the artifact set.
//!
//! - [`pipeline`]: `complete` / `update` runs and the save-on-failure policy
//! - [`api`]: forms service endpoints and paging
//! - [`transport`]: HTTP with connection retry
//! - [`generator`]: one submission to one document
//! - [`archive`]: manifest, cleanup, verification
//! - [`crosscheck`]: comparison with website registrations

pub mod api;
pub mod archive;
pub mod crosscheck;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod transport;
mod writer;

pub use api::FormsApi;
pub use crosscheck::{check, CrossCheckReport};
pub use error::{SyncError, VerificationError};
pub use generator::{DocumentGenerator, Generated};
pub use pipeline::{run, Credentials, RunContext, RunFailure, RunMode, RunSummary};
pub use transport::{HttpTransport, Transport, TransportError};
