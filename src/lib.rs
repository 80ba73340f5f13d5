//! # idremap - uid/gid translation tables
//!
//! idremap compares two snapshots of passwd/group style account files and
//! builds, per namespace, a sparse table from original ids to new ids. A
//! host tool (an archive or filesystem rewriter) asks it how to renumber
//! each owner and group it encounters.
//!
//! ## Core Concepts
//!
//! - **Record**: one account name with its original and new id
//! - **Record store**: name-keyed, insertion-ordered records for one namespace
//! - **Translation index**: original id → record, identity mappings removed
//! - **Pass-through**: ids without an index entry come back unchanged
//!
//! ## Usage
//!
//! ```rust,ignore
//! use idremap::{AccountId, IdDb};
//!
//! let mut db = IdDb::new();
//! db.read("snap1/passwd", "snap2/passwd", "snap1/group", "snap2/group")?;
//!
//! for line in db.diagnostics().render() {
//!     eprintln!("{line}");
//! }
//!
//! let uid = db.transform_uid(AccountId::new(1000));
//! let gid = db.transform_gid(AccountId::new(100));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod db;
pub mod diagnostics;
pub mod error;
pub mod id;
pub mod index;
pub mod loader;
pub mod namespace;
pub mod record;
pub mod report;
pub mod store;
pub mod translate;

// Re-export primary types at crate root for convenience
pub use config::{IdDbConfig, MissingFilePolicy, RemovedAccountPolicy};
pub use db::{IdDb, NamespaceTable};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::IdDbError;
pub use id::AccountId;
pub use index::TranslationIndex;
pub use loader::{load_file, load_reader, LoadStats};
pub use namespace::Namespace;
pub use record::{AccountRecord, Pass};
pub use report::{MappingEntry, NamespaceReport, TranslationReport};
pub use store::{Assignment, RecordIdx, RecordStore};
pub use translate::{lookup, transform, Translation};
