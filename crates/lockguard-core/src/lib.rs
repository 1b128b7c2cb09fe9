//! Structural validation of locked sections in Markdown agent contracts.
//!
//! A locked section is a region between `<!-- LOCKED SECTION START -->` and
//! `<!-- LOCKED SECTION END -->` that may only change through a governed
//! process. This crate provides:
//!
//! - a line-oriented scanner that finds sections and `protection_model` declarations
//! - protection-model, metadata and identifier-uniqueness checks
//! - reconciliation against a central protection registry
//! - detection of sections in documents touched between two revisions
//!
//! All checks read and append to one [`ScanResult`].
//!
//! # Quick Start
//!
//! ```no_run
//! use lockguard_core::{scan_contracts, validate_all, MetadataOptions, ScanOptions};
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut result = scan_contracts(".github/agents", &ScanOptions::default())?;
//! let ok = validate_all(&mut result, MetadataOptions::default());
//! for finding in result.errors() {
//!     eprintln!("{}", finding.message);
//! }
//! assert_eq!(ok, !result.has_errors());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diff;
pub mod model;
pub mod modifications;
pub mod protection;
pub mod registry;
pub mod report;
pub mod scanner;
pub mod section;
pub mod validate;

pub use config::{ConfigError, FileConfig, ScanOptions};
pub use diff::{DiffError, DiffSource, GitDiff, StaticDiff};
pub use model::ProtectionModel;
pub use modifications::{detect_modifications, ModificationReport};
pub use protection::validate_protection_models;
pub use registry::verify_registry_sync;
pub use report::{Finding, Location, ScanResult, Severity, Summary};
pub use scanner::{scan_document, Scanner};
pub use section::{LockedSection, UNKNOWN_LOCK_ID};
pub use validate::{check_duplicate_lock_ids, validate_all, validate_metadata, MetadataOptions};

use std::path::PathBuf;

/// Scan `contracts_dir` once and return the populated result set.
pub fn scan_contracts(
    contracts_dir: impl Into<PathBuf>,
    opts: &ScanOptions,
) -> Result<ScanResult, ConfigError> {
    let scanner = Scanner::new(opts)?;
    let mut result = ScanResult::new(contracts_dir);
    scanner.scan(&mut result);
    Ok(result)
}
