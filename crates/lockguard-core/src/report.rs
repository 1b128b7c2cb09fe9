//! Findings and the shared result set of a scan.
//!
//! Every check writes into one [`ScanResult`]; nothing is kept in global state.

use crate::section::LockedSection;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Stable finding codes.
pub mod codes {
    pub const E_SCAN_DIR: &str = "E_SCAN_DIR";
    pub const E_DIR_READ: &str = "E_DIR_READ";
    pub const E_FILE_READ: &str = "E_FILE_READ";
    pub const E_LOCK_NESTED: &str = "E_LOCK_NESTED";
    pub const E_LOCK_END_WITHOUT_START: &str = "E_LOCK_END_WITHOUT_START";
    pub const E_LOCK_UNTERMINATED: &str = "E_LOCK_UNTERMINATED";
    pub const E_LOCK_MISSING_ID: &str = "E_LOCK_MISSING_ID";
    pub const W_LOCK_ID_FORMAT: &str = "W_LOCK_ID_FORMAT";
    pub const W_LOCK_METADATA_MISSING: &str = "W_LOCK_METADATA_MISSING";
    pub const E_LOCK_DUPLICATE_ID: &str = "E_LOCK_DUPLICATE_ID";
    pub const E_MODEL_MISSING: &str = "E_MODEL_MISSING";
    pub const E_MODEL_UNKNOWN: &str = "E_MODEL_UNKNOWN";
    pub const E_MODEL_CONTRADICTION: &str = "E_MODEL_CONTRADICTION";
    pub const E_REGISTRY_MISSING: &str = "E_REGISTRY_MISSING";
    pub const E_REGISTRY_UNREADABLE: &str = "E_REGISTRY_UNREADABLE";
    pub const E_REGISTRY_UNLISTED: &str = "E_REGISTRY_UNLISTED";
    pub const E_DIFF_FAILED: &str = "E_DIFF_FAILED";
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warn,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>, // 1-indexed
}

#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    pub location: Option<Location>,
    pub fingerprint: String,
}

impl Finding {
    pub fn new(
        code: &'static str,
        severity: Severity,
        message: impl Into<String>,
        location: Option<Location>,
    ) -> Self {
        // sha256(code + location_key), stable across runs
        let location_key = match &location {
            Some(Location {
                file,
                line: Some(line),
            }) => format!("{}:{}", file, line),
            Some(Location { file, line: None }) => file.clone(),
            None => "global".into(),
        };
        let fingerprint = format!(
            "sha256:{}",
            hex::encode(Sha256::digest(
                format!("{}:{}", code, location_key).as_bytes()
            ))
        );

        Self {
            code,
            severity,
            message: message.into(),
            location,
            fingerprint,
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, message, None)
    }

    pub fn warn(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warn, message, None)
    }

    /// Attach a location; the fingerprint is recomputed.
    pub fn at(self, file: impl Into<String>, line: Option<usize>) -> Self {
        let location = Location {
            file: file.into(),
            line,
        };
        Self::new(self.code, self.severity, self.message, Some(location))
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// `file:line - message`, or `file - message` without a line.
impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(Location {
                file,
                line: Some(line),
            }) => write!(f, "{}:{} - {}", file, line, self.message),
            Some(Location { file, line: None }) => write!(f, "{} - {}", file, self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub locked_sections: usize,
    pub errors: usize,
    pub warnings: usize,
}

/// Shared state accumulated over one run.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Directory the documents were discovered under.
    pub contracts_dir: PathBuf,
    /// Finalized sections, in scan order.
    pub sections: Vec<LockedSection>,
    /// First `protection_model` declaration per document, lower-cased.
    pub contract_models: BTreeMap<String, String>,
    /// Documents that were read and scanned successfully.
    pub scanned_contracts: BTreeSet<String>,
    pub findings: Vec<Finding>,
}

impl ScanResult {
    pub fn new(contracts_dir: impl Into<PathBuf>) -> Self {
        Self {
            contracts_dir: contracts_dir.into(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warn)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            locked_sections: self.sections.len(),
            errors: self.errors().count(),
            warnings: self.warnings().count(),
        }
    }
}
