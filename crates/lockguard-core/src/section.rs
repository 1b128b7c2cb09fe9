use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Identifier a section carries until a `Lock ID` line is seen inside it.
pub const UNKNOWN_LOCK_ID: &str = "UNKNOWN";

lazy_static! {
    /// Recommended identifier shape: LOCK-<AGENT>-<NNN>.
    static ref LOCK_ID_FORMAT: Regex = Regex::new(r"^LOCK-[A-Z0-9]+-\d{3}$").unwrap();
}

/// One locked region of a contract document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockedSection {
    pub lock_id: String,
    pub file_path: String,
    pub start_line: usize,
    /// `None` until the END marker is seen; always `Some` once finalized.
    pub end_line: Option<usize>,
    pub metadata: BTreeMap<String, String>,
}

impl LockedSection {
    pub fn open(file_path: impl Into<String>, start_line: usize) -> Self {
        Self {
            lock_id: UNKNOWN_LOCK_ID.to_string(),
            file_path: file_path.into(),
            start_line,
            end_line: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn has_lock_id(&self) -> bool {
        self.lock_id != UNKNOWN_LOCK_ID
    }

    pub fn has_canonical_lock_id(&self) -> bool {
        is_canonical_lock_id(&self.lock_id)
    }

    /// `file:start_line`, the form used in duplicate reports.
    pub fn location(&self) -> String {
        format!("{}:{}", self.file_path, self.start_line)
    }
}

impl std::fmt::Display for LockedSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.end_line {
            Some(end) => write!(
                f,
                "{} in {}:{}-{}",
                self.lock_id, self.file_path, self.start_line, end
            ),
            None => write!(
                f,
                "{} in {}:{}-?",
                self.lock_id, self.file_path, self.start_line
            ),
        }
    }
}

pub fn is_canonical_lock_id(id: &str) -> bool {
    LOCK_ID_FORMAT.is_match(id)
}
