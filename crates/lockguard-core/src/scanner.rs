//! Line-oriented marker scanner.
//!
//! Each document is scanned with a two-state machine (`Outside`, `Inside`).
//! Results for one document are buffered in a [`DocumentScan`] and committed
//! to the shared [`ScanResult`] only if the whole document was readable.

use crate::config::{ConfigError, ScanOptions};
use crate::model::normalize_declared;
use crate::report::{codes, Finding, ScanResult};
use crate::section::LockedSection;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref LOCKED_START: Regex =
        Regex::new(r"(?i)<!--\s*LOCKED\s+SECTION\s+START\s*-->").unwrap();
    static ref LOCKED_END: Regex = Regex::new(r"(?i)<!--\s*LOCKED\s+SECTION\s+END\s*-->").unwrap();
    static ref LOCK_ID: Regex = Regex::new(r"(?i)<!--\s*Lock\s+ID:\s*(\S+)\s*-->").unwrap();
    static ref PROTECTION_MODEL: Regex =
        Regex::new(r"(?i)^\s*protection_model\s*:\s*([^\s#]+)").unwrap();
    /// `Lock Reason:`, `Lock Authority:`, `Last Reviewed:`, ... (optionally bolded).
    static ref METADATA_FIELD: Regex =
        Regex::new(r"(?i)\b(Lock\s+[A-Za-z]+|Last\s+Reviewed|Review\s+Frequency)\**\s*:").unwrap();
}

/// What a single line means to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker<'a> {
    Start,
    End,
    Body(&'a str),
}

impl<'a> Marker<'a> {
    fn classify(line: &'a str) -> Self {
        if LOCKED_START.is_match(line) {
            Marker::Start
        } else if LOCKED_END.is_match(line) {
            Marker::End
        } else {
            Marker::Body(line)
        }
    }
}

#[derive(Debug)]
enum ScanState {
    Outside,
    Inside(LockedSection),
}

/// Outcome of scanning one document, before it is merged into the result set.
#[derive(Debug, Clone, Default)]
pub struct DocumentScan {
    pub file: String,
    pub sections: Vec<LockedSection>,
    /// First `protection_model` value, normalized.
    pub model: Option<String>,
    pub findings: Vec<Finding>,
}

impl DocumentScan {
    pub fn commit(self, result: &mut ScanResult) {
        if let Some(model) = self.model {
            result.contract_models.entry(self.file.clone()).or_insert(model);
        }
        result.sections.extend(self.sections);
        result.findings.extend(self.findings);
        result.scanned_contracts.insert(self.file);
    }
}

/// Scan the text of one document.
pub fn scan_document(file: &str, content: &str) -> DocumentScan {
    let mut doc = DocumentScan {
        file: file.to_string(),
        ..DocumentScan::default()
    };
    let mut state = ScanState::Outside;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;

        if doc.model.is_none() {
            if let Some(caps) = PROTECTION_MODEL.captures(line) {
                doc.model = Some(normalize_declared(&caps[1]));
            }
        }

        state = match (state, Marker::classify(line)) {
            (ScanState::Outside, Marker::Start) => {
                ScanState::Inside(LockedSection::open(file, line_no))
            }
            (ScanState::Inside(_abandoned), Marker::Start) => {
                doc.findings.push(
                    Finding::error(
                        codes::E_LOCK_NESTED,
                        "Nested locked section detected (missing END marker?)",
                    )
                    .at(file, Some(line_no)),
                );
                ScanState::Inside(LockedSection::open(file, line_no))
            }
            (ScanState::Outside, Marker::End) => {
                doc.findings.push(
                    Finding::error(
                        codes::E_LOCK_END_WITHOUT_START,
                        "Locked section END without START",
                    )
                    .at(file, Some(line_no)),
                );
                ScanState::Outside
            }
            (ScanState::Inside(mut section), Marker::End) => {
                section.end_line = Some(line_no);
                doc.sections.push(section);
                ScanState::Outside
            }
            (ScanState::Inside(mut section), Marker::Body(body)) => {
                read_section_line(&mut section, body);
                ScanState::Inside(section)
            }
            (ScanState::Outside, Marker::Body(_)) => ScanState::Outside,
        };
    }

    if let ScanState::Inside(section) = state {
        doc.findings.push(
            Finding::error(
                codes::E_LOCK_UNTERMINATED,
                "Locked section START without END",
            )
            .at(file, Some(section.start_line)),
        );
    }

    doc
}

/// Pick up the identifier or a metadata field from a line inside a section.
fn read_section_line(section: &mut LockedSection, line: &str) {
    if let Some(caps) = LOCK_ID.captures(line) {
        section.lock_id = caps[1].to_string();
    }

    let Some(caps) = METADATA_FIELD.captures(line) else {
        return;
    };
    let key = metadata_key(&caps[1]);
    if key == "id" {
        return;
    }
    if let Some((_, value)) = line.split_once(':') {
        let value = value.trim();
        let value = value.strip_suffix("-->").unwrap_or(value).trim();
        section.metadata.insert(key, value.to_string());
    }
}

/// `Lock Reason` -> `reason`, `Last Reviewed` -> `last_reviewed`.
fn metadata_key(field: &str) -> String {
    let words: Vec<String> = field
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    let words = match words.split_first() {
        Some((first, rest)) if first == "lock" && !rest.is_empty() => rest,
        _ => &words[..],
    };
    words.join("_")
}

/// Walks a contracts directory and feeds every candidate document through
/// [`scan_document`].
pub struct Scanner {
    include: globset::GlobSet,
    exclude: Vec<String>,
}

impl Scanner {
    pub fn new(opts: &ScanOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            include: opts.compile_include()?,
            exclude: opts.exclude.clone(),
        })
    }

    /// Scan every candidate document under `result.contracts_dir`.
    ///
    /// A root directory that cannot be listed is recorded as `E_SCAN_DIR` and
    /// ends the pass. Unreadable subdirectories and documents are recorded and skipped.
    pub fn scan(&self, result: &mut ScanResult) {
        let root = result.contracts_dir.clone();
        let files = match self.candidate_files(&root, &mut result.findings) {
            Ok(files) => files,
            Err(e) => {
                result.push(
                    Finding::error(
                        codes::E_SCAN_DIR,
                        format!("Error reading contracts directory: {}", e),
                    )
                    .at(root.display().to_string(), None),
                );
                return;
            }
        };

        for path in &files {
            self.scan_file(path, result);
        }

        tracing::info!(
            contracts = result.scanned_contracts.len(),
            locked_sections = result.sections.len(),
            "scanned {}",
            root.display()
        );
    }

    fn scan_file(&self, path: &Path, result: &mut ScanResult) {
        let file = path.display().to_string();
        // read_to_string fails on invalid UTF-8 as well
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("skipping {}: {}", file, e);
                result.push(
                    Finding::error(codes::E_FILE_READ, format!("Error reading document: {}", e))
                        .at(file, None),
                );
                return;
            }
        };

        let doc = scan_document(&file, &content);
        tracing::debug!(
            file = %doc.file,
            sections = doc.sections.len(),
            model = doc.model.as_deref().unwrap_or("-"),
            "scanned document"
        );
        doc.commit(result);
    }

    /// Matching files under `root`, sorted, each listed once.
    ///
    /// Symlinks are followed; each real directory is entered once, so link
    /// cycles terminate. Failures below the root land in `findings`.
    pub fn candidate_files(
        &self,
        root: &Path,
        findings: &mut Vec<Finding>,
    ) -> std::io::Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(root)?;
        let mut visited = HashSet::new();
        visited.insert(std::fs::canonicalize(root)?);

        let mut out = Vec::new();
        self.collect_entries(root, entries, &mut visited, &mut out, findings);
        out.sort();
        out.dedup();
        Ok(out)
    }

    fn walk_dir(
        &self,
        dir: &Path,
        visited: &mut HashSet<PathBuf>,
        out: &mut Vec<PathBuf>,
        findings: &mut Vec<Finding>,
    ) {
        let real = match std::fs::canonicalize(dir) {
            Ok(real) => real,
            Err(e) => {
                findings.push(dir_read_error(dir, &e));
                return;
            }
        };
        if !visited.insert(real) {
            tracing::debug!("already walked {}", dir.display());
            return;
        }
        match std::fs::read_dir(dir) {
            Ok(entries) => self.collect_entries(dir, entries, visited, out, findings),
            Err(e) => findings.push(dir_read_error(dir, &e)),
        }
    }

    fn collect_entries(
        &self,
        dir: &Path,
        entries: std::fs::ReadDir,
        visited: &mut HashSet<PathBuf>,
        out: &mut Vec<PathBuf>,
        findings: &mut Vec<Finding>,
    ) {
        let mut listed = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => listed.push(entry),
                Err(e) => findings.push(dir_read_error(dir, &e)),
            }
        }
        // sorted so the first path to reach a linked directory is stable
        listed.sort_by_key(|e| e.file_name());

        for entry in listed {
            let path = entry.path();
            let name = entry.file_name();
            let ft = match entry.file_type() {
                Ok(ft) => ft,
                Err(e) => {
                    findings.push(dir_read_error(dir, &e));
                    continue;
                }
            };
            let (is_dir, is_file) = if ft.is_symlink() {
                match std::fs::metadata(&path) {
                    Ok(meta) => (meta.is_dir(), meta.is_file()),
                    // dangling: scan_file reports it if the name matches
                    Err(_) => (false, true),
                }
            } else {
                (ft.is_dir(), ft.is_file())
            };

            if is_dir {
                if name.to_str().is_some_and(should_skip_dir) {
                    continue;
                }
                self.walk_dir(&path, visited, out, findings);
            } else if is_file && self.is_candidate(&name) {
                out.push(path);
            }
        }
    }

    /// Matched on the raw name, so non-UTF-8 names are still considered.
    fn is_candidate(&self, name: &OsStr) -> bool {
        self.include.is_match(Path::new(name))
            && !self.exclude.iter().any(|x| OsStr::new(x) == name)
    }
}

fn dir_read_error(dir: &Path, e: &std::io::Error) -> Finding {
    tracing::warn!("skipping directory {}: {}", dir.display(), e);
    Finding::error(codes::E_DIR_READ, format!("Error reading directory: {}", e))
        .at(dir.display().to_string(), None)
}

fn should_skip_dir(name: &str) -> bool {
    matches!(name, ".git" | "target" | "node_modules")
}
