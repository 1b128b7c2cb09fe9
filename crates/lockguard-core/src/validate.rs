//! Identifier, metadata and uniqueness checks over finalized sections.

use crate::config::REQUIRED_METADATA;
use crate::protection::validate_protection_models;
use crate::report::{codes, Finding, ScanResult};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataOptions {
    /// Warn for each missing `Lock Reason`, `Lock Authority`, ... line.
    pub require_metadata: bool,
}

/// Missing identifiers fail; off-format identifiers only warn.
/// Also runs the protection-model check and folds it into the result.
pub fn validate_metadata(result: &mut ScanResult, opts: MetadataOptions) -> bool {
    let mut success = true;
    let mut findings = Vec::new();

    for section in &result.sections {
        if !section.has_lock_id() {
            findings.push(
                Finding::error(codes::E_LOCK_MISSING_ID, "Missing Lock ID")
                    .at(section.file_path.clone(), Some(section.start_line)),
            );
            success = false;
        }

        if !section.has_canonical_lock_id() {
            findings.push(
                Finding::warn(
                    codes::W_LOCK_ID_FORMAT,
                    format!(
                        "Lock ID '{}' doesn't match recommended format LOCK-[AGENT]-[NNN]",
                        section.lock_id
                    ),
                )
                .at(section.file_path.clone(), Some(section.start_line)),
            );
        }

        if opts.require_metadata {
            for (key, label) in REQUIRED_METADATA {
                if !section.metadata.contains_key(*key) {
                    findings.push(
                        Finding::warn(
                            codes::W_LOCK_METADATA_MISSING,
                            format!("Lock '{}' is missing '{}:'", section.lock_id, label),
                        )
                        .at(section.file_path.clone(), Some(section.start_line)),
                    );
                }
            }
        }
    }
    result.findings.extend(findings);

    validate_protection_models(result) && success
}

/// Every identifier must appear once across all documents. First sighting wins;
/// each later one is reported with both locations.
pub fn check_duplicate_lock_ids(result: &mut ScanResult) -> bool {
    let mut first_seen: HashMap<&str, String> = HashMap::new();
    let mut findings = Vec::new();

    for section in &result.sections {
        match first_seen.get(section.lock_id.as_str()) {
            Some(first) => findings.push(
                Finding::error(
                    codes::E_LOCK_DUPLICATE_ID,
                    format!(
                        "Duplicate Lock ID '{}' (first seen at {})",
                        section.lock_id, first
                    ),
                )
                .at(section.file_path.clone(), Some(section.start_line)),
            ),
            None => {
                first_seen.insert(section.lock_id.as_str(), section.location());
            }
        }
    }

    let ok = findings.is_empty();
    result.findings.extend(findings);
    ok
}

/// Metadata and uniqueness, both run to completion.
pub fn validate_all(result: &mut ScanResult, opts: MetadataOptions) -> bool {
    let metadata_ok = validate_metadata(result, opts);
    let unique_ok = check_duplicate_lock_ids(result);
    metadata_ok && unique_ok
}
