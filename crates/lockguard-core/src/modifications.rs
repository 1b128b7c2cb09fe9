//! Flags locked sections whose document appears in a revision diff.
//!
//! Detection is file-level: any change to a document flags every section in
//! it, whether or not the changed lines fall inside the section.

use crate::diff::DiffSource;
use crate::report::{codes, Finding, ScanResult};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModificationReport {
    pub modified: bool,
    /// One entry per affected section, in scan order.
    pub lock_ids: Vec<String>,
}

/// Compare `base..head`. A failed diff is logged as `E_DIFF_FAILED` and
/// reported as "no modifications"; check the result for errors.
pub fn detect_modifications(
    result: &mut ScanResult,
    source: &dyn DiffSource,
    base: &str,
    head: &str,
    path: &str,
) -> ModificationReport {
    let diff = match source.diff(base, head, path) {
        Ok(d) => d,
        Err(e) => {
            result.push(Finding::error(
                codes::E_DIFF_FAILED,
                format!("Error running git diff: {}", e),
            ));
            return ModificationReport::default();
        }
    };

    let lock_ids: Vec<String> = result
        .sections
        .iter()
        .filter(|s| diff.contains(s.file_path.as_str()))
        .map(|s| s.lock_id.clone())
        .collect();

    tracing::info!(
        affected = lock_ids.len(),
        "compared {}..{} under {}",
        base,
        head,
        path
    );

    ModificationReport {
        modified: !lock_ids.is_empty(),
        lock_ids,
    }
}
