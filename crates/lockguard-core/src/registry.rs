//! Cross-check discovered identifiers against the protection registry document.

use crate::model::ProtectionModel;
use crate::protection::validate_protection_models;
use crate::report::{codes, Finding, ScanResult};
use std::path::Path;

/// True when any scanned document declares a model that needs the registry.
pub fn registry_required(result: &ScanResult) -> bool {
    result
        .contract_models
        .values()
        .filter_map(|m| m.parse::<ProtectionModel>().ok())
        .any(|m| m.requires_registry())
}

/// Every finalized identifier must occur verbatim somewhere in the registry text.
///
/// The protection-model check always runs first and is ANDed into the result.
/// A missing registry is tolerated unless a document declares
/// `reference-based` or `hybrid`; an unreadable one never is.
pub fn verify_registry_sync(result: &mut ScanResult, registry_file: &Path) -> bool {
    let required = registry_required(result);
    let mut success = validate_protection_models(result);
    let registry = registry_file.display().to_string();

    if !registry_file.exists() {
        if required {
            result.push(
                Finding::error(
                    codes::E_REGISTRY_MISSING,
                    format!("Protection registry not found: {}", registry),
                )
                .at(registry, None),
            );
            return false;
        }
        tracing::debug!("registry {} absent and not required", registry);
        return success;
    }

    let content = match std::fs::read_to_string(registry_file) {
        Ok(c) => c,
        Err(e) => {
            result.push(
                Finding::error(
                    codes::E_REGISTRY_UNREADABLE,
                    format!("Error reading registry: {}", e),
                )
                .at(registry, None),
            );
            return false;
        }
    };

    let mut findings = Vec::new();
    for section in &result.sections {
        if !content.contains(section.lock_id.as_str()) {
            findings.push(
                Finding::error(
                    codes::E_REGISTRY_UNLISTED,
                    format!(
                        "Lock ID '{}' not found in protection registry",
                        section.lock_id
                    ),
                )
                .at(section.file_path.clone(), Some(section.start_line)),
            );
            success = false;
        }
    }
    result.findings.extend(findings);

    tracing::info!(sections = result.sections.len(), "checked registry {}", registry);
    success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan_document;
    use tempfile::tempdir;

    fn scanned(model: &str, ids: &[&str]) -> ScanResult {
        let mut text = format!("protection_model: {}\n", model);
        for id in ids {
            text.push_str(&format!(
                "<!-- LOCKED SECTION START -->\n<!-- Lock ID: {} -->\n<!-- LOCKED SECTION END -->\n",
                id
            ));
        }
        let mut result = ScanResult::new("contracts");
        scan_document("agents/a.md", &text).commit(&mut result);
        result
    }

    #[test]
    fn missing_registry_tolerated_for_embedded() {
        let dir = tempdir().unwrap();
        let mut result = scanned("embedded", &["LOCK-A-001"]);
        assert!(!registry_required(&result));
        assert!(verify_registry_sync(&mut result, &dir.path().join("none.md")));
        assert!(!result.has_errors());
    }

    #[test]
    fn missing_registry_fails_when_required() {
        let dir = tempdir().unwrap();
        let mut result = scanned("hybrid", &["LOCK-A-001"]);
        assert!(registry_required(&result));
        assert!(!verify_registry_sync(&mut result, &dir.path().join("none.md")));
        assert_eq!(result.errors().next().unwrap().code, codes::E_REGISTRY_MISSING);
    }

    #[test]
    fn missing_registry_still_inherits_model_errors() {
        let dir = tempdir().unwrap();
        let mut result = scanned("embedded", &[]);
        assert!(!verify_registry_sync(&mut result, &dir.path().join("none.md")));
        assert_eq!(
            result.errors().next().unwrap().code,
            codes::E_MODEL_CONTRADICTION
        );
    }

    #[test]
    fn unlisted_ids_are_reported_per_section() {
        let dir = tempdir().unwrap();
        let registry = dir.path().join("registry.md");
        std::fs::write(&registry, "| LOCK-A-001 | agents/a.md |\n").unwrap();

        let mut result = scanned("embedded", &["LOCK-A-001", "LOCK-A-002"]);
        assert!(!verify_registry_sync(&mut result, &registry));
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, codes::E_REGISTRY_UNLISTED);
        assert!(errors[0].message.contains("LOCK-A-002"));
        assert!(errors[0].to_string().starts_with("agents/a.md:5 - "));
    }

    #[test]
    fn listed_ids_pass() {
        let dir = tempdir().unwrap();
        let registry = dir.path().join("registry.md");
        std::fs::write(&registry, "LOCK-A-001\nLOCK-A-002\n").unwrap();

        let mut result = scanned("hybrid", &["LOCK-A-001", "LOCK-A-002"]);
        assert!(verify_registry_sync(&mut result, &registry));
    }

    #[test]
    fn unreadable_registry_is_a_hard_error() {
        let dir = tempdir().unwrap();
        let registry = dir.path().join("registry.md");
        std::fs::write(&registry, [0xff, 0xfe, 0x00]).unwrap();

        let mut result = scanned("embedded", &["LOCK-A-001"]);
        assert!(!verify_registry_sync(&mut result, &registry));
        assert_eq!(
            result.errors().next().unwrap().code,
            codes::E_REGISTRY_UNREADABLE
        );
    }
}
