//! Checks each scanned document's declared protection model against the
//! sections actually found in it.

use crate::model::{ProtectionModel, UnknownModel};
use crate::report::{codes, Finding, ScanResult};
use std::collections::BTreeSet;

/// Validate every successfully scanned document, including those with no sections.
///
/// Calling this twice appends the same errors twice.
pub fn validate_protection_models(result: &mut ScanResult) -> bool {
    let locked_files: BTreeSet<&str> = result
        .sections
        .iter()
        .map(|s| s.file_path.as_str())
        .collect();

    let mut findings = Vec::new();
    for contract in &result.scanned_contracts {
        let declared = result.contract_models.get(contract).filter(|m| !m.is_empty());
        let Some(declared) = declared else {
            findings.push(
                Finding::error(codes::E_MODEL_MISSING, "Missing protection_model metadata")
                    .at(contract.clone(), None),
            );
            continue;
        };

        let model = match declared.parse::<ProtectionModel>() {
            Ok(m) => m,
            Err(UnknownModel(value)) => {
                findings.push(
                    Finding::error(
                        codes::E_MODEL_UNKNOWN,
                        format!(
                            "Unknown protection_model '{}' (expected: {})",
                            value,
                            ProtectionModel::expected_list()
                        ),
                    )
                    .at(contract.clone(), None),
                );
                continue;
            }
        };

        let has_sections = locked_files.contains(contract.as_str());
        if model.forbids_sections() && has_sections {
            findings.push(
                Finding::error(
                    codes::E_MODEL_CONTRADICTION,
                    format!("protection_model {} forbids LOCKED sections", model),
                )
                .at(contract.clone(), None),
            );
        }
        if model.requires_sections() && !has_sections {
            findings.push(
                Finding::error(
                    codes::E_MODEL_CONTRADICTION,
                    format!("protection_model {} requires LOCKED sections", model),
                )
                .at(contract.clone(), None),
            );
        }
    }

    let ok = findings.is_empty();
    result.findings.extend(findings);
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan_document;

    const SECTION: &str = "<!-- LOCKED SECTION START -->\n<!-- Lock ID: LOCK-T-001 -->\n<!-- LOCKED SECTION END -->\n";

    fn result_with(docs: &[(&str, String)]) -> ScanResult {
        let mut result = ScanResult::new("contracts");
        for (file, text) in docs {
            scan_document(file, text).commit(&mut result);
        }
        result
    }

    fn error_codes(result: &ScanResult) -> Vec<&'static str> {
        result.errors().map(|f| f.code).collect()
    }

    #[test]
    fn reference_based_fails_iff_sections_present() {
        let mut clean = result_with(&[("a.md", "protection_model: reference-based\n".into())]);
        assert!(validate_protection_models(&mut clean));

        let mut dirty = result_with(&[(
            "a.md",
            format!("protection_model: reference-based\n{}", SECTION),
        )]);
        assert!(!validate_protection_models(&mut dirty));
        assert_eq!(error_codes(&dirty), vec![codes::E_MODEL_CONTRADICTION]);
    }

    #[test]
    fn embedded_fails_iff_no_sections() {
        let mut empty = result_with(&[("a.md", "protection_model: embedded\n".into())]);
        assert!(!validate_protection_models(&mut empty));

        let mut full = result_with(&[("a.md", format!("protection_model: embedded\n{}", SECTION))]);
        assert!(validate_protection_models(&mut full));
    }

    #[test]
    fn hybrid_accepts_either() {
        let mut result = result_with(&[
            ("a.md", "protection_model: hybrid\n".into()),
            ("b.md", format!("protection_model: hybrid\n{}", SECTION)),
        ]);
        assert!(validate_protection_models(&mut result));
    }

    #[test]
    fn missing_and_unknown_models() {
        let mut result = result_with(&[
            ("a.md", "no declaration\n".into()),
            ("b.md", "protection_model: inline\n".into()),
        ]);
        assert!(!validate_protection_models(&mut result));
        assert_eq!(
            error_codes(&result),
            vec![codes::E_MODEL_MISSING, codes::E_MODEL_UNKNOWN]
        );
        let unknown = result.errors().nth(1).unwrap();
        assert!(unknown.message.contains("'inline'"));
    }

    #[test]
    fn empty_declared_value_counts_as_missing() {
        let mut result = result_with(&[
            ("a.md", "protection_model: \"\"\n".into()),
            ("b.md", "protection_model: ''\nprotection_model: embedded\n".into()),
        ]);
        assert!(!validate_protection_models(&mut result));
        assert_eq!(
            error_codes(&result),
            vec![codes::E_MODEL_MISSING, codes::E_MODEL_MISSING]
        );
    }

    #[test]
    fn repeated_runs_duplicate_errors() {
        let mut result = result_with(&[("a.md", "nothing\n".into())]);
        assert!(!validate_protection_models(&mut result));
        assert!(!validate_protection_models(&mut result));
        assert_eq!(result.errors().count(), 2);
    }
}
