use lockguard_core::report::codes;
use lockguard_core::{scan_document, validate_protection_models, ScanResult};
use proptest::prelude::*;

const START: &str = "<!-- LOCKED SECTION START -->";
const END: &str = "<!-- LOCKED SECTION END -->";

/// Body lines that never contain a marker.
fn body_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,20}",
        Just("<!-- Lock ID: LOCK-PROP-001 -->".to_string()),
        Just("<!-- Lock Reason: because -->".to_string()),
        Just("## heading".to_string()),
    ]
}

fn sections(n: usize) -> String {
    let mut text = String::new();
    for i in 0..n {
        text.push_str(&format!("{}\n<!-- Lock ID: LOCK-P-{:03} -->\n{}\n", START, i, END));
    }
    text
}

proptest! {
    #[test]
    fn dangling_start_yields_one_error_and_no_section(
        before in prop::collection::vec(body_line(), 0..8),
        after in prop::collection::vec(body_line(), 0..8),
    ) {
        let mut lines = before.clone();
        lines.push(START.to_string());
        lines.extend(after);
        let text = lines.join("\n");

        let doc = scan_document("prop.md", &text);
        prop_assert!(doc.sections.is_empty());
        prop_assert_eq!(doc.findings.len(), 1);
        prop_assert_eq!(doc.findings[0].code, codes::E_LOCK_UNTERMINATED);
        prop_assert_eq!(
            doc.findings[0].location.as_ref().unwrap().line,
            Some(before.len() + 1)
        );
    }

    #[test]
    fn finalized_sections_have_start_before_end(
        bodies in prop::collection::vec(prop::collection::vec(body_line(), 0..4), 0..5),
    ) {
        let mut text = String::new();
        for body in &bodies {
            text.push_str(START);
            text.push('\n');
            for line in body {
                text.push_str(line);
                text.push('\n');
            }
            text.push_str(END);
            text.push('\n');
        }

        let doc = scan_document("prop.md", &text);
        prop_assert!(doc.findings.is_empty());
        prop_assert_eq!(doc.sections.len(), bodies.len());
        for s in &doc.sections {
            prop_assert!(s.start_line < s.end_line.unwrap());
        }
    }

    #[test]
    fn reference_based_fails_iff_sections(n in 0usize..4) {
        let text = format!("protection_model: reference-based\n{}", sections(n));
        let mut result = ScanResult::new("contracts");
        scan_document("ref.md", &text).commit(&mut result);
        prop_assert_eq!(validate_protection_models(&mut result), n == 0);
    }

    #[test]
    fn embedded_fails_iff_no_sections(n in 0usize..4) {
        let text = format!("protection_model: embedded\n{}", sections(n));
        let mut result = ScanResult::new("contracts");
        scan_document("emb.md", &text).commit(&mut result);
        prop_assert_eq!(validate_protection_models(&mut result), n > 0);
    }
}
