//! Summary rendering shared by `validate-metadata` and `verify-registry`.

use super::args::{Mode, OutputFormat};
use lockguard_core::{Finding, ScanResult};
use serde_json::json;
use std::io::Write;

const RULE_WIDTH: usize = 80;

pub fn print_summary(
    result: &ScanResult,
    mode: Mode,
    format: OutputFormat,
    exit_code: i32,
) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => write_text_summary(&mut out, result)?,
        OutputFormat::Json => {
            let doc = build_summary_json(result, mode, exit_code);
            writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
        }
    }
    Ok(())
}

pub fn write_text_summary(out: &mut impl Write, result: &ScanResult) -> std::io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    let summary = result.summary();

    writeln!(out, "\n{}", rule)?;
    writeln!(out, "LOCKED SECTION VALIDATION SUMMARY")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "\nScanned: {}", result.contracts_dir.display())?;
    writeln!(out, "Locked sections found: {}", summary.locked_sections)?;
    writeln!(out, "Errors: {}", summary.errors)?;
    writeln!(out, "Warnings: {}", summary.warnings)?;

    if summary.errors > 0 {
        writeln!(out, "\n❌ ERRORS:")?;
        write_items(out, result.errors())?;
    }
    if summary.warnings > 0 {
        writeln!(out, "\n⚠️  WARNINGS:")?;
        write_items(out, result.warnings())?;
    }
    if summary.errors == 0 && summary.warnings == 0 {
        writeln!(out, "\n✅ All locked section validations passed")?;
    }

    writeln!(out, "{}\n", rule)
}

pub fn write_items<'a>(
    out: &mut impl Write,
    findings: impl Iterator<Item = &'a Finding>,
) -> std::io::Result<()> {
    for f in findings {
        writeln!(out, "  - {}", f)?;
    }
    Ok(())
}

pub fn build_summary_json(result: &ScanResult, mode: Mode, exit_code: i32) -> serde_json::Value {
    let summary = result.summary();
    json!({
        "schema_version": 1,
        "ok": summary.errors == 0,
        "exit_code": exit_code,

        "tool": {
            "name": "lockguard",
            "version": env!("CARGO_PKG_VERSION")
        },

        "command": {
            "name": mode.as_str(),
            "contracts_dir": result.contracts_dir.display().to_string()
        },

        "locked_sections": result.sections,
        "diagnostics": result.findings,
        "summary": summary
    })
}
