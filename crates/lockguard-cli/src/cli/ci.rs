//! Files consumed by the surrounding workflow.

use anyhow::Context;
use lockguard_core::ModificationReport;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Step output file named by `GITHUB_OUTPUT`, when running in GitHub Actions.
#[derive(Debug, Clone)]
pub struct GithubOutput {
    path: PathBuf,
}

impl GithubOutput {
    pub fn from_env() -> Option<Self> {
        std::env::var_os("GITHUB_OUTPUT")
            .filter(|v| !v.is_empty())
            .map(|v| Self { path: v.into() })
    }

    /// Append `locked_sections_modified` and, when set, `modified_locks`.
    pub fn append_report(&self, report: &ModificationReport) -> anyhow::Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening GITHUB_OUTPUT {}", self.path.display()))?;
        f.write_all(render_outputs(report).as_bytes())
            .with_context(|| format!("writing GITHUB_OUTPUT {}", self.path.display()))?;
        Ok(())
    }
}

fn render_outputs(report: &ModificationReport) -> String {
    if report.modified {
        format!(
            "locked_sections_modified=true\nmodified_locks={}\n",
            report.lock_ids.join(", ")
        )
    } else {
        "locked_sections_modified=false\n".to_string()
    }
}

/// One `- <id>` line per affected section, replacing any previous list.
pub fn write_modified_ids(path: &Path, lock_ids: &[String]) -> anyhow::Result<()> {
    let body: String = lock_ids.iter().map(|id| format!("- {}\n", id)).collect();
    std::fs::write(path, body)
        .with_context(|| format!("writing modified Lock IDs to {}", path.display()))
}
