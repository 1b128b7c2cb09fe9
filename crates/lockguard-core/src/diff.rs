//! The "diff between two revisions, restricted to a path" capability.

use std::path::PathBuf;
use std::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git diff {range} exited with {status}: {stderr}")]
    Failed {
        range: String,
        status: String,
        stderr: String,
    },

    #[error("git diff output is not valid UTF-8")]
    Encoding,
}

pub trait DiffSource {
    /// Unified diff text for `base..head`, limited to `path`.
    fn diff(&self, base: &str, head: &str, path: &str) -> Result<String, DiffError>;
}

/// Runs `git diff <base>..<head> -- <path>`, blocking until git exits.
#[derive(Debug, Clone, Default)]
pub struct GitDiff {
    /// Working directory for git; the current directory when `None`.
    pub repo: Option<PathBuf>,
}

impl GitDiff {
    pub fn new(repo: Option<PathBuf>) -> Self {
        Self { repo }
    }
}

impl DiffSource for GitDiff {
    fn diff(&self, base: &str, head: &str, path: &str) -> Result<String, DiffError> {
        let range = format!("{}..{}", base, head);
        let mut cmd = Command::new("git");
        cmd.args(["diff", range.as_str(), "--", path]);
        if let Some(repo) = &self.repo {
            cmd.current_dir(repo);
        }

        tracing::debug!("running git diff {} -- {}", range, path);
        let output = cmd.output()?;
        if !output.status.success() {
            return Err(DiffError::Failed {
                range,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|_| DiffError::Encoding)
    }
}

/// Fixed diff text, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct StaticDiff(pub Option<String>);

impl DiffSource for StaticDiff {
    fn diff(&self, base: &str, head: &str, _path: &str) -> Result<String, DiffError> {
        self.0.clone().ok_or_else(|| DiffError::Failed {
            range: format!("{}..{}", base, head),
            status: "exit status: 128".into(),
            stderr: "unknown revision".into(),
        })
    }
}
