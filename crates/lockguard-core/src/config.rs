//! Defaults and the optional `.lockguard.yaml` file.
//!
//! The CLI layers values as flag > environment > file > default; this module
//! only knows about the last two.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONTRACTS_DIR: &str = ".github/agents";
pub const DEFAULT_REGISTRY_FILE: &str = "governance/contracts/protection-registry.md";
pub const DEFAULT_DIFF_PATH: &str = ".github/agents/";
pub const DEFAULT_MODIFIED_IDS_FILE: &str = "/tmp/modified_lock_ids.txt";
pub const DEFAULT_CONFIG_FILE: &str = ".lockguard.yaml";

pub const DEFAULT_INCLUDE: &[&str] = &["*.agent.md", "*.md"];
pub const DEFAULT_EXCLUDE: &[&str] = &["README.md"];

/// Metadata lines the strict check expects in every section, besides `Lock ID`.
pub const REQUIRED_METADATA: &[(&str, &str)] = &[
    ("reason", "Lock Reason"),
    ("authority", "Lock Authority"),
    ("date", "Lock Date"),
    ("last_reviewed", "Last Reviewed"),
    ("review_frequency", "Review Frequency"),
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Contents of `.lockguard.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub contracts_dir: Option<PathBuf>,
    pub registry_file: Option<PathBuf>,
    pub diff_path: Option<String>,
    pub modified_ids_file: Option<PathBuf>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub require_metadata: bool,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Load `path` if given, else the default file when it exists.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        let mut opts = ScanOptions::default();
        if let Some(include) = &self.include {
            opts.include = include.clone();
        }
        if let Some(exclude) = &self.exclude {
            opts.exclude = exclude.clone();
        }
        opts
    }
}

/// Which files under the contracts directory are scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Globs matched against the file name.
    pub include: Vec<String>,
    /// Exact file names that are never scanned.
    pub exclude: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include: DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect(),
            exclude: DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanOptions {
    pub fn compile_include(&self) -> Result<globset::GlobSet, ConfigError> {
        let mut b = globset::GlobSetBuilder::new();
        for pattern in &self.include {
            let glob = globset::Glob::new(pattern).map_err(|source| ConfigError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            b.add(glob);
        }
        b.build().map_err(|source| ConfigError::Pattern {
            pattern: self.include.join(","),
            source,
        })
    }
}
