//! Effective settings: flag or environment (via clap), then config file, then default.

use super::args::Cli;
use anyhow::Context;
use lockguard_core::config::{
    FileConfig, DEFAULT_CONTRACTS_DIR, DEFAULT_DIFF_PATH, DEFAULT_MODIFIED_IDS_FILE,
    DEFAULT_REGISTRY_FILE,
};
use lockguard_core::{scan_contracts, MetadataOptions, ScanOptions, ScanResult};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Settings {
    pub contracts_dir: PathBuf,
    pub registry_file: PathBuf,
    pub diff_path: String,
    pub modified_ids_file: PathBuf,
    pub scan: ScanOptions,
    pub metadata: MetadataOptions,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let file = FileConfig::discover(cli.config.as_deref()).context("loading config")?;
        Ok(Self::layer(cli, file))
    }

    fn layer(cli: &Cli, file: FileConfig) -> Self {
        let scan = file.scan_options();
        Self {
            contracts_dir: cli
                .contracts_dir
                .clone()
                .or(file.contracts_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTRACTS_DIR)),
            registry_file: cli
                .registry_file
                .clone()
                .or(file.registry_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REGISTRY_FILE)),
            diff_path: cli
                .diff_path
                .clone()
                .or(file.diff_path)
                .unwrap_or_else(|| DEFAULT_DIFF_PATH.to_string()),
            modified_ids_file: cli
                .modified_ids_file
                .clone()
                .or(file.modified_ids_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODIFIED_IDS_FILE)),
            scan,
            metadata: MetadataOptions {
                require_metadata: cli.require_metadata || file.require_metadata,
            },
        }
    }

    /// Run the single scan pass every mode starts from.
    pub fn scan(&self) -> anyhow::Result<ScanResult> {
        scan_contracts(&self.contracts_dir, &self.scan).context("preparing contract scan")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["lockguard", "--mode", "validate-metadata"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_apply_without_flags_or_file() {
        let s = Settings::layer(&cli(&[]), FileConfig::default());
        assert_eq!(s.contracts_dir, PathBuf::from(".github/agents"));
        assert_eq!(
            s.registry_file,
            PathBuf::from("governance/contracts/protection-registry.md")
        );
        assert_eq!(s.diff_path, ".github/agents/");
        assert!(!s.metadata.require_metadata);
    }

    #[test]
    fn file_overrides_defaults_and_flags_override_file() {
        let file = FileConfig::from_yaml(
            "contracts_dir: docs/agents\nregistry_file: reg.md\nrequire_metadata: true\ninclude: ['*.agent.md']\n",
        )
        .unwrap();
        let s = Settings::layer(&cli(&["--contracts-dir", "other"]), file);
        assert_eq!(s.contracts_dir, PathBuf::from("other"));
        assert_eq!(s.registry_file, PathBuf::from("reg.md"));
        assert!(s.metadata.require_metadata);
        assert_eq!(s.scan.include, vec!["*.agent.md".to_string()]);
    }
}
