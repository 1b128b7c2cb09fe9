use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "lockguard",
    version,
    about = "Validate locked section integrity in agent contracts"
)]
pub struct Cli {
    /// Validation mode
    #[arg(long, value_enum)]
    pub mode: Mode,

    /// Directory containing agent contracts [default: .github/agents]
    #[arg(long, env = "LOCKGUARD_CONTRACTS_DIR")]
    pub contracts_dir: Option<PathBuf>,

    /// Path to protection registry [default: governance/contracts/protection-registry.md]
    #[arg(long, env = "LOCKGUARD_REGISTRY_FILE")]
    pub registry_file: Option<PathBuf>,

    /// Base git reference for modification detection
    #[arg(long)]
    pub base_ref: Option<String>,

    /// Head git reference for modification detection
    #[arg(long)]
    pub head_ref: Option<String>,

    /// Summary format for validate-metadata and verify-registry
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// YAML config file [default: .lockguard.yaml when present]
    #[arg(long, env = "LOCKGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Warn about sections without the full set of metadata lines
    #[arg(long)]
    pub require_metadata: bool,

    /// Pathspec passed to git diff [default: .github/agents/]
    #[arg(long)]
    pub diff_path: Option<String>,

    /// Where detect-modifications writes the affected Lock IDs [default: /tmp/modified_lock_ids.txt]
    #[arg(long)]
    pub modified_ids_file: Option<PathBuf>,

    /// Repository to run git in [default: current directory]
    #[arg(long)]
    pub repo: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    DetectModifications,
    ValidateMetadata,
    VerifyRegistry,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::DetectModifications => "detect-modifications",
            Mode::ValidateMetadata => "validate-metadata",
            Mode::VerifyRegistry => "verify-registry",
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
