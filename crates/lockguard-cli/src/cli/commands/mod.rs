use super::args::{Cli, Mode};
use super::settings::Settings;

pub mod detect;
pub mod registry;
pub mod validate;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let settings = Settings::resolve(&cli)?;
    tracing::debug!(mode = cli.mode.as_str(), "contracts dir {}", settings.contracts_dir.display());
    match cli.mode {
        Mode::DetectModifications => detect::run(&cli, &settings),
        Mode::ValidateMetadata => validate::run(&cli, &settings),
        Mode::VerifyRegistry => registry::run(&cli, &settings),
    }
}

/// Exit status for a finished check: any error finding fails the run.
pub(crate) fn decide_exit(passed: bool, result: &lockguard_core::ScanResult) -> i32 {
    if passed && !result.has_errors() {
        crate::exit_codes::OK
    } else {
        crate::exit_codes::VALIDATION_FAILED
    }
}
