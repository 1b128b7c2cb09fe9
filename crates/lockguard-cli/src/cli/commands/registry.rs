use crate::cli::args::Cli;
use crate::cli::output::print_summary;
use crate::cli::settings::Settings;
use lockguard_core::verify_registry_sync;

pub fn run(cli: &Cli, settings: &Settings) -> anyhow::Result<i32> {
    let mut result = settings.scan()?;
    let passed = verify_registry_sync(&mut result, &settings.registry_file);
    let exit_code = super::decide_exit(passed, &result);
    print_summary(&result, cli.mode, cli.format, exit_code)?;
    Ok(exit_code)
}
