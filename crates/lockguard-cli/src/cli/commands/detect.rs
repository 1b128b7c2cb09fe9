use crate::cli::args::Cli;
use crate::cli::ci::{write_modified_ids, GithubOutput};
use crate::cli::output::write_items;
use crate::cli::settings::Settings;
use crate::exit_codes;
use lockguard_core::{detect_modifications, GitDiff};
use std::io::Write;

/// Report locked sections in documents touched between `--base-ref` and `--head-ref`.
pub fn run(cli: &Cli, settings: &Settings) -> anyhow::Result<i32> {
    let (Some(base), Some(head)) = (cli.base_ref.as_deref(), cli.head_ref.as_deref()) else {
        println!("Error: --base-ref and --head-ref required for modification detection");
        return Ok(exit_codes::VALIDATION_FAILED);
    };

    let mut result = settings.scan()?;
    let source = GitDiff::new(cli.repo.clone());
    let report = detect_modifications(&mut result, &source, base, head, &settings.diff_path);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if report.modified {
        writeln!(out, "locked_sections_modified=true")?;
        writeln!(out, "\n⚠️  Locked section modifications detected:\n")?;
        for id in &report.lock_ids {
            writeln!(out, "  - {}", id)?;
        }
    } else {
        writeln!(out, "locked_sections_modified=false")?;
        if !result.has_errors() {
            writeln!(out, "\n✅ No locked section modifications detected")?;
        }
    }

    // step outputs go out before the id list file
    if let Some(gh) = GithubOutput::from_env() {
        gh.append_report(&report)?;
    }
    if report.modified {
        write_modified_ids(&settings.modified_ids_file, &report.lock_ids)?;
    }

    if result.has_errors() {
        writeln!(out, "\n❌ ERRORS:")?;
        write_items(&mut out, result.errors())?;
        return Ok(exit_codes::VALIDATION_FAILED);
    }
    Ok(exit_codes::OK)
}
