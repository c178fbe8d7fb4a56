//! Run command: execute the full materialization pipeline.

use std::path::Path;

use crate::cli::output;
use crate::core::pipeline::{self, RunReport};
use crate::error::{Error, Result};

/// Run preflight and the full pipeline, then summarize.
///
/// Recoverable failures are printed per step and folded into a non-zero
/// exit via `Error::RunFailed`; fatal precondition failures propagate
/// immediately.
pub fn execute(manifest_path: &Path, env_override: Option<&Path>) -> Result<()> {
    let (manifest, env_path) = pipeline::preflight(manifest_path, env_override)?;

    output::dimmed(&format!("environment: {}", env_path.display()));
    let report = pipeline::run(&manifest, &env_path)?;

    print_report(&report);

    if report.is_clean() {
        output::success("materialization complete");
        Ok(())
    } else {
        Err(Error::RunFailed(report.failure_count()))
    }
}

fn print_report(report: &RunReport) {
    for failure in &report.validation {
        output::warn(&failure.to_string());
    }
    for warning in &report.warnings {
        output::warn(warning);
    }
    for failure in &report.failures {
        output::error(&format!("{}: {}", failure.step, failure.error));
    }

    output::section("Summary");
    output::kv("secrets written", report.secrets_written);
    output::kv("artifacts rendered", report.artifacts_rendered);
    output::kv("backups created", report.backups.len());
    output::kv("failures", report.failure_count());

    if !report.backups.is_empty() {
        output::section("Backups");
        for backup in &report.backups {
            output::list_item(&backup.display().to_string());
        }
    }
}
