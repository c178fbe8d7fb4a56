//! Pipeline orchestration and failure aggregation.
//!
//! The orchestrator runs every step of the materialization in order:
//! preflight, validation, generated bindings, secret files, templates.
//! Fatal precondition failures abort immediately; everything else is
//! aggregated into a [`RunReport`] while the run continues with the next
//! independent operation.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::env::{self, Bindings};
use crate::core::manifest::Manifest;
use crate::core::secrets::{self, SecretMode};
use crate::core::{fragments, reindent, template, validate};
use crate::error::{Error, PreconditionError, Result, ValidationError};

/// One recoverable step failure, kept with the step's description so the
/// summary can say exactly which operation needs remediation.
#[derive(Debug)]
pub struct StepFailure {
    pub step: String,
    pub error: Error,
}

/// Everything a run surfaced: validation results, per-step failures,
/// warnings, and what was actually written.
#[derive(Debug, Default)]
pub struct RunReport {
    pub validation: Vec<ValidationError>,
    pub failures: Vec<StepFailure>,
    pub warnings: Vec<String>,
    pub secrets_written: usize,
    pub artifacts_rendered: usize,
    pub backups: Vec<PathBuf>,
}

impl RunReport {
    /// A clean run has no validation failures and no step failures.
    pub fn is_clean(&self) -> bool {
        self.validation.is_empty() && self.failures.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.validation.len() + self.failures.len()
    }
}

/// Fail-fast preconditions: manifest readable, environment file present,
/// invoking identity as declared.
///
/// Returns the manifest and the resolved environment file path.
///
/// # Errors
///
/// Every failure here is fatal; nothing later can succeed without the
/// manifest and the environment file.
pub fn preflight(manifest_path: &Path, env_override: Option<&Path>) -> Result<(Manifest, PathBuf)> {
    let manifest = Manifest::load(manifest_path)?;

    let env_path = env_override
        .unwrap_or(&manifest.env_file)
        .to_path_buf();
    if !env_path.exists() {
        return Err(PreconditionError::EnvFileNotFound(env_path).into());
    }

    if let Some(expected) = &manifest.expect_user {
        let actual = whoami::username();
        if &actual != expected {
            return Err(PreconditionError::WrongUser {
                expected: expected.clone(),
                actual,
            }
            .into());
        }
    }

    debug!(manifest = %manifest_path.display(), env = %env_path.display(), "preflight ok");
    Ok((manifest, env_path))
}

/// Execute the full pipeline against a preflighted manifest.
///
/// # Errors
///
/// Only fatal errors propagate (environment file unreadable mid-run);
/// recoverable step failures land in the report.
pub fn run(manifest: &Manifest, env_path: &Path) -> Result<RunReport> {
    let mut bindings = env::load(env_path)?;
    let mut report = RunReport::default();

    report.validation = validate::check_required(&bindings, &manifest.required);
    for failure in &report.validation {
        warn!("validation: {failure}");
    }

    bind_generated(manifest, &mut bindings, &mut report);

    for spec in &manifest.secrets {
        let step = format!("secret {} -> {}", spec.setting, spec.target.display());
        match secrets::materialize(spec, &bindings) {
            Ok(backup) => {
                info!("wrote {}", spec.target.display());
                report.secrets_written += 1;
                report.backups.extend(backup);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => report.failures.push(StepFailure { step, error: e }),
        }
    }

    for mapping in &manifest.templates {
        let step = format!(
            "render {} -> {}",
            mapping.source.display(),
            mapping.target.display()
        );
        match template::render(mapping, &bindings) {
            Ok(backup) => {
                info!("rendered {}", mapping.target.display());
                report.artifacts_rendered += 1;
                report.backups.extend(backup);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => report.failures.push(StepFailure { step, error: e }),
        }
    }

    Ok(report)
}

/// Compute the generated bindings (fragment blocks, reindented credential
/// payload) before any rendering that consumes them.
fn bind_generated(manifest: &Manifest, bindings: &mut Bindings, report: &mut RunReport) {
    if let Some(section) = &manifest.fragments {
        let raw_list = bindings.get(&section.list_setting).map(String::as_str);
        let blocks = fragments::generate(raw_list, &section.default_pattern);
        debug!(setting = %section.list_setting, "generated scrape-job fragments");
        bindings.insert(section.bind_as.clone(), blocks);
    }

    if let Some(section) = &manifest.credentials {
        let block = match bindings.get(&section.setting).filter(|v| !v.is_empty()) {
            Some(value) => {
                match secrets::decode(&section.setting, value, SecretMode::Base64)
                    .map(|bytes| String::from_utf8(bytes.to_vec()))
                {
                    Ok(Ok(text)) => {
                        reindent::reindent(&text, section.middle_indent, section.last_indent)
                    }
                    Ok(Err(_)) | Err(_) => {
                        // Optional object-storage credential; its absence
                        // must not block the rest of the rendering.
                        let msg = format!(
                            "setting {} is not a decodable credential payload, \
                             binding {} as empty",
                            section.setting, section.bind_as
                        );
                        warn!("{msg}");
                        report.warnings.push(msg);
                        String::new()
                    }
                }
            }
            None => {
                let msg = format!(
                    "setting {} not provided, binding {} as empty",
                    section.setting, section.bind_as
                );
                warn!("{msg}");
                report.warnings.push(msg);
                String::new()
            }
        };
        bindings.insert(section.bind_as.clone(), block);
    }
}
