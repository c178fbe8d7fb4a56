//! Check command: preflight and validation only, writes nothing.

use std::path::Path;

use crate::cli::output;
use crate::core::{env, pipeline, validate};
use crate::error::{Error, Result};

/// Verify preconditions and required settings without touching any
/// target file.
pub fn execute(manifest_path: &Path, env_override: Option<&Path>) -> Result<()> {
    let (manifest, env_path) = pipeline::preflight(manifest_path, env_override)?;
    let bindings = env::load(&env_path)?;

    output::dimmed(&format!("environment: {}", env_path.display()));

    let failures = validate::check_required(&bindings, &manifest.required);

    output::section("Required settings");
    for name in &manifest.required {
        match failures.iter().find(|f| f.setting() == name.as_str()) {
            Some(failure) => output::warn(&failure.to_string()),
            None => output::success(name),
        }
    }
    if manifest.required.is_empty() {
        output::dimmed("none declared");
    }

    output::section("Plan");
    output::kv("secrets", manifest.secrets.len());
    output::kv("templates", manifest.templates.len());
    output::kv(
        "fragments",
        if manifest.fragments.is_some() { "yes" } else { "no" },
    );
    output::kv(
        "credentials",
        if manifest.credentials.is_some() { "yes" } else { "no" },
    );

    if failures.is_empty() {
        output::success("environment is ready to materialize");
        Ok(())
    } else {
        output::hint("edit the environment file and re-run check");
        Err(Error::RunFailed(failures.len()))
    }
}
