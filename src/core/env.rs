//! Environment definition file loading.
//!
//! The environment file is the single source of truth for every setting:
//! dotenv-style `KEY=value` lines, one per line, no nested structure.
//! The parsed result is an immutable binding context threaded explicitly
//! through the rest of the pipeline.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{PreconditionError, Result};

/// Immutable mapping from setting name to resolved value.
pub type Bindings = BTreeMap<String, String>;

/// Load the environment definition file.
///
/// # Errors
///
/// Returns `PreconditionError::EnvFileNotFound` if the file is absent;
/// this is fatal since every later step consumes settings from it.
pub fn load(path: &Path) -> Result<Bindings> {
    if !path.exists() {
        return Err(PreconditionError::EnvFileNotFound(path.to_path_buf()).into());
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(parse(&contents))
}

/// Parse dotenv-style content into bindings.
///
/// Skips empty lines and comments. Values keep everything after the
/// first `=`, trimmed, with one level of matching surrounding quotes
/// stripped.
pub fn parse(contents: &str) -> Bindings {
    let mut bindings = Bindings::new();

    for line in contents.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let value = unquote(value.trim());
            bindings.insert(key.to_string(), value.to_string());
        }
    }

    bindings
}

/// Strip one level of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
