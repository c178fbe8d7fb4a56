//! `${VARIABLE}` substitution and artifact rendering.
//!
//! The substitution engine is textual and context-free: it never parses
//! the template's own syntax. Unrecognized placeholders stay literal, and
//! substituted values are not rescanned, so a generated fragment chunk
//! containing `${...}` text passes through untouched.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::backup;
use crate::core::env::Bindings;
use crate::error::{RenderError, Result};

/// One template to render, declared in the manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateMapping {
    /// Template file containing `${VARIABLE}` placeholders.
    pub source: PathBuf,
    /// Artifact file the rendered output is written to.
    pub target: PathBuf,
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Replace every recognized `${VARIABLE}` placeholder with its binding.
///
/// Placeholders whose name is unbound or not a plain identifier are left
/// as literal text. Replacement values are appended directly and never
/// rescanned.
pub fn substitute(template: &str, bindings: &Bindings) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find("${") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];

        match after.find('}') {
            Some(end) if is_identifier(&after[..end]) => {
                match bindings.get(&after[..end]) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[pos..pos + end + 3]),
                }
                rest = &after[end + 1..];
            }
            _ => {
                // Malformed or non-identifier placeholder stays literal;
                // keep scanning after the opener.
                out.push_str("${");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Render one template into its target artifact, returning the backup
/// path if the target pre-existed.
///
/// # Errors
///
/// Returns `RenderError::TemplateNotFound` when the source is absent,
/// `RenderError::Read` when it cannot be read, and `RenderError::Write`
/// on any failure while backing up or writing the artifact.
pub fn render(mapping: &TemplateMapping, bindings: &Bindings) -> Result<Option<PathBuf>> {
    if !mapping.source.exists() {
        return Err(RenderError::TemplateNotFound(mapping.source.clone()).into());
    }

    let template = std::fs::read_to_string(&mapping.source).map_err(|e| RenderError::Read {
        path: mapping.source.clone(),
        source: e,
    })?;

    let rendered = substitute(&template, bindings);

    if let Some(parent) = mapping.target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| write_error(&mapping.target, e))?;
        }
    }

    let backup = backup::backup_existing(&mapping.target)
        .map_err(|e| write_error(&mapping.target, e))?;

    std::fs::write(&mapping.target, rendered).map_err(|e| write_error(&mapping.target, e))?;

    Ok(backup)
}

fn write_error(path: &Path, source: std::io::Error) -> crate::error::Error {
    RenderError::Write {
        path: path.to_path_buf(),
        source,
    }
    .into()
}
