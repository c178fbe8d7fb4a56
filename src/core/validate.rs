//! Required-setting validation.
//!
//! A required setting must be present, non-empty, and must not still
//! carry a placeholder sentinel copied from the example environment file.

use crate::core::env::Bindings;
use crate::error::ValidationError;

/// Value prefixes that mark a setting as an unfilled placeholder.
pub const PLACEHOLDER_PREFIXES: &[&str] = &["ENTER_", "REPLACE_"];

/// Check a single setting.
///
/// # Errors
///
/// Returns `ValidationError::Missing` for an absent or empty value and
/// `ValidationError::Placeholder` for a value that still starts with one
/// of the reserved placeholder prefixes.
pub fn check_setting(bindings: &Bindings, name: &str) -> Result<(), ValidationError> {
    let value = match bindings.get(name) {
        Some(v) if !v.is_empty() => v,
        _ => return Err(ValidationError::Missing(name.to_string())),
    };

    if PLACEHOLDER_PREFIXES.iter().any(|p| value.starts_with(p)) {
        return Err(ValidationError::Placeholder {
            name: name.to_string(),
            value: value.clone(),
        });
    }

    Ok(())
}

/// Check every required setting, collecting all failures.
///
/// Each setting is checked independently: one failure never prevents
/// checking the rest.
pub fn check_required(bindings: &Bindings, required: &[String]) -> Vec<ValidationError> {
    required
        .iter()
        .filter_map(|name| check_setting(bindings, name).err())
        .collect()
}
