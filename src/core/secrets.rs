//! Secret file materialization.
//!
//! Decodes a setting per its declared mode and writes it to the target
//! path with owner-only permissions, backing up any previous version
//! first. Safe to re-run: overwrite semantics are backup-then-write.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::core::backup;
use crate::core::env::Bindings;
use crate::error::{Result, SecretError, ValidationError};

/// How a setting's value becomes file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretMode {
    /// Value written as-is with a trailing newline appended.
    Raw,
    /// Value decoded from base64 before writing.
    Base64,
}

/// One secret to materialize, declared in the manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretSpec {
    /// Name of the source setting in the environment file.
    pub setting: String,
    /// File the decoded value is written to.
    pub target: PathBuf,
    /// Decoding applied to the value.
    pub mode: SecretMode,
}

/// Decode a setting value per the given mode.
///
/// The buffer is zeroized on drop; secret material should not linger in
/// freed memory.
///
/// # Errors
///
/// Returns `SecretError::Decode` for malformed base64.
pub fn decode(setting: &str, value: &str, mode: SecretMode) -> Result<Zeroizing<Vec<u8>>> {
    match mode {
        SecretMode::Raw => {
            let mut bytes = value.as_bytes().to_vec();
            bytes.push(b'\n');
            Ok(Zeroizing::new(bytes))
        }
        SecretMode::Base64 => BASE64
            .decode(value.trim())
            .map(Zeroizing::new)
            .map_err(|e| {
                SecretError::Decode {
                    setting: setting.to_string(),
                    reason: e.to_string(),
                }
                .into()
            }),
    }
}

/// Materialize one secret file, returning the backup path if the target
/// pre-existed.
///
/// # Errors
///
/// Returns `ValidationError::Missing` when the source setting is absent
/// or empty, `SecretError::Decode` on malformed base64, and
/// `SecretError::Write` on any filesystem failure.
pub fn materialize(spec: &SecretSpec, bindings: &Bindings) -> Result<Option<PathBuf>> {
    let value = bindings
        .get(&spec.setting)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ValidationError::Missing(spec.setting.clone()))?;

    let payload = decode(&spec.setting, value, spec.mode)?;

    if let Some(parent) = spec.target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| write_error(&spec.target, e))?;
        }
    }

    let backup = backup::backup_existing(&spec.target)
        .map_err(|e| write_error(&spec.target, e))?;

    std::fs::write(&spec.target, payload.as_slice())
        .map_err(|e| write_error(&spec.target, e))?;

    restrict_permissions(&spec.target)?;

    Ok(backup)
}

fn write_error(path: &Path, source: std::io::Error) -> crate::error::Error {
    SecretError::Write {
        path: path.to_path_buf(),
        source,
    }
    .into()
}

/// Owner read/write only, nothing for group or other.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| write_error(path, e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
