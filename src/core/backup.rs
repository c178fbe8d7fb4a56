//! Timestamped backup-before-overwrite.
//!
//! A target file is never overwritten without a sibling backup of its
//! previous content. Backups accumulate and are never pruned; pruning is
//! left to the operator.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

/// Back up `target` if it exists, returning the backup path.
///
/// The backup is a sibling named `<file-name>.<YYYYMMDDHHMMSS>.bak`,
/// second resolution, local time. Returns `Ok(None)` when the target
/// does not exist yet.
pub fn backup_existing(target: &Path) -> io::Result<Option<PathBuf>> {
    if !target.exists() {
        return Ok(None);
    }

    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup".to_string());
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let backup = target.with_file_name(format!("{}.{}.bak", file_name, stamp));

    std::fs::copy(target, &backup)?;
    Ok(Some(backup))
}
