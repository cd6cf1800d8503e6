//! Filesystem primitives shared by the installer steps.
//!
//! Every mutation of an existing file goes through [`atomic_write`] so that
//! other readers only ever observe the old content or the new content,
//! never a partial write.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Result of one idempotent installer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step made a change.
    Changed,
    /// The step found the desired state already in place.
    Unchanged,
    /// Dry-run: the step would have made the described change.
    WouldChange(String),
    /// The step did not apply (with reason).
    Skipped(String),
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepOutcome::Changed => write!(f, "changed"),
            StepOutcome::Unchanged => write!(f, "up to date"),
            StepOutcome::WouldChange(what) => write!(f, "would change: {}", what),
            StepOutcome::Skipped(reason) => write!(f, "skipped: {}", reason),
        }
    }
}

/// Writes content to a file atomically using a temporary file.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path.parent().context("Path has no parent directory")?;
    let temp_path = parent.join(format!(".{}.tmp", Uuid::new_v4()));

    let mut file = fs::File::create(&temp_path)
        .with_context(|| format!("Failed to create temp file {:?}", temp_path))?;
    file.write_all(content)
        .with_context(|| format!("Failed to write to temp file {:?}", temp_path))?;
    file.sync_all().context("Failed to sync temp file")?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename {:?} to {:?}", temp_path, path))?;

    Ok(())
}

/// Creates a timestamped backup of a file if it exists.
pub fn create_backup(path: &Path) -> Result<PathBuf> {
    let backup_name = format!(
        "{}.bak.{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("file"),
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );
    let backup_path = path
        .parent()
        .map(|p| p.join(&backup_name))
        .unwrap_or_else(|| PathBuf::from(&backup_name));

    fs::copy(path, &backup_path)
        .with_context(|| format!("Failed to create backup at {:?}", backup_path))?;

    debug!("Created backup: {:?}", backup_path);
    Ok(backup_path)
}

/// Writes a file only when it does not already exist.
///
/// Existing files are left verbatim so that re-running the installer never
/// clobbers user edits.
pub fn copy_if_absent(dest: &Path, contents: &str) -> Result<StepOutcome> {
    if dest.exists() {
        debug!("File exists, leaving untouched: {}", dest.display());
        return Ok(StepOutcome::Unchanged);
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    atomic_write(dest, contents.as_bytes())?;
    Ok(StepOutcome::Changed)
}

/// Marks a file executable (0755) on Unix. No-op elsewhere.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = fs::Permissions::from_mode(0o755);
    fs::set_permissions(path, perms)
        .with_context(|| format!("Failed to set permissions on {:?}", path))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
