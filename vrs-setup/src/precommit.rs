//! Git pre-commit hook management.
//!
//! The installer owns exactly one file in the repository's hook slot and
//! identifies it by a marker line. A pre-existing hook without the marker
//! belongs to the user and is backed up before being replaced; removal only
//! ever touches a hook carrying the marker.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use vrs_common::assets::{MANAGED_MARKER, PRE_COMMIT_SCRIPT};
use vrs_common::fs_ops::{StepOutcome, atomic_write, create_backup, make_executable};
use vrs_common::paths;

/// Installs the pre-commit hook into `project/.git/hooks/pre-commit`.
pub fn install(project: &Path, dry_run: bool) -> Result<StepOutcome> {
    let Some(hook_path) = paths::precommit_path(project) else {
        return Ok(StepOutcome::Skipped(
            "not a git repository (no .git directory)".to_string(),
        ));
    };

    let existing = if hook_path.exists() {
        Some(
            fs::read_to_string(&hook_path)
                .with_context(|| format!("Failed to read {}", hook_path.display()))?,
        )
    } else {
        None
    };

    if existing.as_deref() == Some(PRE_COMMIT_SCRIPT) {
        return Ok(StepOutcome::Unchanged);
    }

    if dry_run {
        return Ok(StepOutcome::WouldChange(format!(
            "write {}",
            hook_path.display()
        )));
    }

    if let Some(parent) = hook_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    if let Some(content) = &existing {
        if content.contains(MANAGED_MARKER) {
            debug!("Updating managed pre-commit hook at {}", hook_path.display());
        } else {
            warn!(
                "Existing pre-commit hook at {} is not managed by vrs-setup, backing it up",
                hook_path.display()
            );
            create_backup(&hook_path)?;
        }
    }

    atomic_write(&hook_path, PRE_COMMIT_SCRIPT.as_bytes())?;
    make_executable(&hook_path)?;
    Ok(StepOutcome::Changed)
}

/// Removes the pre-commit hook if it is ours.
pub fn uninstall(project: &Path, dry_run: bool) -> Result<StepOutcome> {
    let Some(hook_path) = paths::precommit_path(project) else {
        return Ok(StepOutcome::Unchanged);
    };
    if !hook_path.exists() {
        return Ok(StepOutcome::Unchanged);
    }

    let content = fs::read_to_string(&hook_path)
        .with_context(|| format!("Failed to read {}", hook_path.display()))?;
    if !content.contains(MANAGED_MARKER) {
        return Ok(StepOutcome::Skipped(
            "pre-commit hook was not installed by vrs-setup".to_string(),
        ));
    }

    if dry_run {
        return Ok(StepOutcome::WouldChange(format!(
            "remove {}",
            hook_path.display()
        )));
    }

    fs::remove_file(&hook_path)
        .with_context(|| format!("Failed to remove {}", hook_path.display()))?;
    Ok(StepOutcome::Changed)
}

/// Hook state for the status command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrecommitState {
    /// Our hook is in place.
    Installed,
    /// A hook exists but is not ours.
    Foreign,
    /// No hook file in the slot.
    Missing,
    /// Not a git repository.
    NoRepository,
}

pub fn state(project: &Path) -> PrecommitState {
    let Some(hook_path) = paths::precommit_path(project) else {
        return PrecommitState::NoRepository;
    };
    match fs::read_to_string(&hook_path) {
        Ok(content) if content.contains(MANAGED_MARKER) => PrecommitState::Installed,
        Ok(_) => PrecommitState::Foreign,
        Err(_) => PrecommitState::Missing,
    }
}
