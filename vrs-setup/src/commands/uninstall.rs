//! The `uninstall` command: removes what install registered.
//!
//! Project configuration files are deliberately left in place; they are
//! project content, not registrations.

use anyhow::{Context, Result};
use console::style;
use std::fs;
use std::path::Path;
use vrs_common::fs_ops::StepOutcome;
use vrs_common::{paths, settings};

use crate::commands::report_step;
use crate::precommit;

pub fn run(project: &Path, dry_run: bool) -> Result<()> {
    println!(
        "{} {}",
        style("Removing vibesrails hooks from").bold(),
        project.display()
    );

    let outcome = unregister_settings(dry_run)?;
    report_step("settings.json PreToolUse hook", &outcome);

    let outcome = remove_hook_script(dry_run)?;
    report_step("hooks/ptuh.py", &outcome);

    let outcome = precommit::uninstall(project, dry_run)?;
    report_step(".git/hooks/pre-commit", &outcome);

    println!(
        "  {} project files ({}, {}, {}) left in place",
        style("i").cyan(),
        paths::PROJECT_CONFIG,
        paths::PROJECT_INSTRUCTIONS,
        paths::PROJECT_HOOKS
    );
    Ok(())
}

fn unregister_settings(dry_run: bool) -> Result<StepOutcome> {
    let Some(settings_path) = paths::settings_path() else {
        return Ok(StepOutcome::Skipped(
            "could not determine home directory".to_string(),
        ));
    };
    let hook_command = paths::hook_command();

    if dry_run {
        // Same read-only check the real run starts from, so a converged
        // document reports "up to date" here too.
        return Ok(if settings::registered_at(&settings_path, &hook_command)? {
            StepOutcome::WouldChange(format!(
                "unregister '{}' from {}",
                hook_command,
                settings_path.display()
            ))
        } else {
            StepOutcome::Unchanged
        });
    }

    Ok(settings::unregister(&settings_path, &hook_command)?)
}

fn remove_hook_script(dry_run: bool) -> Result<StepOutcome> {
    let Some(script_path) = paths::hook_script_path() else {
        return Ok(StepOutcome::Skipped(
            "could not determine home directory".to_string(),
        ));
    };
    if !script_path.exists() {
        return Ok(StepOutcome::Unchanged);
    }
    if dry_run {
        return Ok(StepOutcome::WouldChange(format!(
            "remove {}",
            script_path.display()
        )));
    }
    fs::remove_file(&script_path)
        .with_context(|| format!("Failed to remove {}", script_path.display()))?;
    Ok(StepOutcome::Changed)
}
