//! The `install` command: project files, git pre-commit hook, Claude Code
//! hook registration, and the scanner package itself.
//!
//! Every step is idempotent and reports a [`StepOutcome`]; a converged
//! project re-runs as a sequence of "up to date" lines.

use anyhow::{Context, Result};
use console::style;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;
use vrs_common::fs_ops::{StepOutcome, atomic_write, create_backup};
use vrs_common::settings::PatchOutcome;
use vrs_common::{assets, discovery, paths, settings};

use crate::commands::report_step;
use crate::{pkg, precommit};

pub struct InstallOptions {
    pub project: PathBuf,
    pub dry_run: bool,
    pub force: bool,
    pub skip_package: bool,
}

pub fn run(opts: &InstallOptions) -> Result<()> {
    println!(
        "{} {}",
        style("Installing vibesrails into").bold(),
        opts.project.display()
    );

    for (rel, contents) in project_files() {
        let outcome = place_file(&opts.project.join(rel), contents, opts)?;
        report_step(rel, &outcome);
    }

    let outcome = precommit::install(&opts.project, opts.dry_run)?;
    report_step(".git/hooks/pre-commit", &outcome);

    install_claude_hook(opts)?;

    let outcome = install_package(opts)?;
    report_step("vibesrails package", &outcome);

    if opts.dry_run {
        println!("{}", style("Dry run: nothing was changed.").yellow());
    } else {
        println!("{}", style("Done.").green().bold());
    }
    Ok(())
}

fn project_files() -> [(&'static str, &'static str); 3] {
    [
        (paths::PROJECT_CONFIG, assets::PROJECT_CONFIG_TEMPLATE),
        (paths::PROJECT_INSTRUCTIONS, assets::ASSISTANT_INSTRUCTIONS),
        (paths::PROJECT_HOOKS, assets::PROJECT_HOOKS_JSON),
    ]
}

/// Places one static file. Existing files are left verbatim unless `--force`
/// is given, in which case a timestamped backup is kept.
fn place_file(dest: &Path, contents: &str, opts: &InstallOptions) -> Result<StepOutcome> {
    if dest.exists() {
        let existing = fs::read_to_string(dest)
            .with_context(|| format!("Failed to read {}", dest.display()))?;
        if existing == contents {
            return Ok(StepOutcome::Unchanged);
        }
        if !opts.force {
            return Ok(StepOutcome::Skipped(
                "exists with local edits; use --force to overwrite".to_string(),
            ));
        }
        if opts.dry_run {
            return Ok(StepOutcome::WouldChange(format!(
                "overwrite {}",
                dest.display()
            )));
        }
        create_backup(dest)?;
        atomic_write(dest, contents.as_bytes())?;
        return Ok(StepOutcome::Changed);
    }

    if opts.dry_run {
        return Ok(StepOutcome::WouldChange(format!("write {}", dest.display())));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    atomic_write(dest, contents.as_bytes())?;
    Ok(StepOutcome::Changed)
}

/// Writes the per-user hook script and registers it in the settings
/// document. Both steps apply only when the Claude config directory already
/// exists: a user without Claude Code does not get a `~/.claude` fabricated
/// for them.
fn install_claude_hook(opts: &InstallOptions) -> Result<()> {
    let skip = |reason: &str| {
        report_step("hooks/ptuh.py", &StepOutcome::Skipped(reason.to_string()));
        report_step(
            "settings.json PreToolUse hook",
            &StepOutcome::Skipped(reason.to_string()),
        );
    };

    let Some(claude_dir) = paths::claude_config_dir() else {
        skip("could not determine home directory");
        return Ok(());
    };
    if !claude_dir.exists() {
        skip("Claude Code not detected (config directory missing)");
        return Ok(());
    }

    let script_path = paths::hook_script_path()
        .context("Could not determine hook script path")?;
    let outcome = place_hook_script(&script_path, opts.dry_run)?;
    report_step("hooks/ptuh.py", &outcome);

    let settings_path = paths::settings_path()
        .context("Could not determine settings path")?;
    let hook_command = paths::hook_command();

    let outcome = if opts.dry_run {
        if settings::registered_at(&settings_path, &hook_command)? {
            StepOutcome::Unchanged
        } else {
            StepOutcome::WouldChange(format!(
                "register '{}' in {}",
                hook_command,
                settings_path.display()
            ))
        }
    } else {
        match settings::patch(&settings_path, &hook_command)? {
            PatchOutcome::Registered => StepOutcome::Changed,
            PatchOutcome::AlreadyRegistered => StepOutcome::Unchanged,
        }
    };
    report_step("settings.json PreToolUse hook", &outcome);
    Ok(())
}

fn place_hook_script(script_path: &Path, dry_run: bool) -> Result<StepOutcome> {
    if script_path.exists() {
        let existing = fs::read_to_string(script_path)
            .with_context(|| format!("Failed to read {}", script_path.display()))?;
        if existing == assets::PRE_TOOL_USE_SCRIPT {
            return Ok(StepOutcome::Unchanged);
        }
        if dry_run {
            return Ok(StepOutcome::WouldChange(format!(
                "update {}",
                script_path.display()
            )));
        }
        // A locally modified hook script still gets replaced (it is the
        // self-protection hook), but never without a backup.
        create_backup(script_path)?;
    } else if dry_run {
        return Ok(StepOutcome::WouldChange(format!(
            "write {}",
            script_path.display()
        )));
    }

    if let Some(parent) = script_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    atomic_write(script_path, assets::PRE_TOOL_USE_SCRIPT.as_bytes())?;
    Ok(StepOutcome::Changed)
}

fn install_package(opts: &InstallOptions) -> Result<StepOutcome> {
    if opts.skip_package {
        return Ok(StepOutcome::Skipped(
            "--skip-package (files and hooks only)".to_string(),
        ));
    }

    let manager = pkg::select()?;
    if opts.dry_run {
        return Ok(StepOutcome::WouldChange(format!(
            "run '{}' then '{} {}'",
            manager.render(),
            discovery::SCANNER,
            discovery::SETUP_FLAG
        )));
    }

    pkg::install_scanner(&opts.project)?;

    let invocation = discovery::discover(&opts.project)?;
    info!(
        "Running scanner setup via {} ({})",
        invocation.render(),
        invocation.source
    );
    let status = Command::new(&invocation.program)
        .args(&invocation.leading_args)
        .arg(discovery::SETUP_FLAG)
        .current_dir(&opts.project)
        .status()
        .with_context(|| format!("Failed to run {}", invocation.render()))?;
    if !status.success() {
        return Err(vrs_common::SetupError::CommandFailed {
            command: format!("{} {}", invocation.render(), discovery::SETUP_FLAG),
            status: status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "terminated by signal".to_string()),
        }
        .into());
    }
    Ok(StepOutcome::Changed)
}
