//! The `status` command: read-only report of what is installed.

use anyhow::Result;
use console::style;
use std::fs;
use std::path::Path;
use vrs_common::{discovery, paths, settings};

use crate::pkg;
use crate::precommit::{self, PrecommitState};

pub fn run(project: &Path) -> Result<()> {
    println!("{} {}", style("vibesrails status for").bold(), project.display());

    for rel in [
        paths::PROJECT_CONFIG,
        paths::PROJECT_INSTRUCTIONS,
        paths::PROJECT_HOOKS,
    ] {
        let present = project.join(rel).is_file();
        print_line(rel, present, if present { "present" } else { "missing" });
    }

    match precommit::state(project) {
        PrecommitState::Installed => print_line(".git/hooks/pre-commit", true, "installed"),
        PrecommitState::Foreign => {
            print_line(".git/hooks/pre-commit", false, "present but not managed by vrs-setup")
        }
        PrecommitState::Missing => print_line(".git/hooks/pre-commit", false, "missing"),
        PrecommitState::NoRepository => {
            print_line(".git/hooks/pre-commit", false, "not a git repository")
        }
    }

    report_claude_status();

    match discovery::discover(project) {
        Ok(invocation) => print_line(
            "vibesrails scanner",
            true,
            &format!("{} (via {})", invocation.render(), invocation.source),
        ),
        Err(e) => print_line("vibesrails scanner", false, &e.to_string()),
    }

    match pkg::select() {
        Ok(manager) => print_line("package manager", true, manager.program),
        Err(_) => print_line("package manager", false, "none of pip3 / python3 / pipx on PATH"),
    }

    Ok(())
}

fn report_claude_status() {
    let Some(claude_dir) = paths::claude_config_dir() else {
        print_line("Claude Code", false, "could not determine home directory");
        return;
    };
    if !claude_dir.exists() {
        print_line("Claude Code", false, "config directory missing");
        return;
    }

    let script_present = paths::hook_script_path().is_some_and(|p| p.is_file());
    print_line(
        "hooks/ptuh.py",
        script_present,
        if script_present { "present" } else { "missing" },
    );

    let Some(settings_path) = paths::settings_path() else {
        return;
    };
    if !settings_path.exists() {
        print_line("settings.json PreToolUse hook", false, "no settings file");
        return;
    }
    match fs::read_to_string(&settings_path)
        .ok()
        .and_then(|c| serde_json::from_str::<serde_json::Value>(&c).ok())
    {
        Some(doc) => {
            let registered = settings::command_registered(&doc, &paths::hook_command());
            print_line(
                "settings.json PreToolUse hook",
                registered,
                if registered { "registered" } else { "not registered" },
            );
        }
        None => print_line(
            "settings.json PreToolUse hook",
            false,
            "settings file is not valid JSON",
        ),
    }
}

fn print_line(label: &str, ok: bool, detail: &str) {
    let glyph = if ok {
        style("ok").green().bold()
    } else {
        style("--").yellow()
    };
    println!("  [{glyph}] {label}: {detail}");
}
