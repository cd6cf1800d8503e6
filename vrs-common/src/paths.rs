//! Well-known filesystem locations.
//!
//! The layout is fixed for compatibility with the tool ecosystem this
//! installer feeds: Claude Code reads `settings.json` and the hook script
//! from its config directory, git executes `.git/hooks/pre-commit`, and the
//! vibesrails scanner reads `vibesrails.yaml` from the project root.

use std::path::{Path, PathBuf};

/// Per-project scanner configuration file.
pub const PROJECT_CONFIG: &str = "vibesrails.yaml";
/// Per-project assistant instructions.
pub const PROJECT_INSTRUCTIONS: &str = "CLAUDE.md";
/// Per-project hook definitions, relative to the project root.
pub const PROJECT_HOOKS: &str = ".claude/hooks.json";
/// Name of the per-user PreToolUse hook script.
pub const HOOK_SCRIPT_NAME: &str = "ptuh.py";

/// Environment variable overriding the Claude config directory.
///
/// Claude Code honors the same variable, so pointing both at a sandbox
/// makes the whole integration testable without touching `~/.claude`.
pub const CLAUDE_CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// The Claude config directory: `$CLAUDE_CONFIG_DIR` if set, else `~/.claude`.
pub fn claude_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CLAUDE_CONFIG_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir().map(|h| h.join(".claude"))
}

/// Path to the per-user settings document.
pub fn settings_path() -> Option<PathBuf> {
    claude_config_dir().map(|d| d.join("settings.json"))
}

/// Directory holding per-user hook scripts.
pub fn hooks_dir() -> Option<PathBuf> {
    claude_config_dir().map(|d| d.join("hooks"))
}

/// Path the PreToolUse hook script is written to.
pub fn hook_script_path() -> Option<PathBuf> {
    hooks_dir().map(|d| d.join(HOOK_SCRIPT_NAME))
}

/// The exact command string registered in the settings document.
///
/// The default config dir keeps the tilde form so the registration is
/// portable across machines sharing dotfiles; an overridden dir uses the
/// literal path since tilde would point somewhere else entirely.
pub fn hook_command() -> String {
    match std::env::var(CLAUDE_CONFIG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => {
            format!("python3 {}/hooks/{}", dir.trim_end_matches('/'), HOOK_SCRIPT_NAME)
        }
        _ => format!("python3 ~/.claude/hooks/{}", HOOK_SCRIPT_NAME),
    }
}

/// Path to the git pre-commit hook slot for a project, if the project is a
/// git repository with a regular `.git` directory.
pub fn precommit_path(project: &Path) -> Option<PathBuf> {
    let git_dir = project.join(".git");
    if git_dir.is_dir() {
        Some(git_dir.join("hooks").join("pre-commit"))
    } else {
        None
    }
}
