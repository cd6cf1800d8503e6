//! Static files the installer places into projects and the user's Claude
//! config directory, embedded at build time.

/// Project scanner configuration template (`vibesrails.yaml`).
pub const PROJECT_CONFIG_TEMPLATE: &str = include_str!("../assets/vibesrails.yaml");

/// Assistant instructions (`CLAUDE.md`).
pub const ASSISTANT_INSTRUCTIONS: &str = include_str!("../assets/CLAUDE.md");

/// Project hook definitions (`.claude/hooks.json`).
pub const PROJECT_HOOKS_JSON: &str = include_str!("../assets/hooks.json");

/// Per-user PreToolUse hook script (`~/.claude/hooks/ptuh.py`).
pub const PRE_TOOL_USE_SCRIPT: &str = include_str!("../assets/ptuh.py");

/// Git pre-commit hook script (`.git/hooks/pre-commit`).
pub const PRE_COMMIT_SCRIPT: &str = include_str!("../assets/pre-commit");

/// Marker line identifying files written by this tool.
///
/// The installer only overwrites or removes a pre-commit hook that carries
/// this marker; anything else belongs to the user.
pub const MANAGED_MARKER: &str = "# managed by vrs-setup (vibesrails)";
