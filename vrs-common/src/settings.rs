//! Idempotent patcher for the Claude Code settings document.
//!
//! The settings document is externally persisted state shared across
//! installer runs: it is read once, mutated in memory, and written back
//! atomically as the last step. A document that does not parse as a valid
//! settings document aborts the operation without writing; user data is
//! never silently discarded or coerced into shape.

use crate::errors::PatchError;
use crate::fs_ops::{StepOutcome, atomic_write, create_backup};
use serde_json::{Value, json};
use std::path::Path;
use tracing::{debug, warn};

/// Matcher covering the tool events the hook guards: file edits, file
/// writes, and shell command execution.
pub const PRE_TOOL_USE_MATCHER: &str = "Edit|Write|Bash";

/// Result of a settings patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The hook command was appended and the document rewritten.
    Registered,
    /// The hook command was already present; the file was not touched.
    AlreadyRegistered,
}

impl std::fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatchOutcome::Registered => write!(f, "registered"),
            PatchOutcome::AlreadyRegistered => write!(f, "already registered"),
        }
    }
}

/// Ensures `hook_command` is registered exactly once under the `PreToolUse`
/// event of the settings document at `path`.
///
/// An absent file starts from an empty document. Pre-existing entries are
/// never removed or reordered; when the command is already present nothing
/// is written at all, so repeated runs leave the file byte-for-byte stable.
pub fn patch(path: &Path, hook_command: &str) -> Result<PatchOutcome, PatchError> {
    let mut settings = load(path)?;

    if command_registered(&settings, hook_command) {
        debug!("Hook command already registered in {}", path.display());
        return Ok(PatchOutcome::AlreadyRegistered);
    }

    if path.exists()
        && let Err(e) = create_backup(path)
    {
        warn!("Could not create settings backup: {}", e);
    }

    append_matcher_group(&mut settings, hook_command, path)?;
    store(path, &settings)?;

    debug!("Registered hook command in {}", path.display());
    Ok(PatchOutcome::Registered)
}

/// Removes the matcher groups this tool registered for `hook_command`.
///
/// Entries registered by other tools are preserved. Absent file or absent
/// entry is an idempotent no-op.
pub fn unregister(path: &Path, hook_command: &str) -> Result<StepOutcome, PatchError> {
    if !path.exists() {
        return Ok(StepOutcome::Unchanged);
    }

    let mut settings = load(path)?;
    let mut changed = false;

    if let Some(pre_tool_use) = settings
        .get_mut("hooks")
        .and_then(|h| h.get_mut("PreToolUse"))
        .and_then(|v| v.as_array_mut())
    {
        for group in pre_tool_use.iter_mut() {
            if let Some(inner) = group.get_mut("hooks").and_then(|h| h.as_array_mut()) {
                let before = inner.len();
                inner.retain(|entry| {
                    entry.get("command").and_then(|c| c.as_str()) != Some(hook_command)
                });
                if inner.len() != before {
                    changed = true;
                }
            }
        }
        if changed {
            // Drop groups we just emptied; groups that were empty to begin
            // with belong to someone else and stay.
            pre_tool_use.retain(|group| {
                group
                    .get("hooks")
                    .and_then(|h| h.as_array())
                    .is_none_or(|inner| !inner.is_empty())
            });
        }
    }

    if !changed {
        return Ok(StepOutcome::Unchanged);
    }

    if let Err(e) = create_backup(path) {
        warn!("Could not create settings backup: {}", e);
    }
    store(path, &settings)?;
    Ok(StepOutcome::Changed)
}

/// Read-only registration check against the document at `path`.
///
/// Applies the same parsing and shape rules as [`patch`], so a dry run
/// using this predicts exactly what the real run would do: an absent file
/// reports unregistered, a malformed or wrong-shaped document errors.
pub fn registered_at(path: &Path, hook_command: &str) -> Result<bool, PatchError> {
    let settings = load(path)?;
    Ok(command_registered(&settings, hook_command))
}

/// Checks whether `hook_command` is registered under `PreToolUse`.
///
/// The comparison is exact string equality across every matcher group's
/// hook entries.
pub fn command_registered(settings: &Value, hook_command: &str) -> bool {
    if let Some(hooks) = settings.get("hooks")
        && let Some(pre_tool_use) = hooks.get("PreToolUse")
        && let Some(groups) = pre_tool_use.as_array()
    {
        for group in groups {
            if let Some(inner) = group.get("hooks").and_then(|h| h.as_array()) {
                for entry in inner {
                    if entry.get("command").and_then(|c| c.as_str()) == Some(hook_command) {
                        return true;
                    }
                }
            }
        }
    }
    false
}

fn load(path: &Path) -> Result<Value, PatchError> {
    let settings = if path.exists() {
        let content =
            std::fs::read_to_string(path).map_err(|e| PatchError::MalformedSettings {
                path: path.to_path_buf(),
                detail: format!("unreadable: {e}"),
            })?;
        serde_json::from_str(&content).map_err(|e| PatchError::MalformedSettings {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?
    } else {
        json!({})
    };

    validate_shape(&settings).map_err(|detail| PatchError::MalformedSettings {
        path: path.to_path_buf(),
        detail,
    })?;

    Ok(settings)
}

/// Rejects documents whose relevant substructure has the wrong shape.
///
/// Coercing a non-object `hooks` or non-array `PreToolUse` into shape would
/// discard whatever the user had there, so both abort instead.
fn validate_shape(settings: &Value) -> Result<(), String> {
    if !settings.is_object() {
        return Err("top level is not an object".to_string());
    }
    if let Some(hooks) = settings.get("hooks") {
        if !hooks.is_object() {
            return Err("'hooks' is not an object".to_string());
        }
        if let Some(pre_tool_use) = hooks.get("PreToolUse")
            && !pre_tool_use.is_array()
        {
            return Err("'hooks.PreToolUse' is not an array".to_string());
        }
    }
    Ok(())
}

fn append_matcher_group(
    settings: &mut Value,
    hook_command: &str,
    path: &Path,
) -> Result<(), PatchError> {
    let malformed = |detail: &str| PatchError::MalformedSettings {
        path: path.to_path_buf(),
        detail: detail.to_string(),
    };

    let group = json!({
        "matcher": PRE_TOOL_USE_MATCHER,
        "hooks": [
            {
                "type": "command",
                "command": hook_command
            }
        ]
    });

    let hooks = settings
        .as_object_mut()
        .ok_or_else(|| malformed("top level is not an object"))?
        .entry("hooks")
        .or_insert_with(|| json!({}));

    let pre_tool_use = hooks
        .as_object_mut()
        .ok_or_else(|| malformed("'hooks' is not an object"))?
        .entry("PreToolUse")
        .or_insert_with(|| json!([]));

    pre_tool_use
        .as_array_mut()
        .ok_or_else(|| malformed("'hooks.PreToolUse' is not an array"))?
        .push(group);

    Ok(())
}

fn store(path: &Path, settings: &Value) -> Result<(), PatchError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PatchError::WriteFailure {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let content = serde_json::to_string_pretty(settings).map_err(|e| PatchError::WriteFailure {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;

    atomic_write(path, content.as_bytes()).map_err(|e| PatchError::WriteFailure {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })
}
