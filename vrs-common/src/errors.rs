//! Error types for the VibesRails setup tool.
//!
//! Each error carries a unique `VRS-Exxx` code and remediation text. There
//! is no retry policy anywhere in this tool: installation is idempotent and
//! re-runnable, so the remediation for every failure is to fix the named
//! condition and run the installer again.
//!
//! # Error Codes
//!
//! | Code     | Error                | Meaning                                  |
//! |----------|----------------------|------------------------------------------|
//! | VRS-E001 | MalformedSettings    | Settings document unparseable/bad shape  |
//! | VRS-E002 | WriteFailure         | Settings document could not be written   |
//! | VRS-E010 | MissingDependency    | Required external tool not found         |
//! | VRS-E011 | CommandFailed        | External command exited non-zero         |

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the settings patcher.
///
/// Both variants abort without writing: a malformed document is never
/// overwritten (user data must not be silently discarded), and the write is
/// the last step of the operation, so a `WriteFailure` leaves the original
/// file untouched.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The settings file exists but is not a valid settings document.
    #[error("settings file {path} is not a valid settings document: {detail}")]
    MalformedSettings { path: PathBuf, detail: String },

    /// The settings file could not be written.
    #[error("failed to write settings file {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PatchError {
    pub fn code(&self) -> &'static str {
        match self {
            PatchError::MalformedSettings { .. } => "VRS-E001",
            PatchError::WriteFailure { .. } => "VRS-E002",
        }
    }

    pub fn remediation(&self) -> &'static str {
        match self {
            PatchError::MalformedSettings { .. } => {
                "Inspect the settings file, fix or remove the invalid content, then re-run the installer. The file has not been modified."
            }
            PatchError::WriteFailure { .. } => {
                "Check permissions and free space for the settings directory, then re-run the installer. The original file is untouched."
            }
        }
    }
}

/// Top-level errors for installer operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Settings patching failed.
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// A required external tool could not be located.
    #[error("required dependency '{name}' not found (tried: {searched})")]
    MissingDependency { name: String, searched: String },

    /// An external command ran but reported failure.
    #[error("command '{command}' failed with exit status {status}")]
    CommandFailed { command: String, status: String },
}

impl SetupError {
    pub fn code(&self) -> &'static str {
        match self {
            SetupError::Patch(e) => e.code(),
            SetupError::MissingDependency { .. } => "VRS-E010",
            SetupError::CommandFailed { .. } => "VRS-E011",
        }
    }

    pub fn remediation(&self) -> &'static str {
        match self {
            SetupError::Patch(e) => e.remediation(),
            SetupError::MissingDependency { .. } => {
                "Install the named dependency (or put it on PATH), then re-run the installer."
            }
            SetupError::CommandFailed { .. } => {
                "Inspect the command output above, fix the reported problem, then re-run the installer."
            }
        }
    }
}
