//! Installation of the vibesrails package through a Python package manager.
//!
//! Best-effort selection across the managers a developer machine plausibly
//! has, tried in order. There is deliberately no retry: installation is
//! re-runnable, so a transient failure is fixed by running again.

use std::path::Path;
use std::process::Command;
use tracing::{debug, info};
use vrs_common::SetupError;
use vrs_common::discovery::SCANNER;

/// One way to install the scanner package.
#[derive(Debug, Clone, Copy)]
pub struct PackageManager {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl PackageManager {
    pub fn render(&self) -> String {
        let mut parts = vec![self.program.to_string()];
        parts.extend(self.args.iter().map(|a| a.to_string()));
        parts.join(" ")
    }
}

/// Candidate managers in preference order.
pub const CANDIDATES: &[PackageManager] = &[
    PackageManager {
        program: "pip3",
        args: &["install", "--upgrade", SCANNER],
    },
    PackageManager {
        program: "python3",
        args: &["-m", "pip", "install", "--upgrade", SCANNER],
    },
    PackageManager {
        program: "pipx",
        args: &["install", SCANNER],
    },
];

/// Picks the first candidate whose program is on PATH.
pub fn select() -> Result<&'static PackageManager, SetupError> {
    for candidate in CANDIDATES {
        if which::which(candidate.program).is_ok() {
            debug!("Selected package manager: {}", candidate.program);
            return Ok(candidate);
        }
    }
    Err(SetupError::MissingDependency {
        name: "pip3 / python3 / pipx".to_string(),
        searched: "PATH".to_string(),
    })
}

/// Installs (or upgrades) the scanner package.
pub fn install_scanner(project: &Path) -> Result<(), SetupError> {
    let manager = select()?;
    info!("Installing {} via '{}'", SCANNER, manager.render());

    let status = Command::new(manager.program)
        .args(manager.args)
        .current_dir(project)
        .status()
        .map_err(|e| SetupError::CommandFailed {
            command: manager.render(),
            status: e.to_string(),
        })?;

    if !status.success() {
        return Err(SetupError::CommandFailed {
            command: manager.render(),
            status: status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "terminated by signal".to_string()),
        });
    }
    Ok(())
}
