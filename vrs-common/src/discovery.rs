//! Discovery of the external vibesrails scanner.
//!
//! The scanner is an external, unversioned tool; this module expresses the
//! lookup as an ordered list of candidate invocations tried in sequence,
//! stopping at the first that is available. Nothing here knows what the
//! scanner does; it is invoked by name only.
//!
//! # Scanner CLI surface
//!
//! The command vocabulary the installer and generated hooks use. Behavior
//! is external and not specified here.
//!
//! | Flag        | Invoked by                         |
//! |-------------|------------------------------------|
//! | `--setup`   | `vrs-setup install` (post-install) |
//! | `--hook`    | generated pre-commit / ptuh hooks  |
//! | `--all`, `--show`, `--senior`, `--audit`, `--upgrade`, `--version` | the user |

use crate::errors::SetupError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the external scanner executable.
pub const SCANNER: &str = "vibesrails";

/// Scanner flag that runs first-time project setup.
pub const SETUP_FLAG: &str = "--setup";
/// Scanner flag that runs hook mode (scan staged/changed files). The
/// generated shell and python hooks spell this out themselves; the constant
/// exists so the embedded-asset tests pin them to the same vocabulary.
pub const HOOK_FLAG: &str = "--hook";

/// Where a scanner invocation was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationSource {
    /// Global install found on PATH.
    PathLookup,
    /// Executable inside a project-local virtual environment.
    ProjectVenv,
    /// `python3 -m vibesrails` module fallback.
    ModuleFallback,
}

impl std::fmt::Display for InvocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathLookup => write!(f, "PATH"),
            Self::ProjectVenv => write!(f, "project virtualenv"),
            Self::ModuleFallback => write!(f, "python3 -m {}", SCANNER),
        }
    }
}

/// A concrete way to run the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerInvocation {
    /// Program to execute.
    pub program: PathBuf,
    /// Arguments prepended before any scanner flags.
    pub leading_args: Vec<String>,
    /// Where this invocation came from.
    pub source: InvocationSource,
}

impl ScannerInvocation {
    /// Shell-ish rendering for logs and status output.
    pub fn render(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.leading_args.iter().cloned());
        parts.join(" ")
    }
}

/// The ordered candidate locations for a project, most specific install
/// method first: global binary, project virtualenvs, module fallback.
pub fn candidate_locations(project: &Path) -> Vec<(InvocationSource, String)> {
    let mut locations = vec![(InvocationSource::PathLookup, format!("{} on PATH", SCANNER))];
    for venv in ["venv", ".venv"] {
        locations.push((
            InvocationSource::ProjectVenv,
            project.join(venv).join(venv_bin_name()).display().to_string(),
        ));
    }
    locations.push((
        InvocationSource::ModuleFallback,
        format!("python3 -m {}", SCANNER),
    ));
    locations
}

/// Finds the first available scanner invocation for a project.
///
/// Returns `MissingDependency` naming every location tried when none is
/// available.
pub fn discover(project: &Path) -> Result<ScannerInvocation, SetupError> {
    if let Ok(program) = which::which(SCANNER) {
        debug!("Found {} on PATH: {}", SCANNER, program.display());
        return Ok(ScannerInvocation {
            program,
            leading_args: vec![],
            source: InvocationSource::PathLookup,
        });
    }

    for venv in ["venv", ".venv"] {
        let candidate = project.join(venv).join(venv_bin_name());
        if candidate.is_file() {
            debug!("Found {} in virtualenv: {}", SCANNER, candidate.display());
            return Ok(ScannerInvocation {
                program: candidate,
                leading_args: vec![],
                source: InvocationSource::ProjectVenv,
            });
        }
    }

    if let Ok(python) = which::which("python3") {
        debug!("Falling back to module invocation via {}", python.display());
        return Ok(ScannerInvocation {
            program: python,
            leading_args: vec!["-m".to_string(), SCANNER.to_string()],
            source: InvocationSource::ModuleFallback,
        });
    }

    let searched = candidate_locations(project)
        .into_iter()
        .map(|(_, loc)| loc)
        .collect::<Vec<_>>()
        .join(", ");
    Err(SetupError::MissingDependency {
        name: SCANNER.to_string(),
        searched,
    })
}

#[cfg(unix)]
fn venv_bin_name() -> PathBuf {
    PathBuf::from("bin").join(SCANNER)
}

#[cfg(not(unix))]
fn venv_bin_name() -> PathBuf {
    PathBuf::from("Scripts").join(format!("{}.exe", SCANNER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_candidate_order_is_global_then_venv_then_module() {
        let tmp = TempDir::new().unwrap();
        let locations = candidate_locations(tmp.path());

        assert_eq!(locations.len(), 4);
        assert_eq!(locations[0].0, InvocationSource::PathLookup);
        assert_eq!(locations[1].0, InvocationSource::ProjectVenv);
        assert_eq!(locations[2].0, InvocationSource::ProjectVenv);
        assert_eq!(locations[3].0, InvocationSource::ModuleFallback);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_prefers_project_venv_over_module_fallback() {
        // The test environment has no global vibesrails binary, so a
        // project venv executable must win over the python3 fallback.
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("venv").join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join(SCANNER), "#!/bin/sh\nexit 0\n").unwrap();

        let inv = discover(tmp.path()).unwrap();
        assert_eq!(inv.source, InvocationSource::ProjectVenv);
        assert!(inv.leading_args.is_empty());
        assert_eq!(inv.program, bin.join(SCANNER));
    }

    #[test]
    fn test_invocation_render() {
        let inv = ScannerInvocation {
            program: PathBuf::from("/usr/bin/python3"),
            leading_args: vec!["-m".to_string(), SCANNER.to_string()],
            source: InvocationSource::ModuleFallback,
        };
        assert_eq!(inv.render(), "/usr/bin/python3 -m vibesrails");
    }

    #[test]
    fn test_source_display() {
        assert_eq!(InvocationSource::PathLookup.to_string(), "PATH");
        assert_eq!(InvocationSource::ProjectVenv.to_string(), "project virtualenv");
        assert_eq!(
            InvocationSource::ModuleFallback.to_string(),
            "python3 -m vibesrails"
        );
    }
}
