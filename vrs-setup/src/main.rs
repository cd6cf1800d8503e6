//! `vrs-setup` - installer CLI for the VibesRails guardrails scanner.

use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vrs_common::{PatchError, SetupError};

mod commands;
mod pkg;
mod precommit;

#[derive(Parser)]
#[command(
    name = "vrs-setup",
    version,
    about = "Set up the VibesRails guardrails scanner for a project",
    long_about = "Installs the vibesrails scanner package, copies project \
configuration files, writes a git pre-commit hook, and registers the Claude \
Code PreToolUse hook. Every step is idempotent; re-run after fixing any \
reported problem."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install vibesrails into a project
    Install {
        /// Project directory (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
        /// Report what would change without touching anything
        #[arg(long)]
        dry_run: bool,
        /// Overwrite existing project files (a backup is kept)
        #[arg(long)]
        force: bool,
        /// Skip package installation and scanner setup (files and hooks only)
        #[arg(long)]
        skip_package: bool,
    },
    /// Remove the hooks vrs-setup registered
    Uninstall {
        /// Project directory (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
        /// Report what would change without touching anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Show what is installed and what is missing
    Status {
        /// Project directory (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vrs_setup=info,vrs_common=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_project(project: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let dir = match project {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    anyhow::ensure!(dir.is_dir(), "project directory {} does not exist", dir.display());
    Ok(dir)
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Install {
            project,
            dry_run,
            force,
            skip_package,
        } => resolve_project(project).and_then(|project| {
            commands::install::run(&commands::install::InstallOptions {
                project,
                dry_run,
                force,
                skip_package,
            })
        }),
        Commands::Uninstall { project, dry_run } => resolve_project(project)
            .and_then(|project| commands::uninstall::run(&project, dry_run)),
        Commands::Status { project } => {
            resolve_project(project).and_then(|project| commands::status::run(&project))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Prints the error with its catalog code and remediation when it has one.
fn report_error(err: &anyhow::Error) {
    let (code, remediation) = if let Some(e) = err.downcast_ref::<SetupError>() {
        (Some(e.code()), Some(e.remediation()))
    } else if let Some(e) = err.downcast_ref::<PatchError>() {
        (Some(e.code()), Some(e.remediation()))
    } else {
        (None, None)
    };

    match code {
        Some(code) => eprintln!("{} [{}] {:#}", style("error:").red().bold(), code, err),
        None => eprintln!("{} {:#}", style("error:").red().bold(), err),
    }
    if let Some(remediation) = remediation {
        eprintln!("  {}", style(remediation).dim());
    }
}
