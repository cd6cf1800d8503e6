//! CLI command implementations.

pub mod install;
pub mod status;
pub mod uninstall;

use console::style;
use vrs_common::StepOutcome;

/// Prints one installer step result as a styled status line.
pub fn report_step(label: &str, outcome: &StepOutcome) {
    let glyph = match outcome {
        StepOutcome::Changed => style("+").green().bold(),
        StepOutcome::Unchanged => style("=").dim(),
        StepOutcome::WouldChange(_) => style("~").yellow(),
        StepOutcome::Skipped(_) => style("-").dim(),
    };
    println!("  {} {} ({})", glyph, label, outcome);
}
