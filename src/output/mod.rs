//! Styled messages for the wmxdgmenu CLI.
//!
//! Everything here writes to stderr so stdout carries nothing but the
//! property list:
//! - Bold red for the `Error:` prefix
//! - Bold yellow for warnings

use colored::Colorize;

/// Prints a warning message in bold yellow.
pub fn warning(message: &str) {
    eprintln!("{}", message.yellow().bold());
}

/// Formats the `Error:` prefix used for fatal errors.
#[must_use]
pub fn error_prefix() -> String {
    "Error:".red().bold().to_string()
}
