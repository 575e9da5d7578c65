//! Terminal output for gantry commands

use std::fmt::Display;
use std::path::Path;

use console::style;
use gantry_signing::SigningIdentityType;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message to stderr
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Section header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Indented `key: value` line
pub fn key_value(key: &str, value: impl Display) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Indented error entry of a report
pub fn error_item(message: &str) -> String {
    format!("  {} {}", style("✗").red(), message)
}

/// Indented warning entry of a report
pub fn warning_item(message: &str) -> String {
    format!("  {} {}", style("!").yellow(), message)
}

pub fn path(path: &Path) -> String {
    style(path.display()).cyan().to_string()
}

/// `name (code)`, name highlighted
pub fn version(name: &str, code: u32) -> String {
    format!("{} ({})", style(name).green().bold(), code)
}

/// Release identities in green, the development fallback in yellow
pub fn identity_type(kind: SigningIdentityType) -> String {
    match kind {
        SigningIdentityType::Release => style(kind).green().bold().to_string(),
        SigningIdentityType::Development => style(kind).yellow().bold().to_string(),
    }
}

pub fn flag(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
