//! Validate command

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use gantry_core::Resolver;
use gantry_signing::inspect_keystore;

use crate::cli::{output, Cli, OutputFormat};
use crate::exit_codes::ValidationFailed;

use super::load_project_config;

/// Validate configuration and signing inputs
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Only validate the configuration file
    #[arg(long)]
    pub config_only: bool,

    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Outcome of all checks
#[derive(Debug, Default, Serialize)]
struct ValidationReport {
    valid: bool,
    config_path: Option<PathBuf>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            config_only = self.config_only,
            strict = self.strict,
            "executing validate command"
        );
        let report = self.run_checks(cli);

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => {
                if !cli.quiet {
                    print_report(&report);
                }
            }
        }

        if !report.valid {
            return Err(ValidationFailed {
                errors: report.errors.len(),
            }
            .into());
        }

        Ok(())
    }

    fn run_checks(&self, cli: &Cli) -> ValidationReport {
        let mut report = ValidationReport::default();

        let config = match load_project_config(cli) {
            Ok((config, path)) => {
                if path.is_none() {
                    report
                        .warnings
                        .push("No gantry.toml found, using defaults".to_string());
                }
                report.config_path = path;
                Some(config)
            }
            Err(e) => {
                report.errors.push(format!("Configuration: {:#}", e));
                None
            }
        };

        if let Some(config) = config.filter(|_| !self.config_only) {
            match Resolver::from_config(&config) {
                Ok(resolver) => check_resolver(&resolver, &mut report),
                Err(e) => report.errors.push(format!("Toolchain defaults: {}", e)),
            }
        }

        if self.strict {
            let mut warnings = std::mem::take(&mut report.warnings);
            report.errors.append(&mut warnings);
        }

        report.valid = report.errors.is_empty();
        report
    }
}

fn check_resolver(resolver: &Resolver, report: &mut ValidationReport) {
    match resolver.load_credentials() {
        Ok(Some(credentials)) => {
            if let Err(e) = inspect_keystore(credentials.store_file()) {
                report.errors.push(format!("Release keystore: {}", e));
            }
        }
        Ok(None) => report.warnings.push(format!(
            "{} not found, release builds use the development key",
            resolver.properties_file().display()
        )),
        Err(e) => report.errors.push(format!("Release credentials: {}", e)),
    }

    if let Err(e) = resolver.assemble_profile() {
        report.errors.push(format!("Build profile: {}", e));
    }
}

fn print_report(report: &ValidationReport) {
    println!("{}", output::header("Validation Results"));
    println!();

    if let Some(path) = &report.config_path {
        println!("Config: {}", output::path(path));
        println!();
    }

    if !report.errors.is_empty() {
        println!("{}", style("Errors:").red().bold());
        for error in &report.errors {
            println!("{}", output::error_item(error));
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("{}", style("Warnings:").yellow().bold());
        for warning in &report.warnings {
            println!("{}", output::warning_item(warning));
        }
        println!();
    }

    if report.valid {
        if report.warnings.is_empty() {
            println!("{}", style("✓ All checks passed").green().bold());
        } else {
            println!(
                "{} with {} warning(s)",
                style("✓ Validation passed").green().bold(),
                report.warnings.len()
            );
        }
    } else {
        println!(
            "{} with {} error(s)",
            style("✗ Validation failed").red().bold(),
            report.errors.len()
        );
    }
}
