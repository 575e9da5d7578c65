//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{CompletionsCommand, InitCommand, ResolveCommand, SigningCommand, ValidateCommand};

/// Gantry - Android build configuration resolver
#[derive(Debug, Parser)]
#[command(name = "gantry")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (default: search for gantry.toml upwards)
    #[arg(short, long, global = true, env = "GANTRY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve the build profile and signing identity
    Resolve(ResolveCommand),

    /// Signing credential operations
    Signing(SigningCommand),

    /// Validate configuration and signing inputs
    Validate(ValidateCommand),

    /// Create a gantry.toml
    Init(InitCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Resolve(ref cmd) => cmd.execute(&self),
            Commands::Signing(ref cmd) => cmd.execute(&self),
            Commands::Validate(ref cmd) => cmd.execute(&self),
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve_overrides() {
        let cli = Cli::try_parse_from([
            "gantry",
            "--format",
            "json",
            "resolve",
            "--application-id",
            "com.example.app",
            "--version-code",
            "42",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Resolve(cmd) => {
                let overrides = cmd.overrides();
                assert_eq!(overrides.application_id.as_deref(), Some("com.example.app"));
                assert_eq!(overrides.version_code, Some(42));
                assert_eq!(overrides.version_name, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gantry", "validate", "--quiet", "-C", "/tmp"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.directory, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_signing_init_requires_store_file() {
        assert!(Cli::try_parse_from(["gantry", "signing", "init", "--key-alias", "upload"]).is_err());
        assert!(Cli::try_parse_from([
            "gantry",
            "signing",
            "init",
            "--store-file",
            "upload.jks",
            "--key-alias",
            "upload"
        ])
        .is_ok());
    }

    #[test]
    fn test_rejects_non_numeric_version_code() {
        assert!(Cli::try_parse_from(["gantry", "resolve", "--version-code", "abc"]).is_err());
    }
}
