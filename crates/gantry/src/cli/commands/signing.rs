//! Signing command

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use dialoguer::Password;
use secrecy::SecretString;
use tracing::info;

use gantry_core::Resolver;
use gantry_signing::{inspect_keystore, KeyPropertiesWriter, SigningIdentity};

use crate::cli::{output, Cli, OutputFormat};

use super::load_project_config;

/// Release signing commands
#[derive(Debug, Args)]
pub struct SigningCommand {
    #[command(subcommand)]
    pub command: SigningSubcommand,
}

/// Signing subcommands
#[derive(Debug, Subcommand)]
pub enum SigningSubcommand {
    /// Show the identity a release build would be signed with
    Show,

    /// Check the release credentials and the keystore they point at
    Check,

    /// Write a key.properties file
    Init(InitKeyPropertiesCommand),
}

/// Write a key.properties file
#[derive(Debug, Args)]
pub struct InitKeyPropertiesCommand {
    /// Keystore path written as storeFile
    #[arg(long)]
    pub store_file: PathBuf,

    /// Key alias inside the keystore
    #[arg(long)]
    pub key_alias: String,

    /// Output path (default: signing.properties_file from config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,

    /// Keystore password (prompted for when unset)
    #[arg(long, env = "GANTRY_STORE_PASSWORD", hide_env_values = true)]
    pub store_password: Option<String>,

    /// Key password (prompted for when unset)
    #[arg(long, env = "GANTRY_KEY_PASSWORD", hide_env_values = true)]
    pub key_password: Option<String>,
}

impl SigningCommand {
    /// Execute the signing command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let subcommand_name = match &self.command {
            SigningSubcommand::Show => "show",
            SigningSubcommand::Check => "check",
            SigningSubcommand::Init(_) => "init",
        };
        info!(subcommand = subcommand_name, "executing signing command");

        match &self.command {
            SigningSubcommand::Show => show(cli),
            SigningSubcommand::Check => check(cli),
            SigningSubcommand::Init(cmd) => cmd.execute(cli),
        }
    }
}

fn resolver(cli: &Cli) -> anyhow::Result<Resolver> {
    let (config, _) = load_project_config(cli)?;
    Ok(Resolver::from_config(&config)?)
}

fn show(cli: &Cli) -> anyhow::Result<()> {
    let identity = resolver(cli)?.select_identity()?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&identity.summary())?),
        OutputFormat::Text => {
            if !cli.quiet {
                print_identity(&identity);
            }
        }
    }
    Ok(())
}

fn print_identity(identity: &SigningIdentity) {
    println!("{}", output::header("Signing Identity"));
    println!(
        "{}",
        output::key_value("Type", output::identity_type(identity.identity_type()))
    );
    println!("{}", output::key_value("Key alias", identity.key_alias()));
    println!("{}", output::key_value("Keystore", output::path(identity.store_file())));
}

fn check(cli: &Cli) -> anyhow::Result<()> {
    let resolver = resolver(cli)?;
    let properties_file = resolver.properties_file().to_path_buf();

    let Some(credentials) = resolver.load_credentials()? else {
        info!(path = %properties_file.display(), "no release credentials");
        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "properties_file": properties_file,
                    "release": false,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    output::warning(&format!(
                        "{} not found; release builds fall back to the development key",
                        properties_file.display()
                    ));
                }
            }
        }
        return Ok(());
    };

    let keystore = inspect_keystore(credentials.store_file())?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "properties_file": properties_file,
                "release": true,
                "key_alias": credentials.key_alias(),
                "keystore": keystore,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(&format!(
                    "Release credentials loaded from {}",
                    output::path(&properties_file)
                ));
                println!("{}", output::key_value("Key alias", credentials.key_alias()));
                println!("{}", output::key_value("Keystore", output::path(&keystore.path)));
                println!("{}", output::key_value("Format", keystore.format));
                println!("{}", output::key_value("Size", format!("{} bytes", keystore.size)));
                println!(
                    "{}",
                    output::key_value("SHA-256", style(&keystore.fingerprint).dim())
                );
            }
        }
    }
    Ok(())
}

impl InitKeyPropertiesCommand {
    fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let path = match &self.output {
            Some(path) => path.clone(),
            None => load_project_config(cli)?.0.signing.properties_file,
        };
        info!(path = %path.display(), key_alias = %self.key_alias, force = self.force, "writing key.properties");

        let store_password = secret_or_prompt(self.store_password.as_deref(), "Keystore password")?;
        let key_password = secret_or_prompt(self.key_password.as_deref(), "Key password")?;

        KeyPropertiesWriter::new(&self.store_file, &self.key_alias, store_password, key_password)
            .overwrite(self.force)
            .write(&path)?;

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "path": path,
                    "key_alias": self.key_alias,
                    "store_file": self.store_file,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    output::success(&format!("Wrote {}", output::path(&path)));
                    output::info("Keep this file out of version control");
                }
            }
        }
        Ok(())
    }
}

fn secret_or_prompt(value: Option<&str>, prompt: &str) -> anyhow::Result<SecretString> {
    let value = match value {
        Some(value) => value.to_string(),
        None => Password::new().with_prompt(prompt).interact()?,
    };
    if value.is_empty() {
        anyhow::bail!("{} must not be empty", prompt);
    }
    Ok(SecretString::from(value))
}
