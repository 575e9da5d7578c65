//! Init command

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use dialoguer::{Confirm, Select};
use tracing::info;

use gantry_core::config::defaults::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_YAML};
use gantry_core::config::Config;

use crate::cli::{output, Cli};

/// Create a gantry configuration file
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Use defaults without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output file path (.toml or .yaml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            Self::Toml => DEFAULT_CONFIG_TOML,
            Self::Yaml => DEFAULT_CONFIG_YAML,
        }
    }

    /// Template rendered in this format
    fn render(self) -> anyhow::Result<String> {
        match self {
            Self::Toml => Ok(DEFAULT_CONFIG_TEMPLATE.to_string()),
            Self::Yaml => {
                let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
                Ok(serde_yaml::to_string(&config)?)
            }
        }
    }
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, yes = self.yes, "executing init command");
        let cwd = std::env::current_dir()?;

        let format = match self.output.as_deref().and_then(ConfigFormat::from_path) {
            Some(format) => format,
            None if self.yes => ConfigFormat::Toml,
            None => {
                let formats = ["toml", "yaml"];
                let selection = Select::new()
                    .with_prompt("Configuration format")
                    .items(&formats)
                    .default(0)
                    .interact()?;
                if selection == 0 {
                    ConfigFormat::Toml
                } else {
                    ConfigFormat::Yaml
                }
            }
        };
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(format.file_name()));

        if config_path.exists() && !self.force {
            if self.yes {
                anyhow::bail!(
                    "Configuration file already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
            }

            let overwrite = Confirm::new()
                .with_prompt(format!(
                    "Configuration file already exists at {}. Overwrite?",
                    config_path.display()
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                output::warning("Aborted.");
                return Ok(());
            }
        }

        std::fs::write(&config_path, format.render()?)?;
        info!(path = %config_path.display(), "wrote configuration");

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                output::path(&config_path)
            ));
            println!();
            println!("Next steps:");
            println!("  1. Set application.application_id in {}", config_path.display());
            println!("  2. Run {} to create key.properties", style("gantry signing init").cyan());
            println!("  3. Run {} to verify your setup", style("gantry validate").cyan());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use gantry_core::config::load_config;
    use tempfile::TempDir;

    fn run(args: &[&str]) -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(args).unwrap();
        match &cli.command {
            crate::cli::Commands::Init(cmd) => cmd.execute(&cli),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("gantry.toml")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("gantry.yml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("gantry")), None);
    }

    #[test]
    fn test_yaml_template_matches_toml() {
        let from_toml: Config = toml::from_str(&ConfigFormat::Toml.render().unwrap()).unwrap();
        let from_yaml: Config = serde_yaml::from_str(&ConfigFormat::Yaml.render().unwrap()).unwrap();
        assert_eq!(from_toml, from_yaml);
    }

    #[test]
    fn test_writes_loadable_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gantry.yaml");
        let arg = path.to_string_lossy().to_string();

        run(&["gantry", "--quiet", "init", "--yes", "--output", &arg]).unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.application.application_id.is_none());
        assert_eq!(config.signing.properties_file, temp.path().join("key.properties"));
    }

    #[test]
    fn test_existing_file_needs_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gantry.toml");
        std::fs::write(&path, "# mine\n").unwrap();
        let arg = path.to_string_lossy().to_string();

        assert!(run(&["gantry", "--quiet", "init", "--yes", "--output", &arg]).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        run(&["gantry", "--quiet", "init", "--yes", "--force", "--output", &arg]).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[signing]"));
    }
}
