//! Resolve command

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use gantry_core::{Overrides, Resolution, Resolver};

use crate::cli::{output, Cli, OutputFormat};

use super::load_project_config;

/// Resolve the build profile and signing identity
#[derive(Debug, Args)]
pub struct ResolveCommand {
    /// Release credentials file (overrides signing.properties_file)
    #[arg(long, env = "GANTRY_KEY_PROPERTIES")]
    pub key_properties: Option<PathBuf>,

    /// Directory relative storeFile values resolve against
    #[arg(long)]
    pub module_dir: Option<PathBuf>,

    /// Application id, e.g. com.example.app
    #[arg(long)]
    pub application_id: Option<String>,

    /// Version name
    #[arg(long, env = "GANTRY_VERSION_NAME")]
    pub version_name: Option<String>,

    /// Version code
    #[arg(long, env = "GANTRY_VERSION_CODE")]
    pub version_code: Option<u32>,

    /// Minimum SDK version
    #[arg(long)]
    pub min_sdk: Option<u32>,

    /// Target SDK version
    #[arg(long)]
    pub target_sdk: Option<u32>,

    /// Compile SDK version
    #[arg(long)]
    pub compile_sdk: Option<u32>,
}

impl ResolveCommand {
    /// Overrides given on the command line
    pub fn overrides(&self) -> Overrides {
        Overrides {
            application_id: self.application_id.clone(),
            version_code: self.version_code,
            version_name: self.version_name.clone(),
            min_sdk_version: self.min_sdk,
            target_sdk_version: self.target_sdk,
            compile_sdk_version: self.compile_sdk,
            ..Default::default()
        }
    }

    /// Build the resolver from config plus command-line overrides
    pub fn resolver(&self, cli: &Cli) -> anyhow::Result<Resolver> {
        let (mut config, config_path) = load_project_config(cli)?;
        info!(config = ?config_path, "building resolver");

        if let Some(path) = &self.key_properties {
            config.signing.properties_file = absolutize(path)?;
        }
        if let Some(dir) = &self.module_dir {
            config.signing.module_dir = Some(absolutize(dir)?);
        }

        let overrides = config.overrides().merge(self.overrides());
        Ok(Resolver::from_config(&config)?.with_overrides(overrides))
    }

    /// Execute the resolve command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing resolve command");
        let resolution = self.resolver(cli)?.resolve()?;

        match cli.format {
            OutputFormat::Json => println!("{}", resolution.report().to_json_pretty()?),
            OutputFormat::Text => {
                if !cli.quiet {
                    print_resolution(&resolution);
                }
            }
        }

        Ok(())
    }
}

fn print_resolution(resolution: &Resolution) {
    let profile = &resolution.profile;
    let identity = &resolution.identity;

    println!("{}", output::header("Build Profile"));
    println!("{}", output::key_value("Application ID", &profile.application_id));
    if profile.namespace != profile.application_id {
        println!("{}", output::key_value("Namespace", &profile.namespace));
    }
    println!(
        "{}",
        output::key_value(
            "Version",
            output::version(&profile.version_name, profile.version_code)
        )
    );
    println!(
        "{}",
        output::key_value(
            "SDK",
            format!(
                "min {} / target {} / compile {}",
                profile.min_sdk_version, profile.target_sdk_version, profile.compile_sdk_version
            )
        )
    );
    if let Some(ndk) = &profile.ndk_version {
        println!("{}", output::key_value("NDK", ndk));
    }
    println!("{}", output::key_value("Java target", &profile.java_target));
    println!("{}", output::key_value("Multidex", output::flag(profile.multidex_enabled)));
    println!("{}", output::key_value("Minify", output::flag(profile.minify_enabled)));
    println!(
        "{}",
        output::key_value("Shrink resources", output::flag(profile.shrink_resources_enabled))
    );
    if !profile.proguard_files.is_empty() {
        println!("{}", output::key_value("ProGuard", profile.proguard_files.join(", ")));
    }
    println!();

    println!("{}", output::header("Signing"));
    println!(
        "{}",
        output::key_value("Identity", output::identity_type(identity.identity_type()))
    );
    println!("{}", output::key_value("Key alias", identity.key_alias()));
    println!("{}", output::key_value("Keystore", output::path(identity.store_file())));

    if !identity.is_release() {
        println!();
        output::warning("No release credentials found; release builds use the development key");
    }
}

fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    Ok(std::env::current_dir()?.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn resolve(args: &[&str]) -> Resolution {
        let cli = Cli::try_parse_from(args).unwrap();
        match &cli.command {
            crate::cli::Commands::Resolve(cmd) => cmd.resolver(&cli).unwrap().resolve().unwrap(),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_overrides_beat_config() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("gantry.toml");
        std::fs::write(
            &config,
            "[application]\napplication_id = \"com.example.app\"\nversion_name = \"1.0.0\"\nversion_code = 1\n\n[signing]\ndebug_keystore = \"debug.keystore\"\n",
        )
        .unwrap();
        let config_arg = config.to_string_lossy().to_string();

        let resolution = resolve(&[
            "gantry",
            "--config",
            &config_arg,
            "resolve",
            "--version-name",
            "2.0.0",
        ]);

        assert_eq!(resolution.profile.application_id, "com.example.app");
        assert_eq!(resolution.profile.version_name, "2.0.0");
        assert_eq!(resolution.profile.version_code, 1);
        assert!(!resolution.identity.is_release());
        assert_eq!(resolution.identity.store_file(), temp.path().join("debug.keystore"));
    }

    #[test]
    fn test_key_properties_flag() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("gantry.toml");
        std::fs::write(&config, "[application]\napplication_id = \"com.example.app\"\n").unwrap();
        let props = temp.path().join("release.properties");
        std::fs::write(
            &props,
            "storePassword=a\nkeyPassword=b\nkeyAlias=upload\nstoreFile=/keys/upload.jks\n",
        )
        .unwrap();

        let config_arg = config.to_string_lossy().to_string();
        let props_arg = props.to_string_lossy().to_string();
        let resolution = resolve(&[
            "gantry",
            "--config",
            &config_arg,
            "resolve",
            "--key-properties",
            &props_arg,
        ]);

        assert!(resolution.identity.is_release());
        assert_eq!(resolution.identity.key_alias(), "upload");
    }
}
