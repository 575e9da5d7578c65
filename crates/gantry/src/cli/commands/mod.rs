//! CLI commands

mod completions;
mod init;
mod resolve;
mod signing;
mod validate;

pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use resolve::ResolveCommand;
pub use signing::SigningCommand;
pub use validate::ValidateCommand;

use std::path::PathBuf;

use gantry_core::config::{load_config, load_config_or_default, Config};

use crate::cli::Cli;

/// Load the project configuration: `--config` if given, otherwise the first
/// config file found from the working directory upwards, otherwise defaults.
fn load_project_config(cli: &Cli) -> anyhow::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = &cli.config {
        let config = load_config(path)?;
        return Ok((config, Some(path.clone())));
    }

    let cwd = std::env::current_dir()?;
    Ok(load_config_or_default(&cwd)?)
}
