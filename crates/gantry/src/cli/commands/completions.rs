//! Shell completions command

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::{output, Cli};

/// Generate shell completions
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Write the completion script for `shell` to `out`
fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(shell = %self.shell, output = ?self.output, "executing completions command");

        let Some(path) = &self.output else {
            write_completions(self.shell, &mut std::io::stdout());
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        write_completions(self.shell, &mut file);

        if !cli.quiet {
            output::success(&format!(
                "{} completions written to {}",
                self.shell,
                output::path(path)
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_bash_covers_signing_subcommands() {
        let bash = script(Shell::Bash);
        assert!(bash.contains("gantry"));
        for word in ["resolve", "signing", "show", "check", "--key-properties", "--store-file"] {
            assert!(bash.contains(word), "bash completions should mention {}", word);
        }
    }

    #[test]
    fn test_zsh_function_named_after_binary() {
        assert!(script(Shell::Zsh).contains("_gantry"));
    }

    #[test]
    fn test_writes_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("completions").join("gantry.fish");
        let arg = path.to_string_lossy().to_string();

        let cli = Cli::try_parse_from(["gantry", "--quiet", "completions", "fish", "--output", arg.as_str()])
            .unwrap();
        match &cli.command {
            crate::cli::Commands::Completions(cmd) => cmd.execute(&cli).unwrap(),
            other => panic!("unexpected command {:?}", other),
        }

        let fish = std::fs::read_to_string(&path).unwrap();
        assert!(fish.contains("complete -c gantry"));
    }
}
