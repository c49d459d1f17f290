//! Command-line argument parsing
//!
//! Supports:
//! - Loading a dashboard markup file (or the built-in demo)
//! - Overriding the panel config path
//! - Replaying an event script against the bootstrapped page
//! - JSON or text state output

use clap::Parser;
use std::path::PathBuf;

/// Replay panel interactions against a dashboard page
#[derive(Parser, Debug)]
#[command(
    name = "panel-deck",
    version,
    about = "Replay panel interactions against a dashboard page"
)]
pub struct CliArgs {
    /// Dashboard markup (YAML element tree); defaults to the built-in demo
    #[arg(short = 'm', long, value_name = "FILE")]
    pub markup: Option<PathBuf>,

    /// Panel config file (default: ~/.config/panel-deck/panels.yaml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Event script to replay after bootstrap
    #[arg(short = 's', long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Print the final state as JSON
    #[arg(long)]
    pub json: bool,
}

/// How the final state is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Markup file; `None` means the built-in demo page
    pub markup: Option<PathBuf>,
    /// Explicit config file; `None` means the user config location
    pub config_path: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub output: OutputFormat,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        for (label, path) in [
            ("Markup", &self.markup),
            ("Config", &self.config),
            ("Script", &self.script),
        ] {
            if let Some(path) = path {
                if !path.is_file() {
                    return Err(format!("{} file not found: {}", label, path.display()));
                }
            }
        }

        Ok(StartupConfig {
            markup: self.markup,
            config_path: self.config,
            script: self.script,
            output: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        })
    }
}
