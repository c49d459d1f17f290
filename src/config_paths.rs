//! Where panel-deck keeps its files
//!
//! `panels.yaml` holds the panel declarations read at startup; `logs/`
//! receives the daily rolling log written by [`crate::tracing::init`].

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

const APP_DIR: &str = "panel-deck";

/// Directory holding `panels.yaml` and `logs/`
///
/// `$XDG_CONFIG_HOME/panel-deck` when set, else `~/.config/panel-deck`;
/// `%APPDATA%\panel-deck` on Windows.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// Panel declarations loaded by [`crate::config::PanelsConfig::load`]
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("panels.yaml"))
}

/// Target of the rolling file log
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn create_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))
}

/// Create the log directory if needed; called before the file appender starts
pub fn ensure_logs_dir() -> anyhow::Result<PathBuf> {
    let logs = logs_dir().ok_or_else(|| anyhow::anyhow!("No home directory to place logs in"))?;
    create_dir(&logs)?;
    Ok(logs)
}
