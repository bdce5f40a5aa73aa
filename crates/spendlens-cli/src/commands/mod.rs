//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use spendlens_core::SpendlensConfig;

/// `<config dir>/spendlens/config.json`, used when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spendlens")
        .join("config.json")
}

/// Load the config given on the command line, else the default file if it
/// exists, else the built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SpendlensConfig> {
    let config = match config_path {
        Some(path) => SpendlensConfig::from_file(Path::new(path))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Using config file {}", path.display());
                SpendlensConfig::from_file(&path)?
            } else {
                SpendlensConfig::default()
            }
        }
    };

    let issues = config.validate();
    if !issues.is_empty() {
        anyhow::bail!("Invalid configuration:\n  - {}", issues.join("\n  - "));
    }

    Ok(config)
}
