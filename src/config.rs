use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gcal2org_core::properties::load_properties;
use gcal2org_core::ResolvedConfiguration;

const CONFIG_FILE_NAME: &str = ".gcal2org.properties";

/// Get the default config file path (~/.gcal2org.properties)
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(CONFIG_FILE_NAME))
}

/// Load and resolve the properties file, before anything is rendered.
pub fn load_config(path: &Path) -> Result<ResolvedConfiguration> {
    if !path.exists() {
        anyhow::bail!(
            "Configuration file {} does not exist.\n\n\
            Create it with at least one calendar:\n\n\
            title = Agenda\n\
            calendars.work.id = you@example.com\n",
            path.display()
        );
    }

    let entries = load_properties(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    ResolvedConfiguration::resolve(entries)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

/// Expand ~ in paths to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
