//! Configuration management for the UNIPA CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use unipa::{SessionSnapshot, UnipaClient};

/// CLI configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Portal base address.
    pub base_url: Option<String>,
    /// Persisted session identity. Never contains a password.
    pub session: Option<SessionSnapshot>,
}

/// Get the configuration file path.
pub fn config_path() -> Result<PathBuf> {
    let exe_path = env::current_exe().context("Could not determine executable path")?;
    let exe_dir = exe_path
        .parent()
        .context("Could not determine executable directory")?;

    Ok(exe_dir.join("unipa.toml"))
}

/// Load configuration from file.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).context("Failed to read config file")?;

    toml::from_str(&content).context("Failed to parse config file")
}

/// Save configuration to file.
pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content).context("Failed to write config file")?;

    Ok(())
}

/// Build a client from the current configuration, seeding the persisted
/// session when one exists.
pub fn build_client() -> Result<UnipaClient> {
    let config = load_config()?;
    build_client_for(&config)
}

/// Build a client for an already-loaded configuration.
pub fn build_client_for(config: &Config) -> Result<UnipaClient> {
    let base_url = config
        .base_url
        .clone()
        .context("Portal address not configured. Run 'unipa auth login --base-url <url>' first.")?;

    let mut builder = UnipaClient::builder().base_url(base_url);

    if let Some(session) = config.session.clone() {
        builder = builder.session(session);
    }

    builder.build().context("Failed to build UNIPA client")
}

/// Build a client that requires a persisted session.
pub fn build_authed_client() -> Result<UnipaClient> {
    let config = load_config()?;

    config
        .session
        .as_ref()
        .context("Not logged in. Run 'unipa auth login' first.")?;

    build_client_for(&config)
}
