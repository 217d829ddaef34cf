use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, TokenStore};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    pub server_url: Option<String>,
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("FINANCE_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("finance").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_cli_config() -> anyhow::Result<CliConfig> {
    let config_file = get_config_dir()?.join("config.json");

    if !config_file.exists() {
        return Ok(CliConfig::default());
    }

    let content = fs::read_to_string(config_file)?;
    let config: CliConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_cli_config(config: &CliConfig) -> anyhow::Result<()> {
    let config_file = get_config_dir()?.join("config.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(config_file, content)?;
    Ok(())
}

/// `--server` flag, then `FINANCE_API_URL`, then the saved config, then localhost
pub fn resolve_server_url(flag: Option<&str>) -> anyhow::Result<String> {
    if let Some(url) = flag {
        return Ok(url.to_string());
    }
    if let Ok(url) = std::env::var("FINANCE_API_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    Ok(load_cli_config()?
        .server_url
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()))
}

/// Client for the resolved server, sharing the token store in the config dir
pub fn api_client(server: Option<&str>) -> anyhow::Result<ApiClient> {
    let base_url = resolve_server_url(server)?;
    let store = TokenStore::new(get_config_dir()?);
    Ok(ApiClient::new(&base_url, store)?)
}
