use crate::api::DEFAULT_API_URL;
use crate::refresh::REFRESH_INTERVAL;
use alloy::primitives::Address;
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use shared::web3::balance::{DEFAULT_RPC_URL, DEFAULT_TOKEN_ADDRESS};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const CONFIG_FILENAME: &str = "config.toml";

pub const API_URL_ENV: &str = "NODE_MONITOR_API_URL";
pub const RPC_URL_ENV: &str = "NODE_MONITOR_RPC_URL";
pub const TOKEN_ADDRESS_ENV: &str = "NODE_MONITOR_TOKEN_ADDRESS";

fn get_default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "netrumlabs", "node-monitor")
        .map(|proj_dirs| proj_dirs.config_dir().join(CONFIG_FILENAME))
}

/// File-backed settings. Every field is optional; unset fields take the
/// built-in defaults when resolved.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub api_url: Option<String>,
    pub rpc_url: Option<String>,
    pub token_address: Option<String>,
    pub refresh_interval_secs: Option<u64>,
    /// Set to false to skip the external balance RPC entirely.
    pub balance_lookup: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: Url,
    pub rpc_url: Url,
    pub token_address: Address,
    pub refresh_interval: Duration,
    pub balance_lookup: bool,
}

impl Config {
    /// File (explicit path or the platform config dir), then environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => match get_default_config_path() {
                Some(path) => Self::load_from_file(&path)?,
                None => Self::default(),
            },
        };
        config.load_from_env();
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(api_url) = var(API_URL_ENV) {
            self.api_url = Some(api_url);
        }
        if let Some(rpc_url) = var(RPC_URL_ENV) {
            self.rpc_url = Some(rpc_url);
        }
        if let Some(token_address) = var(TOKEN_ADDRESS_ENV) {
            self.token_address = Some(token_address);
        }
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if api_url.is_some() {
            self.api_url = api_url;
        }
        self
    }

    pub fn with_rpc_url(mut self, rpc_url: Option<String>) -> Self {
        if rpc_url.is_some() {
            self.rpc_url = rpc_url;
        }
        self
    }

    pub fn with_refresh_interval(mut self, secs: Option<u64>) -> Self {
        if secs.is_some() {
            self.refresh_interval_secs = secs;
        }
        self
    }

    pub fn with_balance_lookup(mut self, enabled: Option<bool>) -> Self {
        if enabled.is_some() {
            self.balance_lookup = enabled;
        }
        self
    }

    pub fn resolve(&self) -> Result<Settings> {
        let api_url = parse_url(self.api_url.as_deref().unwrap_or(DEFAULT_API_URL), "API")?;
        let rpc_url = parse_url(self.rpc_url.as_deref().unwrap_or(DEFAULT_RPC_URL), "RPC")?;

        let token_address = match self.token_address.as_deref() {
            Some(address) => Address::from_str(address.trim())
                .with_context(|| format!("Invalid token address: {address}"))?,
            None => DEFAULT_TOKEN_ADDRESS,
        };

        let refresh_interval = match self.refresh_interval_secs {
            Some(0) => bail!("Refresh interval must be at least one second"),
            Some(secs) => Duration::from_secs(secs),
            None => REFRESH_INTERVAL,
        };

        Ok(Settings {
            api_url,
            rpc_url,
            token_address,
            refresh_interval,
            balance_lookup: self.balance_lookup.unwrap_or(true),
        })
    }
}

fn parse_url(raw: &str, name: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Invalid {name} URL: {raw}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("{name} URL must use http or https: {raw}");
    }
    Ok(url)
}
