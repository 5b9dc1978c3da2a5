// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User configuration management.
//!
//! Configuration is stored in `<config dir>/vaultkeep/config.toml`, or at
//! the path named by `VK_CONFIG`, and includes:
//! - `token`: The account access token sent with every request
//! - `[remote]`: Where the archive server lives and how long to wait for it

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::env;
use crate::error::{Error, Result};
use crate::sync::SyncConfig;

const CONFIG_DIR_NAME: &str = "vaultkeep";
const CONFIG_FILE_NAME: &str = "config.toml";

/// User configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Account access token.
    pub token: String,
    pub remote: RemoteConfig,
}

/// Archive server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL: `ws://...` or `wss://...`.
    pub url: String,
    /// Max time to wait for the connection in seconds (default: 10).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Max time to wait for a single response in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        RemoteConfig {
            url: url.into(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Validates that the URL is a WebSocket URL.
    ///
    /// Returns an error message if the URL is invalid.
    pub fn validate_url(&self) -> Option<String> {
        let url = &self.url;
        for scheme in ["ws://", "wss://"] {
            if let Some(rest) = url.strip_prefix(scheme) {
                if rest.is_empty() {
                    return Some(format!("{} URL requires a host", scheme));
                }
                return None;
            }
        }
        Some(format!(
            "unsupported remote URL '{}': expected ws://... or wss://...",
            url
        ))
    }
}

impl Config {
    /// Creates a configuration, validating the token and URL.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::FieldEmpty { field: "token" });
        }
        let remote = RemoteConfig::new(url);
        if let Some(reason) = remote.validate_url() {
            return Err(Error::Config(reason));
        }
        Ok(Config { token, remote })
    }

    /// Loads the configuration at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotInitialized);
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        if let Some(reason) = config.remote.validate_url() {
            return Err(Error::Config(reason));
        }
        Ok(config)
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Settings for the remote client.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            url: self.remote.url.clone(),
            connect_timeout_secs: self.remote.connect_timeout_secs,
            request_timeout_secs: self.remote.request_timeout_secs,
        }
    }
}

/// Location of the config file: `$VK_CONFIG`, else the platform config dir.
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = env::config_path() {
        return Ok(path);
    }
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(Error::NoConfigDir(env::vars::VK_CONFIG))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
