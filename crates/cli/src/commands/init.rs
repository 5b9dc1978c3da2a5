// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::config::{config_path, Config};
use crate::error::{Error, Result};

pub fn run(url: String, token: String, force: bool) -> Result<()> {
    let path = config_path()?;
    let config = init_config(&path, url, token, force)?;
    println!("Initialized vaultkeep config at {}", path.display());
    println!("Remote: {}", config.remote.url);
    Ok(())
}

/// Validates and writes a new config file at `path`.
pub(crate) fn init_config(path: &Path, url: String, token: String, force: bool) -> Result<Config> {
    if path.exists() && !force {
        return Err(Error::AlreadyInitialized(path.display().to_string()));
    }
    let config = Config::new(url, token)?;
    config.save(path)?;
    Ok(config)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
