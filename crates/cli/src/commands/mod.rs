// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod create;
pub mod init;
pub mod push;
pub mod show;
pub mod status;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use vk_core::{Archive, Credentials};

use crate::config::{config_path, Config};
use crate::env;
use crate::error::{Error, Result};
use crate::sync::{ArchiveSyncSession, RemoteClient, RemoteSyncClient};

/// Loads the config and builds a client for the configured server.
pub(crate) fn open_remote() -> Result<(Config, Arc<RemoteClient>)> {
    let config = Config::load(&config_path()?)?;
    let client = Arc::new(RemoteClient::new(config.sync_config()));
    Ok((config, client))
}

/// Master credentials from `VK_MASTER_PASSWORD`.
pub(crate) fn master_credentials() -> Result<Credentials> {
    env::master_password()
        .map(Credentials::from_password)
        .ok_or(Error::MissingMasterPassword(env::vars::VK_MASTER_PASSWORD))
}

/// Resolves a descriptor argument: inline JSON, or `@path` to a file.
pub(crate) fn read_descriptor(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .map(|s| s.trim().to_string())
            .map_err(|source| Error::ReadFile {
                path: path.to_string(),
                source,
            }),
        None => Ok(arg.to_string()),
    }
}

/// Reads an archive JSON file.
pub(crate) fn read_archive(path: &Path) -> Result<Archive> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::InvalidArchive {
        path: display,
        source,
    })
}

/// Opens the session named by a descriptor argument.
pub(crate) fn open_session<C: RemoteSyncClient>(
    client: Arc<C>,
    descriptor_arg: &str,
) -> Result<ArchiveSyncSession<C>> {
    let descriptor = read_descriptor(descriptor_arg)?;
    Ok(ArchiveSyncSession::from_descriptor_str(client, &descriptor)?)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
