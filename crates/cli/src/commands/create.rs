// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use vk_core::{Archive, Credentials};

use super::{master_credentials, open_remote, read_archive};
use crate::error::Result;
use crate::sync::{ArchiveSyncSession, Descriptor, RemoteSyncClient, SaveOptions};

pub async fn run(name: Option<String>, content: PathBuf) -> Result<()> {
    let master = master_credentials()?;
    let archive = read_archive(&content)?;
    let (config, client) = open_remote()?;

    let mut session = ArchiveSyncSession::new(client, config.token, None);
    let descriptor = create(&mut session, &archive, &master, name).await?;

    println!("{}", descriptor.to_json()?);
    Ok(())
}

/// Saves `archive` through a new session and returns its descriptor.
pub(crate) async fn create<C: RemoteSyncClient>(
    session: &mut ArchiveSyncSession<C>,
    archive: &Archive,
    master: &Credentials,
    name: Option<String>,
) -> Result<Descriptor> {
    session.save(archive, master, SaveOptions { name }).await?;
    Ok(session.to_descriptor())
}

#[cfg(test)]
#[path = "create_tests.rs"]
mod tests;
