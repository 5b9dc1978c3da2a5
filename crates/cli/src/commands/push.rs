// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use vk_core::{Archive, Credentials};

use super::{master_credentials, open_remote, open_session, read_archive};
use crate::error::Result;
use crate::sync::{ArchiveSyncSession, RemoteSyncClient, SaveOptions};

pub async fn run(descriptor: &str, content: PathBuf) -> Result<()> {
    let master = master_credentials()?;
    let archive = read_archive(&content)?;
    let (_, client) = open_remote()?;

    let mut session = open_session(client, descriptor)?;
    let update_id = push(&mut session, &archive, &master).await?;

    println!(
        "Pushed {} ({} entries) at {}",
        session.archive_id().unwrap_or_default(),
        archive.entry_count(),
        update_id
    );
    Ok(())
}

/// Replaces an existing archive's contents.
///
/// The archive is loaded first so the write is made against its current
/// update id.
pub(crate) async fn push<C: RemoteSyncClient>(
    session: &mut ArchiveSyncSession<C>,
    archive: &Archive,
    master: &Credentials,
) -> Result<String> {
    session.load(master).await?;
    session.save(archive, master, SaveOptions::default()).await?;
    Ok(session.update_id().unwrap_or_default().to_string())
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
