// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Load and save of a single remote archive.
//!
//! A session is identified by `{token, archive_id}`; an archive id of `None`
//! means the archive has not been created yet and the next save creates it.
//! Each session also tracks the archive's current update id and the
//! account's root archive id, both refreshed by every load and save.
//!
//! Saves on one session must not run concurrently. The `&mut self`
//! receivers enforce that.

use std::sync::Arc;

use tracing::{debug, info};

use vk_core::{generate_update_id, Archive, ArchiveCodec, Credentials};

use super::bootstrap::CredentialBootstrap;
use super::error::{SyncError, SyncResult};
use super::remote::{RemoteSyncClient, WriteRequest};

/// Per-save options.
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Display name stored alongside the archive.
    pub name: Option<String>,
}

/// Load/save orchestration for one remote archive.
pub struct ArchiveSyncSession<C> {
    client: Arc<C>,
    bootstrap: CredentialBootstrap<C>,
    codec: ArchiveCodec,
    token: String,
    archive_id: Option<String>,
    update_id: Option<String>,
    root_archive_id: Option<String>,
}

impl<C: RemoteSyncClient> ArchiveSyncSession<C> {
    /// Creates a session for an existing archive, or for a new one when
    /// `archive_id` is `None` or empty.
    pub fn new(client: Arc<C>, token: impl Into<String>, archive_id: Option<String>) -> Self {
        ArchiveSyncSession {
            bootstrap: CredentialBootstrap::new(Arc::clone(&client)),
            client,
            codec: ArchiveCodec::default(),
            token: token.into(),
            archive_id: archive_id.filter(|id| !id.is_empty()),
            update_id: None,
            root_archive_id: None,
        }
    }

    /// Replaces the codec used for the archive's own contents.
    pub fn with_codec(mut self, codec: ArchiveCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn archive_id(&self) -> Option<&str> {
        self.archive_id.as_deref()
    }

    pub fn update_id(&self) -> Option<&str> {
        self.update_id.as_deref()
    }

    pub fn root_archive_id(&self) -> Option<&str> {
        self.root_archive_id.as_deref()
    }

    /// Whether the next save creates the archive.
    pub fn is_new(&self) -> bool {
        self.archive_id.is_none()
    }

    /// Fetches and decrypts the archive.
    pub async fn load(&mut self, master: &Credentials) -> SyncResult<Archive> {
        let archive_id = self
            .archive_id
            .clone()
            .ok_or_else(|| SyncError::NotFound("session has no archive id to load".into()))?;

        let digest = self.client.update_digest(&self.token, master).await?;
        self.root_archive_id = Some(digest.root_archive_id.clone());

        let fetched = self
            .client
            .fetch_archive(&self.token, &digest.root_archive_id, &archive_id)
            .await?;
        self.update_id = Some(fetched.update_id);

        let credentials = Credentials::from_password(fetched.password);
        let archive = self.codec.decode(&fetched.content, &credentials)?;
        debug!(
            "Loaded archive {} at {}",
            archive_id,
            self.update_id.as_deref().unwrap_or_default()
        );
        Ok(archive)
    }

    /// Encrypts and writes `archive`, creating it remotely if the session is new.
    ///
    /// A new archive gets fresh credentials recorded in the root archive
    /// under a placeholder, which is renamed to the assigned id once the
    /// write succeeds. An existing archive is written with compare-and-swap
    /// against the update id from the last load or save.
    pub async fn save(
        &mut self,
        archive: &Archive,
        master: &Credentials,
        options: SaveOptions,
    ) -> SyncResult<()> {
        let is_new = self.is_new();

        let (credentials, expected_update_id) = match &self.archive_id {
            None => {
                let credentials = self.bootstrap.bootstrap_new(&self.token, master).await?;
                (credentials, None)
            }
            Some(archive_id) => {
                let not_loaded = || SyncError::NotLoaded(archive_id.clone());
                let update_id = self.update_id.clone().ok_or_else(not_loaded)?;
                let root_archive_id = self.root_archive_id.as_deref().ok_or_else(not_loaded)?;
                let credentials = self
                    .bootstrap
                    .retrieve_existing(&self.token, root_archive_id, master, archive_id)
                    .await?;
                (credentials, Some(update_id))
            }
        };

        let encrypted_contents = self.codec.encode(archive, &credentials)?;

        // The root pointer may have moved while credentials were resolved.
        let digest = self.client.update_digest(&self.token, master).await?;

        let fresh_update_id = generate_update_id();
        let (update_id, new_update_id) = match expected_update_id {
            Some(current) => (current, Some(fresh_update_id)),
            None => (fresh_update_id, None),
        };

        let outcome = self
            .client
            .write_archive(WriteRequest {
                token: self.token.clone(),
                root_archive_id: digest.root_archive_id.clone(),
                archive_id: self.archive_id.clone(),
                encrypted_contents,
                update_id,
                new_update_id,
                master: master.clone(),
                is_new,
                is_root: false,
                organisation_id: Some(digest.personal_org_id),
                name: options.name,
            })
            .await?;

        debug!(
            "Wrote archive {} at {}",
            outcome.archive_id, outcome.update_id
        );
        self.update_id = Some(outcome.update_id);
        self.archive_id = Some(outcome.archive_id.clone());
        self.root_archive_id = Some(digest.root_archive_id.clone());

        if is_new {
            let root = self
                .bootstrap
                .link_new_archive(
                    &self.token,
                    &digest.root_archive_id,
                    master,
                    &outcome.archive_id,
                    &credentials,
                )
                .await?;
            self.client
                .save_root_archive(&self.token, &digest.root_archive_id, &root, master)
                .await?;
            info!("Created archive {}", outcome.archive_id);
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
