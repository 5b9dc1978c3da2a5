// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-archive credentials kept in the account's root archive.
//!
//! The root archive is itself an encrypted archive. Its `"archives"` group
//! holds one entry per child archive, titled with the child's id and
//! carrying the child's password. While a child is being created its entry
//! is titled [`NEW_ARCHIVE_PLACEHOLDER`] until the server assigns an id.
//!
//! Every operation loads the root archive fresh from the remote and saves
//! it back against the version it was read at. Concurrent writers are
//! detected by the server's update-id check and by refusing to link a
//! placeholder that is not the one this creation wrote, never by local
//! locking.

use std::sync::Arc;

use tracing::{debug, info, warn};

use vk_core::archive::{PASSWORD_PROPERTY, TITLE_PROPERTY};
use vk_core::{generate_password, Archive, Credentials, ARCHIVE_PASSWORD_LENGTH};

use super::error::{SyncError, SyncResult, FETCH_CREDENTIALS_CONTEXT, UPDATE_CREDENTIALS_CONTEXT};
use super::remote::{LoadedRoot, RemoteSyncClient};

/// Title of the root archive group holding child archive credentials.
pub const ARCHIVES_GROUP: &str = "archives";

/// Title of the credential entry for an archive not yet assigned an id.
pub const NEW_ARCHIVE_PLACEHOLDER: &str = "__new_archive__";

/// Creates and locates archive credentials in the root archive.
pub struct CredentialBootstrap<C> {
    client: Arc<C>,
}

impl<C: RemoteSyncClient> CredentialBootstrap<C> {
    pub fn new(client: Arc<C>) -> Self {
        CredentialBootstrap { client }
    }

    /// Generates credentials for an archive that is about to be created.
    ///
    /// Any placeholder left behind by an earlier, interrupted creation is
    /// removed before the new one is written, so at most one remains.
    pub async fn bootstrap_new(&self, token: &str, master: &Credentials) -> SyncResult<Credentials> {
        let password = generate_password(ARCHIVE_PASSWORD_LENGTH);

        let digest = self.client.update_digest(token, master).await?;
        let root_archive_id = digest.root_archive_id;
        let mut root = self
            .client
            .load_root_archive(token, &root_archive_id, master)
            .await?;

        let group = root.archive.group_or_create(ARCHIVES_GROUP);
        let removed = group.delete_entries_by_property(TITLE_PROPERTY, NEW_ARCHIVE_PLACEHOLDER);
        if removed > 0 {
            warn!(
                "Removed {} orphaned placeholder(s) from root archive {}",
                removed, root_archive_id
            );
        }
        group
            .create_entry(NEW_ARCHIVE_PLACEHOLDER)
            .set_property(PASSWORD_PROPERTY, password.as_str());

        self.client
            .save_root_archive(token, &root_archive_id, &root, master)
            .await?;
        debug!("Stored placeholder credentials in root archive {}", root_archive_id);

        Ok(Credentials::from_password(password))
    }

    /// Returns the credentials recorded for `archive_id`.
    pub async fn retrieve_existing(
        &self,
        token: &str,
        root_archive_id: &str,
        master: &Credentials,
        archive_id: &str,
    ) -> SyncResult<Credentials> {
        self.lookup_credentials(token, root_archive_id, master, archive_id)
            .await
            .map_err(|e| e.context(FETCH_CREDENTIALS_CONTEXT))
    }

    /// Renames the pending placeholder to the id the server assigned.
    ///
    /// `credentials` are the ones [`bootstrap_new`](Self::bootstrap_new)
    /// returned for this creation. A placeholder carrying any other password
    /// belongs to another creation and is left alone.
    ///
    /// Returns the updated root archive; the caller persists it.
    pub async fn link_new_archive(
        &self,
        token: &str,
        root_archive_id: &str,
        master: &Credentials,
        assigned_archive_id: &str,
        credentials: &Credentials,
    ) -> SyncResult<LoadedRoot> {
        self.rename_placeholder(token, root_archive_id, master, assigned_archive_id, credentials)
            .await
            .map_err(|e| e.context(UPDATE_CREDENTIALS_CONTEXT))
    }

    async fn lookup_credentials(
        &self,
        token: &str,
        root_archive_id: &str,
        master: &Credentials,
        archive_id: &str,
    ) -> SyncResult<Credentials> {
        let root = self
            .client
            .load_root_archive(token, root_archive_id, master)
            .await?;
        let password = credential_password(&root.archive, archive_id)?;
        Ok(Credentials::from_password(password))
    }

    async fn rename_placeholder(
        &self,
        token: &str,
        root_archive_id: &str,
        master: &Credentials,
        assigned_archive_id: &str,
        credentials: &Credentials,
    ) -> SyncResult<LoadedRoot> {
        let mut root = self
            .client
            .load_root_archive(token, root_archive_id, master)
            .await?;

        let group = root.archive.find_group_mut(ARCHIVES_GROUP).ok_or_else(missing_group)?;
        let mut placeholders =
            group.find_entries_by_property_mut(TITLE_PROPERTY, NEW_ARCHIVE_PLACEHOLDER);
        match placeholders.as_mut_slice() {
            [] => {
                return Err(SyncError::NotFound(format!(
                    "no pending credentials to link to archive {}",
                    assigned_archive_id
                )))
            }
            [entry] if entry.property(PASSWORD_PROPERTY) == Some(credentials.password()) => {
                entry.set_property(TITLE_PROPERTY, assigned_archive_id)
            }
            [_] => {
                return Err(SyncError::Inconsistent(format!(
                    "pending credentials were replaced by another creation, not linking archive {}",
                    assigned_archive_id
                )))
            }
            many => {
                return Err(SyncError::Inconsistent(format!(
                    "{} pending credential entries, refusing to pick one for archive {}",
                    many.len(),
                    assigned_archive_id
                )))
            }
        }

        info!(
            "Linked credentials for archive {} in root archive {}",
            assigned_archive_id, root_archive_id
        );
        Ok(root)
    }
}

/// Looks up the password recorded for `archive_id` in a root archive.
pub(crate) fn credential_password<'a>(root: &'a Archive, archive_id: &str) -> SyncResult<&'a str> {
    let group = root
        .find_groups_by_title(ARCHIVES_GROUP)
        .into_iter()
        .next()
        .ok_or_else(missing_group)?;
    let entry = group
        .find_entries_by_property(TITLE_PROPERTY, archive_id)
        .into_iter()
        .next()
        .ok_or_else(|| SyncError::NotFound(format!("credentials for archive {}", archive_id)))?;
    entry.property(PASSWORD_PROPERTY).ok_or_else(|| {
        SyncError::Inconsistent(format!(
            "credentials for archive {} carry no password",
            archive_id
        ))
    })
}

fn missing_group() -> SyncError {
    SyncError::Inconsistent(format!("root archive has no \"{}\" group", ARCHIVES_GROUP))
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
