// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The remote archive service as seen by the sync layer.
//!
//! [`ArchiveSyncSession`](super::ArchiveSyncSession) and
//! [`CredentialBootstrap`](super::CredentialBootstrap) receive a
//! [`RemoteSyncClient`] at construction and never reach for a global one.

use std::future::Future;
use std::pin::Pin;

use vk_core::protocol::ErrorKind;
use vk_core::{Archive, Credentials};

use super::transport::TransportError;

/// Errors reported by a [`RemoteSyncClient`].
///
/// The sync layer passes these through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("remote archive not found: {0}")]
    NotFound(String),

    #[error("update conflict: {0}")]
    Conflict(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("archive codec error: {0}")]
    Codec(#[from] vk_core::Error),

    #[error("root archive {0} has not been loaded")]
    RootNotLoaded(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),
}

impl RemoteError {
    /// Maps a server error response to a client error.
    pub fn from_server(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::NotFound => RemoteError::NotFound(message),
            ErrorKind::Conflict => RemoteError::Conflict(message),
            ErrorKind::BadRequest | ErrorKind::Internal => RemoteError::Rejected(message),
        }
    }
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`RemoteSyncClient`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// Account metadata returned by a digest refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub root_archive_id: String,
    pub personal_org_id: String,
}

/// An encrypted archive and the password that opens it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArchive {
    pub content: String,
    pub password: String,
    pub update_id: String,
}

/// A decrypted root archive and the version it was read at.
///
/// Saving it back is a compare-and-swap against `update_id`, so a root
/// that changed since this read is refused instead of overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRoot {
    pub archive: Archive,
    pub update_id: String,
}

/// A versioned archive write.
///
/// `update_id` is the version a new archive is created at, or the version
/// an existing archive is expected to hold. `new_update_id` is the version
/// an existing archive moves to and is `None` for new archives.
#[derive(Debug, Clone)]
pub struct WriteRequest {
    pub token: String,
    pub root_archive_id: String,
    pub archive_id: Option<String>,
    pub encrypted_contents: String,
    pub update_id: String,
    pub new_update_id: Option<String>,
    pub master: Credentials,
    pub is_new: bool,
    pub is_root: bool,
    pub organisation_id: Option<String>,
    pub name: Option<String>,
}

/// The version and id an archive has after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub update_id: String,
    pub archive_id: String,
}

/// Versioned read and write of archives against the backing service.
pub trait RemoteSyncClient: Send + Sync {
    /// Returns the current root archive id and personal organisation id.
    fn update_digest<'a>(
        &'a self,
        token: &'a str,
        master: &'a Credentials,
    ) -> RemoteFuture<'a, Digest>;

    /// Fetches an encrypted archive together with its password.
    fn fetch_archive<'a>(
        &'a self,
        token: &'a str,
        root_archive_id: &'a str,
        archive_id: &'a str,
    ) -> RemoteFuture<'a, FetchedArchive>;

    /// Writes an archive, enforcing compare-and-swap on `update_id`.
    fn write_archive(&self, request: WriteRequest) -> RemoteFuture<'_, WriteOutcome>;

    /// Loads and decrypts the root archive under the master credentials.
    fn load_root_archive<'a>(
        &'a self,
        token: &'a str,
        root_archive_id: &'a str,
        master: &'a Credentials,
    ) -> RemoteFuture<'a, LoadedRoot>;

    /// Encrypts and stores `root` as the account's root archive.
    ///
    /// Fails with [`RemoteError::Conflict`] unless the stored root is still
    /// at `root.update_id`. Returns the root's new update id.
    fn save_root_archive<'a>(
        &'a self,
        token: &'a str,
        root_archive_id: &'a str,
        root: &'a LoadedRoot,
        master: &'a Credentials,
    ) -> RemoteFuture<'a, String>;
}
