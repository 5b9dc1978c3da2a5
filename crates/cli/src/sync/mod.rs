// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote archive sync.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────────────┐
//! │ ArchiveSyncSession│────►│ CredentialBootstrap │
//! └────────┬─────────┘     └──────────┬──────────┘
//!          │                          │
//!          ▼                          ▼
//! ┌──────────────────────────────────────────────┐
//! │        RemoteSyncClient (trait)              │
//! │   RemoteClient ──► Transport ──► vk-remote   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! - A session loads and saves one archive, tracking its update id.
//! - The bootstrap keeps each archive's password in the account's root
//!   archive, itself encrypted under the master credentials.
//! - The remote client and its transport are injected, so everything
//!   above the trait is tested against an in-memory remote.

mod bootstrap;
mod client;
mod descriptor;
mod error;
mod remote;
mod session;
mod transport;

pub use bootstrap::{CredentialBootstrap, ARCHIVES_GROUP, NEW_ARCHIVE_PLACEHOLDER};
pub use client::{RemoteClient, SyncConfig};
pub use descriptor::{Descriptor, REMOTE_ARCHIVE_TYPE};
pub use error::{SyncError, SyncResult, FETCH_CREDENTIALS_CONTEXT, UPDATE_CREDENTIALS_CONTEXT};
pub use remote::{
    Digest, FetchedArchive, LoadedRoot, RemoteError, RemoteFuture, RemoteResult, RemoteSyncClient,
    WriteOutcome, WriteRequest,
};
pub use session::{ArchiveSyncSession, SaveOptions};
pub use transport::{Transport, TransportError, TransportFuture, TransportResult, WebSocketTransport};

#[cfg(test)]
pub(crate) mod test_helpers;

#[cfg(test)]
pub(crate) mod transport_tests;
