// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistable identity of an [`ArchiveSyncSession`].
//!
//! ```json
//! {"type": "remote-archive", "token": "...", "archiveID": "..."}
//! ```
//!
//! `archiveID` is omitted for an archive that has not been created yet.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::{SyncError, SyncResult};
use super::remote::RemoteSyncClient;
use super::session::ArchiveSyncSession;

/// Discriminant identifying a remote archive descriptor.
pub const REMOTE_ARCHIVE_TYPE: &str = "remote-archive";

/// Serialized session identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(rename = "type")]
    pub kind: String,
    pub token: String,
    #[serde(
        rename = "archiveID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub archive_id: Option<String>,
}

impl Descriptor {
    /// A remote archive descriptor.
    pub fn remote_archive(token: impl Into<String>, archive_id: Option<String>) -> Self {
        Descriptor {
            kind: REMOTE_ARCHIVE_TYPE.to_string(),
            token: token.into(),
            archive_id,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<C: RemoteSyncClient> ArchiveSyncSession<C> {
    /// The descriptor that recreates this session.
    pub fn to_descriptor(&self) -> Descriptor {
        Descriptor::remote_archive(self.token(), self.archive_id().map(String::from))
    }

    /// Recreates a session from a descriptor.
    pub fn from_descriptor(client: Arc<C>, descriptor: Descriptor) -> SyncResult<Self> {
        if descriptor.kind != REMOTE_ARCHIVE_TYPE {
            return Err(SyncError::UnknownType(descriptor.kind));
        }
        Ok(Self::new(client, descriptor.token, descriptor.archive_id))
    }

    /// Parses a JSON descriptor and recreates its session.
    pub fn from_descriptor_str(client: Arc<C>, s: &str) -> SyncResult<Self> {
        let descriptor: Descriptor = serde_json::from_str(s).map_err(SyncError::MalformedInput)?;
        Self::from_descriptor(client, descriptor)
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
