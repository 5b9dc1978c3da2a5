// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages for client-server communication.
//!
//! The protocol is request/response:
//! - Client sends a request tagged with a `request_id`
//! - Server answers with exactly one message carrying the same `request_id`
//!
//! Archive contents are opaque encrypted envelopes; the server never sees
//! plaintext or passwords.

use serde::{Deserialize, Serialize};

/// A versioned write of one archive.
///
/// For a new archive `update_id` is the version the archive is created at.
/// For an existing archive `update_id` is the version the client expects
/// the server to hold, and `new_update_id` replaces it on success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveWrite {
    pub request_id: u64,
    pub token: String,
    pub root_archive_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_id: Option<String>,
    pub contents: String,
    pub update_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_update_id: Option<String>,
    pub is_new: bool,
    pub is_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Request the account digest (root archive and organisation ids).
    Digest { request_id: u64, token: String },

    /// Fetch the current contents and version of an archive.
    Fetch {
        request_id: u64,
        token: String,
        archive_id: String,
    },

    /// Create or update an archive.
    Write(ArchiveWrite),

    /// Ping message for keepalive.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Classification of a server-side failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The archive or account does not exist.
    NotFound,
    /// The expected update id did not match the stored one.
    Conflict,
    /// The request was malformed or not allowed.
    BadRequest,
    /// The server failed to process a valid request.
    Internal,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Response to a Digest request.
    Digest {
        request_id: u64,
        root_archive_id: String,
        personal_org_id: String,
    },

    /// Response to a Fetch request.
    ///
    /// `contents` is absent for a root archive that was never written.
    Archive {
        request_id: u64,
        archive_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        contents: Option<String>,
        update_id: String,
    },

    /// Response to an accepted Write request.
    Written {
        request_id: u64,
        archive_id: String,
        update_id: String,
    },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },

    /// Error message.
    Error {
        /// The request that failed, when it could be identified.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<u64>,
        kind: ErrorKind,
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    /// Creates a Digest message.
    pub fn digest(request_id: u64, token: impl Into<String>) -> Self {
        ClientMessage::Digest {
            request_id,
            token: token.into(),
        }
    }

    /// Creates a Fetch message.
    pub fn fetch(request_id: u64, token: impl Into<String>, archive_id: impl Into<String>) -> Self {
        ClientMessage::Fetch {
            request_id,
            token: token.into(),
            archive_id: archive_id.into(),
        }
    }

    /// Creates a Write message.
    pub fn write(write: ArchiveWrite) -> Self {
        ClientMessage::Write(write)
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// The id the response to this message will carry.
    pub fn request_id(&self) -> u64 {
        match self {
            ClientMessage::Digest { request_id, .. } | ClientMessage::Fetch { request_id, .. } => {
                *request_id
            }
            ClientMessage::Write(write) => write.request_id,
            ClientMessage::Ping { id } => *id,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates a Digest response.
    pub fn digest(
        request_id: u64,
        root_archive_id: impl Into<String>,
        personal_org_id: impl Into<String>,
    ) -> Self {
        ServerMessage::Digest {
            request_id,
            root_archive_id: root_archive_id.into(),
            personal_org_id: personal_org_id.into(),
        }
    }

    /// Creates an Archive response.
    pub fn archive(
        request_id: u64,
        archive_id: impl Into<String>,
        contents: Option<String>,
        update_id: impl Into<String>,
    ) -> Self {
        ServerMessage::Archive {
            request_id,
            archive_id: archive_id.into(),
            contents,
            update_id: update_id.into(),
        }
    }

    /// Creates a Written response.
    pub fn written(
        request_id: u64,
        archive_id: impl Into<String>,
        update_id: impl Into<String>,
    ) -> Self {
        ServerMessage::Written {
            request_id,
            archive_id: archive_id.into(),
            update_id: update_id.into(),
        }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// Creates an Error message.
    pub fn error(request_id: Option<u64>, kind: ErrorKind, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            request_id,
            kind,
            message: message.into(),
        }
    }

    /// The request this message answers, if any.
    pub fn request_id(&self) -> Option<u64> {
        match self {
            ServerMessage::Digest { request_id, .. }
            | ServerMessage::Archive { request_id, .. }
            | ServerMessage::Written { request_id, .. } => Some(*request_id),
            ServerMessage::Pong { id } => Some(*id),
            ServerMessage::Error { request_id, .. } => *request_id,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
