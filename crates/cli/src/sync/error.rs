// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the sync layer.

use thiserror::Error;

use super::remote::RemoteError;

/// Context attached to failures while reading credentials from the root archive.
pub const FETCH_CREDENTIALS_CONTEXT: &str = "fetching credentials for archive";

/// Context attached to failures while linking a new archive in the root archive.
pub const UPDATE_CREDENTIALS_CONTEXT: &str = "updating credentials for archive";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("inconsistent root archive: {0}")]
    Inconsistent(String),

    #[error("archive {0} has not been loaded in this session")]
    NotLoaded(String),

    #[error("unknown descriptor type '{0}'")]
    UnknownType(String),

    #[error("malformed descriptor: {0}")]
    MalformedInput(#[source] serde_json::Error),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("archive codec error: {0}")]
    Codec(#[from] vk_core::Error),

    #[error("{context}: {source}")]
    Context {
        context: &'static str,
        #[source]
        source: Box<SyncError>,
    },
}

impl SyncError {
    /// Wraps this error with the name of the operation that failed.
    pub fn context(self, context: &'static str) -> Self {
        SyncError::Context {
            context,
            source: Box::new(self),
        }
    }

    /// The innermost error, with every [`SyncError::Context`] layer removed.
    pub fn root_cause(&self) -> &SyncError {
        match self {
            SyncError::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
