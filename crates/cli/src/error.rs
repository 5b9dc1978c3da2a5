// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{RemoteError, SyncError};

/// All possible errors that can occur in the vkrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'vk init' first")]
    NotInitialized,

    #[error("already initialized at {0}\n  hint: pass --force to overwrite")]
    AlreadyInitialized(String),

    #[error("master password not set\n  hint: export {0}")]
    MissingMasterPassword(&'static str),

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("cannot read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid archive file {path}: {source}")]
    InvalidArchive {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not determine config directory\n  hint: set {0}")]
    NoConfigDir(&'static str),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for vkrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
