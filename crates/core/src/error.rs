// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for vk-core operations.

use thiserror::Error;

/// All possible errors that can occur in vk-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed archive envelope: {0}")]
    MalformedEnvelope(String),

    #[error("failed to decrypt archive\n  hint: the credentials do not match this archive")]
    Decryption,

    #[error("failed to encrypt archive: {0}")]
    Encryption(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for vk-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
