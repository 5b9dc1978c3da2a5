// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! vk-core: Shared library for the vaultkeep archive sync tools
//!
//! This crate provides the archive document model, the credential codec,
//! random generators, and the wire protocol used by both the `vk` CLI and
//! the `vk-remote` server.

pub mod archive;
pub mod codec;
pub mod error;
pub mod protocol;
pub mod random;

pub use archive::{Archive, Entry, Group};
pub use codec::{ArchiveCodec, Credentials};
pub use error::{Error, Result};
pub use random::{generate_password, generate_update_id, ARCHIVE_PASSWORD_LENGTH};
