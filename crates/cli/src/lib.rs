// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! vkrs - Client library for vaultkeep remote archives.
//!
//! This crate provides the functionality behind the `vk` CLI: loading and
//! saving encrypted archives on a vaultkeep server, with each archive's
//! password kept in the account's root archive.
//!
//! # Main Components
//!
//! - [`sync::ArchiveSyncSession`] - Load/save of one remote archive
//! - [`sync::CredentialBootstrap`] - Archive passwords in the root archive
//! - [`sync::RemoteClient`] - WebSocket client for the `vk-remote` server
//! - [`Config`] - Server URL and account token
//! - [`Error`] - Error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vkrs::sync::{ArchiveSyncSession, RemoteClient, SaveOptions, SyncConfig};
//!
//! let client = Arc::new(RemoteClient::new(SyncConfig::default()));
//! let mut session = ArchiveSyncSession::new(client, token, None);
//! session.save(&archive, &master, SaveOptions::default()).await?;
//! println!("{}", session.to_descriptor().to_json()?);
//! ```

mod cli;
mod commands;

pub mod config;
pub mod env;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};

/// Runs a parsed command.
pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Init { url, token, force } => commands::init::run(url, token, force),
        Command::Create { name, content } => commands::create::run(name, content).await,
        Command::Show { descriptor, output } => commands::show::run(&descriptor, output).await,
        Command::Push {
            descriptor,
            content,
        } => commands::push::run(&descriptor, content).await,
        Command::Status => commands::status::run().await,
    }
}
