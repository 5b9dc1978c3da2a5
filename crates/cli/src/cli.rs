// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "vk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Encrypted credential archives synced through a vaultkeep server")]
#[command(
    long_about = "Encrypted credential archives synced through a vaultkeep server.\n\n\
    Archives are encrypted locally with per-archive passwords. Those passwords are kept \
    in the account's root archive, itself encrypted with the master password from \
    VK_MASTER_PASSWORD."
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write the config file with the server URL and account token
    Init {
        /// Server WebSocket URL (ws://... or wss://...)
        #[arg(long, value_parser = non_empty_string)]
        url: String,

        /// Account access token
        #[arg(long, value_parser = non_empty_string)]
        token: String,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Create a new remote archive and print its descriptor
    #[command(after_help = "\
Examples:
  vk create --content vault.json               Create from an archive file
  vk create --name Work --content work.json    Create with a display name")]
    Create {
        /// Display name stored alongside the archive
        #[arg(long)]
        name: Option<String>,

        /// Archive JSON file
        #[arg(long, value_name = "path")]
        content: PathBuf,
    },

    /// Load and print an archive
    #[command(after_help = "\
Examples:
  vk show @work.desc                     Descriptor read from a file
  vk show '{\"type\":\"remote-archive\",...}'  Descriptor given inline
  vk show @work.desc -o json             Print the archive as JSON")]
    Show {
        /// Descriptor JSON, or @path to a file containing it
        descriptor: String,

        /// Output format
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Replace an archive's contents
    Push {
        /// Descriptor JSON, or @path to a file containing it
        descriptor: String,

        /// Archive JSON file
        #[arg(long, value_name = "path")]
        content: PathBuf,
    },

    /// Check that the configured server is reachable
    Status,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
