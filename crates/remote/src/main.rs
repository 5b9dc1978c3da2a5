// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! vk-remote: WebSocket archive server binary.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vk_remote::{server, ServerState};

/// vk-remote: Encrypted archive storage server
#[derive(Parser, Debug)]
#[command(name = "vk-remote")]
#[command(about = "WebSocket server storing encrypted vaultkeep archives")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7891")]
    bind: SocketAddr,

    /// Directory for archive storage
    #[arg(short, long, default_value = ".")]
    data: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting vk-remote server");
    info!("  Bind address: {}", args.bind);
    info!("  Data directory: {}", args.data.display());

    let state = ServerState::open(&args.data)?;

    server::run(args.bind, state).await?;

    Ok(())
}
