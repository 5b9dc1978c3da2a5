// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote server status.

use std::time::Duration;

use super::open_remote;
use crate::error::Result;
use crate::sync::{RemoteClient, RemoteResult, Transport};

/// Show whether the configured server answers.
pub async fn run() -> Result<()> {
    let (config, client) = open_remote()?;
    println!("Remote: {}", config.remote.url);

    let result = check(&*client).await;
    println!("{}", status_line(&result));
    result?;
    Ok(())
}

pub(crate) async fn check<T: Transport>(client: &RemoteClient<T>) -> RemoteResult<Duration> {
    let rtt = client.ping().await?;
    client.disconnect().await?;
    Ok(rtt)
}

pub(crate) fn status_line(result: &RemoteResult<Duration>) -> String {
    match result {
        Ok(rtt) => format!("Status: connected ({} ms)", rtt.as_millis()),
        Err(e) => format!("Status: unreachable ({})", e),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
