// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! [`RemoteSyncClient`] backed by the vk-remote wire protocol.
//!
//! Requests are strictly one at a time: the transport lock is held from
//! send until the matching response arrives. The server only ever sees
//! encrypted envelopes; root archives are encrypted and decrypted here
//! under the master credentials.
//!
//! The most recently loaded or saved root archive is cached so archive
//! passwords for [`fetch_archive`](RemoteSyncClient::fetch_archive) can be
//! looked up in it. Root saves never consult the cache: they are written
//! with compare-and-swap against the version the caller's [`LoadedRoot`]
//! was read at.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::debug;

use vk_core::protocol::{ArchiveWrite, ClientMessage, ServerMessage};
use vk_core::{generate_update_id, Archive, ArchiveCodec, Credentials};

use super::bootstrap::credential_password;
use super::remote::{
    Digest, FetchedArchive, LoadedRoot, RemoteError, RemoteFuture, RemoteResult,
    RemoteSyncClient, WriteOutcome, WriteRequest,
};
use super::transport::{Transport, TransportError, WebSocketTransport};

/// Configuration for the remote client.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// WebSocket URL of the archive server.
    pub url: String,
    pub connect_timeout_secs: u64,
    /// Maximum wait for a single response.
    pub request_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            url: "ws://localhost:7891".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

/// Protocol client for the archive server.
pub struct RemoteClient<T: Transport = WebSocketTransport> {
    config: SyncConfig,
    codec: ArchiveCodec,
    transport: Mutex<T>,
    next_request_id: AtomicU64,
    roots: Mutex<HashMap<String, Archive>>,
}

impl RemoteClient<WebSocketTransport> {
    /// Creates a client that connects over WebSocket on first use.
    pub fn new(config: SyncConfig) -> Self {
        Self::with_transport(config, WebSocketTransport::new())
    }
}

impl<T: Transport> RemoteClient<T> {
    pub fn with_transport(config: SyncConfig, transport: T) -> Self {
        RemoteClient {
            config,
            codec: ArchiveCodec::default(),
            transport: Mutex::new(transport),
            next_request_id: AtomicU64::new(1),
            roots: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces the codec used for root archives.
    pub fn with_codec(mut self, codec: ArchiveCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Round-trips a ping and returns the time it took.
    pub async fn ping(&self) -> RemoteResult<Duration> {
        let started = tokio::time::Instant::now();
        let reply = self.request(ClientMessage::ping(self.next_id())).await?;
        match reply {
            ServerMessage::Pong { .. } => Ok(started.elapsed()),
            other => Err(unexpected("pong", &other)),
        }
    }

    /// Closes the connection. The next request reconnects.
    pub async fn disconnect(&self) -> RemoteResult<()> {
        self.transport.lock().await.disconnect().await?;
        Ok(())
    }

    fn next_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Sends one request and waits for the response carrying its id.
    async fn request(&self, msg: ClientMessage) -> RemoteResult<ServerMessage> {
        let request_id = msg.request_id();
        let mut transport = self.transport.lock().await;

        if !transport.is_connected() {
            let secs = self.config.connect_timeout_secs;
            timeout(Duration::from_secs(secs), transport.connect(&self.config.url))
                .await
                .map_err(|_| RemoteError::Timeout(secs))??;
        }

        transport.send(msg).await?;

        let secs = self.config.request_timeout_secs;
        let reply = timeout(Duration::from_secs(secs), await_reply(&mut *transport, request_id)).await;
        match reply {
            Ok(result) => result,
            Err(_) => {
                // A late response must not be mistaken for the next one.
                if let Err(e) = transport.disconnect().await {
                    debug!("Error closing timed-out connection: {}", e);
                }
                Err(RemoteError::Timeout(secs))
            }
        }
    }

    async fn request_digest(&self, token: &str, master: &Credentials) -> RemoteResult<Digest> {
        let reply = self
            .request(ClientMessage::digest(self.next_id(), token))
            .await?;
        let digest = match reply {
            ServerMessage::Digest {
                root_archive_id,
                personal_org_id,
                ..
            } => Digest {
                root_archive_id,
                personal_org_id,
            },
            other => return Err(unexpected("digest", &other)),
        };

        self.load_root(token, &digest.root_archive_id, master).await?;
        Ok(digest)
    }

    /// Fetches `(contents, update_id)` for an archive.
    async fn fetch_envelope(
        &self,
        token: &str,
        archive_id: &str,
    ) -> RemoteResult<(Option<String>, String)> {
        let reply = self
            .request(ClientMessage::fetch(self.next_id(), token, archive_id))
            .await?;
        match reply {
            ServerMessage::Archive {
                contents,
                update_id,
                ..
            } => {
                debug!("Fetched archive {} at {}", archive_id, update_id);
                Ok((contents, update_id))
            }
            other => Err(unexpected("archive", &other)),
        }
    }

    async fn fetch(
        &self,
        token: &str,
        root_archive_id: &str,
        archive_id: &str,
    ) -> RemoteResult<FetchedArchive> {
        let (contents, update_id) = self.fetch_envelope(token, archive_id).await?;
        let content = contents
            .ok_or_else(|| RemoteError::Protocol(format!("archive {} has no contents", archive_id)))?;

        let roots = self.roots.lock().await;
        let root = roots
            .get(root_archive_id)
            .ok_or_else(|| RemoteError::RootNotLoaded(root_archive_id.to_string()))?;
        let password = credential_password(root, archive_id)
            .map_err(|e| RemoteError::NotFound(e.to_string()))?;

        Ok(FetchedArchive {
            content,
            password: password.to_string(),
            update_id,
        })
    }

    async fn write(&self, request: WriteRequest) -> RemoteResult<WriteOutcome> {
        let msg = ClientMessage::write(ArchiveWrite {
            request_id: self.next_id(),
            token: request.token,
            root_archive_id: request.root_archive_id,
            archive_id: request.archive_id,
            contents: request.encrypted_contents,
            update_id: request.update_id,
            new_update_id: request.new_update_id,
            is_new: request.is_new,
            is_root: request.is_root,
            organisation_id: request.organisation_id,
            name: request.name,
        });
        match self.request(msg).await? {
            ServerMessage::Written {
                archive_id,
                update_id,
                ..
            } => Ok(WriteOutcome {
                update_id,
                archive_id,
            }),
            other => Err(unexpected("written", &other)),
        }
    }

    async fn load_root(
        &self,
        token: &str,
        root_archive_id: &str,
        master: &Credentials,
    ) -> RemoteResult<LoadedRoot> {
        let (contents, update_id) = self.fetch_envelope(token, root_archive_id).await?;
        // A root that was never written starts out empty
        let archive = match contents {
            Some(envelope) => self.codec.decode(&envelope, master)?,
            None => Archive::new(),
        };

        self.roots
            .lock()
            .await
            .insert(root_archive_id.to_string(), archive.clone());
        Ok(LoadedRoot { archive, update_id })
    }

    async fn save_root(
        &self,
        token: &str,
        root_archive_id: &str,
        root: &LoadedRoot,
        master: &Credentials,
    ) -> RemoteResult<String> {
        let outcome = self
            .write(WriteRequest {
                token: token.to_string(),
                root_archive_id: root_archive_id.to_string(),
                archive_id: Some(root_archive_id.to_string()),
                encrypted_contents: self.codec.encode(&root.archive, master)?,
                update_id: root.update_id.clone(),
                new_update_id: Some(generate_update_id()),
                master: master.clone(),
                is_new: false,
                is_root: true,
                organisation_id: None,
                name: None,
            })
            .await?;

        debug!("Saved root archive {} at {}", root_archive_id, outcome.update_id);
        self.roots
            .lock()
            .await
            .insert(root_archive_id.to_string(), root.archive.clone());
        Ok(outcome.update_id)
    }
}

impl<T: Transport> RemoteSyncClient for RemoteClient<T> {
    fn update_digest<'a>(
        &'a self,
        token: &'a str,
        master: &'a Credentials,
    ) -> RemoteFuture<'a, Digest> {
        Box::pin(self.request_digest(token, master))
    }

    fn fetch_archive<'a>(
        &'a self,
        token: &'a str,
        root_archive_id: &'a str,
        archive_id: &'a str,
    ) -> RemoteFuture<'a, FetchedArchive> {
        Box::pin(self.fetch(token, root_archive_id, archive_id))
    }

    fn write_archive(&self, request: WriteRequest) -> RemoteFuture<'_, WriteOutcome> {
        Box::pin(self.write(request))
    }

    fn load_root_archive<'a>(
        &'a self,
        token: &'a str,
        root_archive_id: &'a str,
        master: &'a Credentials,
    ) -> RemoteFuture<'a, LoadedRoot> {
        Box::pin(self.load_root(token, root_archive_id, master))
    }

    fn save_root_archive<'a>(
        &'a self,
        token: &'a str,
        root_archive_id: &'a str,
        root: &'a LoadedRoot,
        master: &'a Credentials,
    ) -> RemoteFuture<'a, String> {
        Box::pin(self.save_root(token, root_archive_id, root, master))
    }
}

/// Reads messages until the response to `request_id` arrives.
async fn await_reply<T: Transport>(transport: &mut T, request_id: u64) -> RemoteResult<ServerMessage> {
    loop {
        let reply = transport
            .recv()
            .await?
            .ok_or(TransportError::ConnectionClosed)?;
        match reply {
            ServerMessage::Error {
                request_id: id,
                kind,
                message,
            } if id.is_none() || id == Some(request_id) => {
                return Err(RemoteError::from_server(kind, message));
            }
            reply if reply.request_id() == Some(request_id) => return Ok(reply),
            stale => debug!("Discarding response to earlier request {:?}", stale.request_id()),
        }
    }
}

fn unexpected(expected: &str, got: &ServerMessage) -> RemoteError {
    RemoteError::Protocol(format!("expected {} response, got {:?}", expected, got))
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
