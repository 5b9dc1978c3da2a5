// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Message transport to the archive server.
//!
//! [`RemoteClient`](super::RemoteClient) only ever talks to a [`Transport`],
//! which keeps the request/response logic testable without sockets.

use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

use vk_core::protocol::{ClientMessage, ServerMessage};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by [`Transport`] methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// A bidirectional, message-oriented connection.
pub trait Transport: Send + Sync {
    /// Opens a connection to `url`, replacing any previous one.
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()>;

    /// Closes the connection. Closing an unconnected transport is a no-op.
    fn disconnect(&mut self) -> TransportFuture<'_, ()>;

    /// Sends one message.
    fn send(&mut self, msg: ClientMessage) -> TransportFuture<'_, ()>;

    /// Waits for the next message. `None` means the peer closed.
    fn recv(&mut self) -> TransportFuture<'_, Option<ServerMessage>>;

    /// Whether a connection is currently open.
    fn is_connected(&self) -> bool;
}

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct Connection {
    sink: SplitSink<Ws, Message>,
    stream: SplitStream<Ws>,
}

/// [`Transport`] over a WebSocket carrying JSON text frames.
#[derive(Default)]
pub struct WebSocketTransport {
    conn: Option<Connection>,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for WebSocketTransport {
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()> {
        let url = url.to_string();
        Box::pin(async move {
            let (ws, _) = tokio_tungstenite::connect_async(&url)
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
            let (sink, stream) = ws.split();
            self.conn = Some(Connection { sink, stream });
            debug!("Connected to {}", url);
            Ok(())
        })
    }

    fn disconnect(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if let Some(mut conn) = self.conn.take() {
                // The peer may already be gone.
                let _ = conn.sink.close().await;
            }
            Ok(())
        })
    }

    fn send(&mut self, msg: ClientMessage) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let json = msg
                .to_json()
                .map_err(|e| TransportError::InvalidFrame(e.to_string()))?;
            let conn = self.conn.as_mut().ok_or(TransportError::ConnectionClosed)?;

            let sent = match conn.sink.send(Message::Text(json.into())).await {
                Ok(()) => conn.sink.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = sent {
                self.conn = None;
                return Err(TransportError::SendFailed(e.to_string()));
            }
            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<ServerMessage>> {
        Box::pin(async move {
            let conn = self.conn.as_mut().ok_or(TransportError::ConnectionClosed)?;

            loop {
                match conn.stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return ServerMessage::from_json(&text)
                            .map(Some)
                            .map_err(|e| TransportError::InvalidFrame(e.to_string()));
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        self.conn = None;
                        return Ok(None);
                    }
                    // Control and binary frames carry no protocol messages
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        self.conn = None;
                        return Err(TransportError::ReceiveFailed(e.to_string()));
                    }
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }
}
