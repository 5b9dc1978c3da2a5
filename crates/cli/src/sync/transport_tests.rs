// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the transport module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::transport::{Transport, TransportError, TransportFuture};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use vk_core::protocol::{ClientMessage, ServerMessage};

/// Scripted response for one request sent through a [`MockTransport`].
pub type Responder = Arc<dyn Fn(&ClientMessage) -> Option<ServerMessage> + Send + Sync>;

/// Mock transport for testing without real sockets.
///
/// Every sent message is recorded. Replies come from the `incoming` queue
/// first and then from the optional responder, which sees each request.
pub struct MockTransport {
    connected: bool,
    incoming: Arc<Mutex<VecDeque<ServerMessage>>>,
    outgoing: Arc<Mutex<Vec<ClientMessage>>>,
    responder: Option<Responder>,
    connect_should_fail: bool,
    connects: Arc<Mutex<usize>>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            connected: false,
            incoming: Arc::new(Mutex::new(VecDeque::new())),
            outgoing: Arc::new(Mutex::new(Vec::new())),
            responder: None,
            connect_should_fail: false,
            connects: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates a transport that answers each request with `responder`.
    pub fn responding(
        responder: impl Fn(&ClientMessage) -> Option<ServerMessage> + Send + Sync + 'static,
    ) -> Self {
        MockTransport {
            responder: Some(Arc::new(responder)),
            ..Self::new()
        }
    }

    /// Add a message that will be returned by recv().
    pub fn queue_incoming(&self, msg: ServerMessage) {
        self.incoming.lock().unwrap().push_back(msg);
    }

    /// Shared handle on every message sent so far.
    pub fn outgoing(&self) -> Arc<Mutex<Vec<ClientMessage>>> {
        Arc::clone(&self.outgoing)
    }

    /// Shared handle on the number of successful connects.
    pub fn connects(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.connects)
    }

    /// Get all messages that were sent.
    pub fn get_outgoing(&self) -> Vec<ClientMessage> {
        self.outgoing.lock().unwrap().clone()
    }

    pub fn set_connect_fail(&mut self, fail: bool) {
        self.connect_should_fail = fail;
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, _url: &str) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if self.connect_should_fail {
                return Err(TransportError::ConnectionFailed("mock failure".into()));
            }
            self.connected = true;
            *self.connects.lock().unwrap() += 1;
            Ok(())
        })
    }

    fn disconnect(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            self.connected = false;
            Ok(())
        })
    }

    fn send(&mut self, msg: ClientMessage) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if !self.connected {
                return Err(TransportError::ConnectionClosed);
            }
            if let Some(responder) = &self.responder {
                if let Some(reply) = responder(&msg) {
                    self.incoming.lock().unwrap().push_back(reply);
                }
            }
            self.outgoing.lock().unwrap().push(msg);
            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<ServerMessage>> {
        let incoming = Arc::clone(&self.incoming);
        Box::pin(async move { Ok(incoming.lock().unwrap().pop_front()) })
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[tokio::test]
async fn test_mock_transport_connect() {
    let mut transport = MockTransport::new();
    assert!(!transport.is_connected());

    transport.connect("ws://localhost:1234").await.unwrap();
    assert!(transport.is_connected());

    transport.disconnect().await.unwrap();
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_mock_transport_send_recv() {
    let mut transport = MockTransport::new();
    transport.connect("ws://localhost:1234").await.unwrap();

    transport.send(ClientMessage::ping(42)).await.unwrap();

    let outgoing = transport.get_outgoing();
    assert_eq!(outgoing.len(), 1);
    assert!(matches!(outgoing[0], ClientMessage::Ping { id: 42 }));

    transport.queue_incoming(ServerMessage::pong(42));
    let received = transport.recv().await.unwrap();
    assert!(matches!(received, Some(ServerMessage::Pong { id: 42 })));

    let received = transport.recv().await.unwrap();
    assert!(received.is_none());
}

#[tokio::test]
async fn test_mock_transport_responder() {
    let mut transport = MockTransport::responding(|msg| match msg {
        ClientMessage::Ping { id } => Some(ServerMessage::pong(*id)),
        _ => None,
    });
    transport.connect("ws://localhost:1234").await.unwrap();

    transport.send(ClientMessage::ping(7)).await.unwrap();
    let received = transport.recv().await.unwrap();
    assert!(matches!(received, Some(ServerMessage::Pong { id: 7 })));
}

#[tokio::test]
async fn test_mock_transport_connect_fail() {
    let mut transport = MockTransport::new();
    transport.set_connect_fail(true);

    let result = transport.connect("ws://localhost:1234").await;
    assert!(result.is_err());
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_send_without_connection_fails() {
    let mut transport = MockTransport::new();
    let err = transport.send(ClientMessage::ping(1)).await.unwrap_err();
    assert!(matches!(err, TransportError::ConnectionClosed));
}

#[tokio::test]
async fn test_websocket_transport_starts_disconnected() {
    let mut transport = super::transport::WebSocketTransport::new();
    assert!(!transport.is_connected());
    transport.disconnect().await.unwrap();

    let err = transport.recv().await.unwrap_err();
    assert!(matches!(err, TransportError::ConnectionClosed));
}

#[tokio::test]
async fn test_websocket_transport_connect_refused() {
    // Grab a free port, then release it so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut transport = super::transport::WebSocketTransport::new();
    let err = transport
        .connect(&format!("ws://{}", addr))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::ConnectionFailed(_)));
    assert!(!transport.is_connected());
}
