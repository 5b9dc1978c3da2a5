// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Each connection is served sequentially: one request is fully handled
//! before the next frame is read, so responses leave in request order.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use vk_core::protocol::{ClientMessage, ErrorKind, ServerMessage};

use crate::state::ServerState;

/// Run the WebSocket server on the given address.
pub async fn run(addr: SocketAddr, state: ServerState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);
    serve(listener, state).await?;
    Ok(())
}

/// Accept connections from an already-bound listener until it fails.
pub async fn serve(listener: TcpListener, state: ServerState) -> std::io::Result<()> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: ServerState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    loop {
        match ws_stream.next().await {
            Some(Ok(Message::Text(text))) => {
                let response = handle_client_message(&text, &state).await;
                let json = response.to_json()?;
                ws_sink.send(Message::Text(json.into())).await?;
            }
            Some(Ok(Message::Close(_))) => {
                info!("Client {} disconnected", peer_addr);
                break;
            }
            Some(Ok(Message::Ping(data))) => {
                ws_sink.send(Message::Pong(data)).await?;
            }
            Some(Ok(_)) => {
                // Ignore other message types (Binary, Pong, Frame)
            }
            Some(Err(e)) => {
                warn!("WebSocket error from {}: {}", peer_addr, e);
                break;
            }
            None => {
                info!("Client {} stream ended", peer_addr);
                break;
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Process a client message and return its response.
pub(crate) async fn handle_client_message(text: &str, state: &ServerState) -> ServerMessage {
    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => {
            return ServerMessage::error(None, ErrorKind::BadRequest, format!("invalid message: {}", e));
        }
    };
    let request_id = msg.request_id();

    match msg {
        ClientMessage::Digest { token, .. } => match state.digest(&token).await {
            Ok(account) => {
                debug!("Digest for root {}", account.root_archive_id);
                ServerMessage::digest(request_id, account.root_archive_id, account.personal_org_id)
            }
            Err(e) => error_response(request_id, e),
        },

        ClientMessage::Fetch {
            token, archive_id, ..
        } => match state.fetch(&token, &archive_id).await {
            Ok(record) => {
                debug!("Fetch {} at {}", archive_id, record.update_id);
                ServerMessage::archive(request_id, archive_id, record.contents, record.update_id)
            }
            Err(e) => error_response(request_id, e),
        },

        ClientMessage::Write(write) => match state.write(write).await {
            Ok(receipt) => ServerMessage::written(request_id, receipt.archive_id, receipt.update_id),
            Err(e) => error_response(request_id, e),
        },

        ClientMessage::Ping { id } => {
            debug!("Ping received: {}", id);
            ServerMessage::pong(id)
        }
    }
}

fn error_response(request_id: u64, err: crate::state::StateError) -> ServerMessage {
    let kind = err.kind();
    if kind == ErrorKind::Internal {
        error!("Request {} failed: {}", request_id, err);
    } else {
        debug!("Request {} rejected: {}", request_id, err);
    }
    ServerMessage::error(Some(request_id), kind, err.to_string())
}
