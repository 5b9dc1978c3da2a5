// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! vk-remote: WebSocket archive server for vaultkeep.
//!
//! The server stores encrypted archive envelopes per account token and
//! enforces compare-and-swap on update ids. It never decrypts anything.

pub mod server;
pub mod state;


pub use state::{ServerState, StateError};
