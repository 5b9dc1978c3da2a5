// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

#[test]
fn test_save_and_load_config() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("config.toml");
    let config = Config::new("ws://vault.example:7891", "tok-1").unwrap();

    config.save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_config_is_not_initialized() {
    let temp = TempDir::new().unwrap();
    let err = Config::load(&temp.path().join("config.toml")).unwrap_err();
    assert!(matches!(err, Error::NotInitialized));
}

#[test]
fn test_load_applies_timeout_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "token = \"t\"\n\n[remote]\nurl = \"ws://localhost:7891\"\n").unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.remote.connect_timeout_secs, 10);
    assert_eq!(config.remote.request_timeout_secs, 30);
}

#[test]
fn test_load_invalid_toml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "token = ").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, Error::Config(ref m) if m.contains("failed to parse")));
}

#[test]
fn test_load_rejects_non_websocket_url() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "token = \"t\"\n\n[remote]\nurl = \"http://localhost\"\n").unwrap();

    assert!(matches!(Config::load(&path), Err(Error::Config(_))));
}

#[parameterized(
    ws = { "ws://localhost:7891" },
    wss = { "wss://vault.example.com/sync" },
)]
fn test_valid_urls(url: &str) {
    assert_eq!(RemoteConfig::new(url).validate_url(), None);
}

#[parameterized(
    http = { "http://localhost:7891" },
    bare_host = { "localhost:7891" },
    empty_host = { "ws://" },
    empty = { "" },
)]
fn test_invalid_urls(url: &str) {
    assert!(RemoteConfig::new(url).validate_url().is_some());
}

#[test]
fn test_new_rejects_blank_token() {
    let err = Config::new("ws://localhost:7891", "  ").unwrap_err();
    assert!(matches!(err, Error::FieldEmpty { field: "token" }));
}

#[test]
fn test_sync_config_copies_remote_settings() {
    let mut config = Config::new("wss://vault.example", "tok").unwrap();
    config.remote.request_timeout_secs = 5;

    let sync = config.sync_config();

    assert_eq!(sync.url, "wss://vault.example");
    assert_eq!(sync.connect_timeout_secs, 10);
    assert_eq!(sync.request_timeout_secs, 5);
}
