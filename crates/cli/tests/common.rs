// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `vk` with its config file inside `home` and a clean environment.
pub fn vk(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("vk");
    cmd.env("VK_CONFIG", config_path(home))
        .env_remove("VK_MASTER_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

pub fn config_path(home: &TempDir) -> std::path::PathBuf {
    home.path().join("vaultkeep").join("config.toml")
}

/// Helper to create a temp home with a config pointing at `url`
pub fn init_temp(url: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    vk(&temp)
        .args(["init", "--url", url, "--token", "test-token"])
        .assert()
        .success();
    temp
}
