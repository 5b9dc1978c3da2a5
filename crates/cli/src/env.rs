// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions. The variable names live in the [`vars`]
//! submodule.

use std::path::PathBuf;

/// Environment variable name constants.
pub mod vars {
    pub const VK_CONFIG: &str = "VK_CONFIG";
    pub const VK_MASTER_PASSWORD: &str = "VK_MASTER_PASSWORD";
}

/// Returns the value of `VK_CONFIG` if set.
pub fn config_path() -> Option<PathBuf> {
    std::env::var(vars::VK_CONFIG)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Returns the value of `VK_MASTER_PASSWORD` if set and non-empty.
pub fn master_password() -> Option<String> {
    std::env::var(vars::VK_MASTER_PASSWORD)
        .ok()
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
