// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Random generators for archive passwords and update tokens.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use uuid::Uuid;

/// Length of generated per-archive passwords.
pub const ARCHIVE_PASSWORD_LENGTH: usize = 32;

const ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#%^&*()_+-=[]{};:,.<>?";

/// Generate a random password of `len` characters using the OS RNG.
pub fn generate_password(len: usize) -> String {
    let mut rng = OsRng;
    (0..len)
        .filter_map(|_| ALPHABET.choose(&mut rng).map(|&b| b as char))
        .collect()
}

/// Generate a fresh opaque update token.
pub fn generate_update_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
#[path = "random_tests.rs"]
mod tests;
