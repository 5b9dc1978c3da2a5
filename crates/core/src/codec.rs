// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Credential handling and archive encryption.
//!
//! Archives are serialized to JSON and sealed with AES-256-GCM under a key
//! derived from the archive password with PBKDF2-HMAC-SHA256. The result is
//! a single text envelope:
//!
//! ```text
//! vk1$<iterations>$<base64 salt>$<base64 nonce || ciphertext || tag>
//! ```
//!
//! The iteration count travels with the envelope, so decoding never depends
//! on the codec's own setting.

use std::fmt;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::archive::Archive;
use crate::error::{Error, Result};

const ENVELOPE_VERSION: &str = "vk1";
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count for new envelopes.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Highest iteration count accepted from an envelope or a codec.
pub const MAX_ITERATIONS: u32 = 10 * DEFAULT_ITERATIONS;

/// Password-based credentials for one archive.
///
/// The password is wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    password: Zeroizing<String>,
}

impl Credentials {
    /// Wraps a password as archive credentials.
    pub fn from_password(password: impl Into<String>) -> Self {
        Credentials {
            password: Zeroizing::new(password.into()),
        }
    }

    /// The password these credentials were derived from.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Encrypts and decrypts archives under [`Credentials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveCodec {
    iterations: u32,
}

impl Default for ArchiveCodec {
    fn default() -> Self {
        ArchiveCodec {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl ArchiveCodec {
    /// Creates a codec using [`DEFAULT_ITERATIONS`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with a custom key-derivation cost, clamped to
    /// `1..=MAX_ITERATIONS`.
    pub fn with_iterations(iterations: u32) -> Self {
        ArchiveCodec {
            iterations: iterations.clamp(1, MAX_ITERATIONS),
        }
    }

    /// The iteration count written into new envelopes.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Serializes and encrypts an archive into a text envelope.
    pub fn encode(&self, archive: &Archive, credentials: &Credentials) -> Result<String> {
        let plaintext = Zeroizing::new(serde_json::to_vec(archive)?);

        let salt: [u8; SALT_LEN] = rand::random();
        let key = derive_key(credentials.password(), &salt, self.iterations);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key[..]));
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_slice())
            .map_err(|e| Error::Encryption(e.to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(nonce.as_slice());
        blob.extend_from_slice(&ciphertext);

        Ok(format!(
            "{}${}${}${}",
            ENVELOPE_VERSION,
            self.iterations,
            STANDARD.encode(salt),
            STANDARD.encode(blob)
        ))
    }

    /// Decrypts and deserializes an envelope produced by [`ArchiveCodec::encode`].
    pub fn decode(&self, envelope: &str, credentials: &Credentials) -> Result<Archive> {
        let fields: Vec<&str> = envelope.trim().split('$').collect();
        let [version, iterations, salt, blob] = fields.as_slice() else {
            return Err(Error::MalformedEnvelope(format!(
                "expected 4 fields, found {}",
                fields.len()
            )));
        };

        if *version != ENVELOPE_VERSION {
            return Err(Error::MalformedEnvelope(format!(
                "unsupported version '{}'",
                version
            )));
        }

        let iterations: u32 = iterations
            .parse()
            .map_err(|_| Error::MalformedEnvelope(format!("invalid iterations '{}'", iterations)))?;
        if iterations == 0 {
            return Err(Error::MalformedEnvelope("iterations must be positive".into()));
        }
        if iterations > MAX_ITERATIONS {
            return Err(Error::MalformedEnvelope(format!(
                "iterations {} exceed the maximum of {}",
                iterations, MAX_ITERATIONS
            )));
        }

        let salt = STANDARD
            .decode(salt)
            .map_err(|e| Error::MalformedEnvelope(format!("salt: {}", e)))?;
        let blob = STANDARD
            .decode(blob)
            .map_err(|e| Error::MalformedEnvelope(format!("payload: {}", e)))?;
        if blob.len() < NONCE_LEN + TAG_LEN {
            return Err(Error::MalformedEnvelope("payload too short".into()));
        }

        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let key = derive_key(credentials.password(), &salt, iterations);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key[..]));

        let plaintext = Zeroizing::new(
            cipher
                .decrypt(Nonce::from_slice(nonce), ciphertext)
                .map_err(|_| Error::Decryption)?,
        );

        Ok(serde_json::from_slice(&plaintext)?)
    }
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key[..]);
    key
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
