// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::archive::PASSWORD_PROPERTY;
use yare::parameterized;

fn fast_codec() -> ArchiveCodec {
    ArchiveCodec::with_iterations(1)
}

fn sample_archive() -> Archive {
    let mut archive = Archive::new();
    archive
        .create_group("Email")
        .create_entry("personal")
        .set_property(PASSWORD_PROPERTY, "hunter2");
    archive
}

#[test]
fn test_encode_decode_preserves_archive() {
    let codec = fast_codec();
    let creds = Credentials::from_password("secret");
    let archive = sample_archive();

    let envelope = codec.encode(&archive, &creds).unwrap();
    assert!(envelope.starts_with("vk1$1$"));
    assert!(!envelope.contains("hunter2"));

    assert_eq!(codec.decode(&envelope, &creds).unwrap(), archive);
}

#[test]
fn test_encode_uses_fresh_salt_and_nonce() {
    let codec = fast_codec();
    let creds = Credentials::from_password("secret");
    let archive = sample_archive();

    let a = codec.encode(&archive, &creds).unwrap();
    let b = codec.encode(&archive, &creds).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_decode_with_wrong_password_fails() {
    let codec = fast_codec();
    let envelope = codec
        .encode(&sample_archive(), &Credentials::from_password("right"))
        .unwrap();

    let err = codec
        .decode(&envelope, &Credentials::from_password("wrong"))
        .unwrap_err();
    assert!(matches!(err, Error::Decryption));
}

#[test]
fn test_decode_reads_iterations_from_envelope() {
    let creds = Credentials::from_password("secret");
    let envelope = ArchiveCodec::with_iterations(3)
        .encode(&sample_archive(), &creds)
        .unwrap();

    // A codec configured differently still opens the envelope.
    let archive = ArchiveCodec::with_iterations(1)
        .decode(&envelope, &creds)
        .unwrap();
    assert_eq!(archive, sample_archive());
}

#[parameterized(
    empty = { "" },
    too_few_fields = { "vk1$1$AAAA" },
    wrong_version = { "vk9$1$AAAA$AAAA" },
    bad_iterations = { "vk1$many$AAAA$AAAA" },
    zero_iterations = { "vk1$0$AAAA$AAAA" },
    excessive_iterations = { "vk1$4294967295$AAAA$AAAA" },
    just_over_maximum = { "vk1$1000001$AAAA$AAAA" },
    bad_base64 = { "vk1$1$!!!!$AAAA" },
    short_payload = { "vk1$1$AAAA$AAAA" },
)]
fn test_decode_rejects_malformed_envelope(envelope: &str) {
    let err = fast_codec()
        .decode(envelope, &Credentials::from_password("secret"))
        .unwrap_err();
    assert!(matches!(err, Error::MalformedEnvelope(_)), "got {:?}", err);
}

#[test]
fn test_credentials_debug_is_redacted() {
    let creds = Credentials::from_password("hunter2");
    let debug = format!("{:?}", creds);
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("redacted"));
}

#[test]
fn test_with_iterations_clamps_to_range() {
    assert_eq!(ArchiveCodec::with_iterations(0).iterations(), 1);
    assert_eq!(ArchiveCodec::with_iterations(u32::MAX).iterations(), MAX_ITERATIONS);
    assert_eq!(ArchiveCodec::new().iterations(), DEFAULT_ITERATIONS);
}
