// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;

use super::*;
use crate::sync::test_helpers::{master, sample_archive, test_codec, FakeRemote, TOKEN};
use crate::sync::REMOTE_ARCHIVE_TYPE;

#[tokio::test]
async fn test_create_returns_descriptor_of_new_archive() {
    let remote = FakeRemote::new();
    let mut session =
        ArchiveSyncSession::new(Arc::clone(&remote), TOKEN, None).with_codec(test_codec());

    let descriptor = create(&mut session, &sample_archive("Email"), &master(), None)
        .await
        .unwrap();

    assert_eq!(descriptor.kind, REMOTE_ARCHIVE_TYPE);
    assert_eq!(descriptor.token, TOKEN);
    assert_eq!(descriptor.archive_id.as_deref(), Some("A1"));
    assert!(remote.stored("A1").is_some());
}

#[tokio::test]
async fn test_create_passes_name() {
    let remote = FakeRemote::new();
    let mut session =
        ArchiveSyncSession::new(Arc::clone(&remote), TOKEN, None).with_codec(test_codec());

    create(&mut session, &sample_archive("Email"), &master(), Some("Work".into()))
        .await
        .unwrap();

    assert_eq!(remote.writes()[0].name.as_deref(), Some("Work"));
}

#[tokio::test]
async fn test_descriptor_reopens_created_archive() {
    let remote = FakeRemote::new();
    let archive = sample_archive("Email");
    let mut session =
        ArchiveSyncSession::new(Arc::clone(&remote), TOKEN, None).with_codec(test_codec());
    let descriptor = create(&mut session, &archive, &master(), None).await.unwrap();

    let mut reopened = ArchiveSyncSession::from_descriptor(remote, descriptor)
        .unwrap()
        .with_codec(test_codec());

    assert_eq!(reopened.load(&master()).await.unwrap(), archive);
}
