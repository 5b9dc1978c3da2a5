// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::future::ready;
use std::sync::{Arc, Mutex};

use vk_core::archive::{PASSWORD_PROPERTY, TITLE_PROPERTY};
use vk_core::{Archive, ArchiveCodec, Credentials};

use super::bootstrap::{credential_password, ARCHIVES_GROUP, NEW_ARCHIVE_PLACEHOLDER};
use super::remote::{
    Digest, FetchedArchive, LoadedRoot, RemoteError, RemoteFuture, RemoteSyncClient, WriteOutcome,
    WriteRequest,
};

pub const TOKEN: &str = "tok";
pub const ROOT_ID: &str = "root-1";
pub const ORG_ID: &str = "org-1";

/// Fast codec for tests.
pub fn test_codec() -> ArchiveCodec {
    ArchiveCodec::with_iterations(1)
}

pub fn master() -> Credentials {
    Credentials::from_password("correct horse battery staple")
}

/// An archive with a single login entry.
pub fn sample_archive(title: &str) -> Archive {
    let mut archive = Archive::new();
    archive
        .create_group("Logins")
        .create_entry(title)
        .set_property("username", "alice");
    archive
}

#[derive(Debug, Clone)]
pub struct StoredArchive {
    pub content: String,
    pub update_id: String,
}

/// Runs against the fake's state when the next archive write arrives.
pub type WriteHook = Box<dyn FnOnce(&mut FakeState) + Send>;

#[derive(Default)]
pub struct FakeState {
    pub root: Archive,
    /// Bumped on every root save; the root's update id is `r{root_version}`.
    pub root_version: u32,
    pub archives: HashMap<String, StoredArchive>,
    pub writes: Vec<WriteRequest>,
    pub digest_calls: usize,
    pub root_loads: usize,
    pub root_saves: usize,
    pub next_archive: u32,
    /// Fail the nth (0-based) root save with a rejection.
    pub fail_root_save: Option<usize>,
    pub fail_writes: bool,
    pub before_write: Option<WriteHook>,
}

impl FakeState {
    pub fn root_update_id(&self) -> String {
        format!("r{}", self.root_version)
    }

    /// Replaces the root archive the way another device's save would.
    pub fn replace_root(&mut self, root: Archive) {
        self.root = root;
        self.root_version += 1;
    }
}

/// In-memory [`RemoteSyncClient`] with compare-and-swap on update ids.
///
/// The root archive is kept decoded; child archive contents are stored as
/// the encrypted envelopes the session produced.
#[derive(Default)]
pub struct FakeRemote {
    pub state: Mutex<FakeState>,
}

impl FakeRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A remote whose root archive already holds `root`.
    pub fn with_root(root: Archive) -> Arc<Self> {
        let remote = Self::default();
        remote.state.lock().unwrap().root = root;
        Arc::new(remote)
    }

    /// Seeds a stored archive and its credentials in the root archive.
    pub fn seed_archive(&self, archive_id: &str, archive: &Archive, password: &str, update_id: &str) {
        let content = test_codec()
            .encode(archive, &Credentials::from_password(password))
            .unwrap();
        let mut state = self.state.lock().unwrap();
        state
            .root
            .group_or_create(ARCHIVES_GROUP)
            .create_entry(archive_id)
            .set_property(PASSWORD_PROPERTY, password);
        state.archives.insert(
            archive_id.to_string(),
            StoredArchive {
                content,
                update_id: update_id.to_string(),
            },
        );
    }

    pub fn root(&self) -> Archive {
        self.state.lock().unwrap().root.clone()
    }

    pub fn writes(&self) -> Vec<WriteRequest> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn stored(&self, archive_id: &str) -> Option<StoredArchive> {
        self.state.lock().unwrap().archives.get(archive_id).cloned()
    }

    pub fn placeholder_count(&self) -> usize {
        count_titled(&self.root(), NEW_ARCHIVE_PLACEHOLDER)
    }
}

/// Number of entries in the archives group titled `title`.
pub fn count_titled(root: &Archive, title: &str) -> usize {
    root.find_groups_by_title(ARCHIVES_GROUP)
        .first()
        .map(|g| g.find_entries_by_property(TITLE_PROPERTY, title).len())
        .unwrap_or(0)
}

impl RemoteSyncClient for FakeRemote {
    fn update_digest<'a>(
        &'a self,
        _token: &'a str,
        _master: &'a Credentials,
    ) -> RemoteFuture<'a, Digest> {
        self.state.lock().unwrap().digest_calls += 1;
        Box::pin(ready(Ok(Digest {
            root_archive_id: ROOT_ID.to_string(),
            personal_org_id: ORG_ID.to_string(),
        })))
    }

    fn fetch_archive<'a>(
        &'a self,
        _token: &'a str,
        _root_archive_id: &'a str,
        archive_id: &'a str,
    ) -> RemoteFuture<'a, FetchedArchive> {
        let state = self.state.lock().unwrap();
        let result = match state.archives.get(archive_id) {
            Some(stored) => credential_password(&state.root, archive_id)
                .map(|password| FetchedArchive {
                    content: stored.content.clone(),
                    password: password.to_string(),
                    update_id: stored.update_id.clone(),
                })
                .map_err(|e| RemoteError::NotFound(e.to_string())),
            None => Err(RemoteError::NotFound(format!("archive {}", archive_id))),
        };
        Box::pin(ready(result))
    }

    fn write_archive(&self, request: WriteRequest) -> RemoteFuture<'_, WriteOutcome> {
        let mut state = self.state.lock().unwrap();
        if let Some(hook) = state.before_write.take() {
            hook(&mut state);
        }
        state.writes.push(request.clone());
        if state.fail_writes {
            return Box::pin(ready(Err(RemoteError::Rejected("write refused".into()))));
        }

        let result = if request.is_new {
            state.next_archive += 1;
            let archive_id = format!("A{}", state.next_archive);
            state.archives.insert(
                archive_id.clone(),
                StoredArchive {
                    content: request.encrypted_contents,
                    update_id: request.update_id.clone(),
                },
            );
            Ok(WriteOutcome {
                update_id: request.update_id,
                archive_id,
            })
        } else {
            let archive_id = request.archive_id.unwrap_or_default();
            match state.archives.get_mut(&archive_id) {
                None => Err(RemoteError::NotFound(archive_id)),
                Some(stored) if stored.update_id != request.update_id => Err(RemoteError::Conflict(
                    format!("expected {}, have {}", request.update_id, stored.update_id),
                )),
                Some(stored) => {
                    let next = request.new_update_id.unwrap_or_default();
                    stored.content = request.encrypted_contents;
                    stored.update_id = next.clone();
                    Ok(WriteOutcome {
                        update_id: next,
                        archive_id,
                    })
                }
            }
        };
        Box::pin(ready(result))
    }

    fn load_root_archive<'a>(
        &'a self,
        _token: &'a str,
        _root_archive_id: &'a str,
        _master: &'a Credentials,
    ) -> RemoteFuture<'a, LoadedRoot> {
        let mut state = self.state.lock().unwrap();
        state.root_loads += 1;
        Box::pin(ready(Ok(LoadedRoot {
            archive: state.root.clone(),
            update_id: state.root_update_id(),
        })))
    }

    fn save_root_archive<'a>(
        &'a self,
        _token: &'a str,
        _root_archive_id: &'a str,
        root: &'a LoadedRoot,
        _master: &'a Credentials,
    ) -> RemoteFuture<'a, String> {
        let mut state = self.state.lock().unwrap();
        let attempt = state.root_saves;
        state.root_saves += 1;
        if state.fail_root_save == Some(attempt) {
            return Box::pin(ready(Err(RemoteError::Rejected("root save refused".into()))));
        }
        let current = state.root_update_id();
        if root.update_id != current {
            return Box::pin(ready(Err(RemoteError::Conflict(format!(
                "expected {}, have {}",
                root.update_id, current
            )))));
        }
        state.replace_root(root.archive.clone());
        Box::pin(ready(Ok(state.root_update_id())))
    }
}
