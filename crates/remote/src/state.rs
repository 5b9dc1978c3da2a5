// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Holds every account and archive behind one mutex so that each write's
//! compare-and-swap check and its persistence happen atomically. Changes
//! are applied to a copy of the store, which is rewritten to
//! `archives.json` and only then replaces the live store. A change that
//! cannot be persisted is not visible to later requests.

use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use vk_core::generate_update_id;
use vk_core::protocol::{ArchiveWrite, ErrorKind};

const STORE_FILE_NAME: &str = "archives.json";

/// Error type for state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("update conflict on archive {archive_id}: expected {expected}, server has {actual}")]
    Conflict {
        archive_id: String,
        expected: String,
        actual: String,
    },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StateError {
    /// Wire classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StateError::NotFound(_) => ErrorKind::NotFound,
            StateError::Conflict { .. } => ErrorKind::Conflict,
            StateError::BadRequest(_) => ErrorKind::BadRequest,
            StateError::Io(_) | StateError::Json(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for state operations.
pub type Result<T> = std::result::Result<T, StateError>;

/// Per-token account record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub root_archive_id: String,
    pub personal_org_id: String,
    #[serde(default)]
    pub archive_ids: BTreeSet<String>,
}

/// A stored archive envelope and its current version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredArchive {
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
    pub update_id: String,
    pub is_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<String>,
}

/// Result of a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedRecord {
    pub contents: Option<String>,
    pub update_id: String,
}

/// Result of an accepted write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub archive_id: String,
    pub update_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Store {
    #[serde(default)]
    accounts: HashMap<String, Account>,
    #[serde(default)]
    archives: HashMap<String, StoredArchive>,
}

/// Shared server state containing all accounts and archives.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    store: Mutex<Store>,
    /// Where the store is persisted; `None` keeps everything in memory.
    path: Option<PathBuf>,
}

impl ServerState {
    /// Opens (or creates) the store in the given data directory.
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(STORE_FILE_NAME);

        let store = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Store::default(),
            Err(e) => return Err(e.into()),
        };

        info!(
            "Loaded {} accounts, {} archives",
            store.accounts.len(),
            store.archives.len()
        );

        Ok(Self::with_store(store, Some(path)))
    }

    /// Creates a state that is never written to disk.
    pub fn in_memory() -> Self {
        Self::with_store(Store::default(), None)
    }

    fn with_store(store: Store, path: Option<PathBuf>) -> Self {
        ServerState {
            inner: Arc::new(ServerStateInner {
                store: Mutex::new(store),
                path,
            }),
        }
    }

    /// Returns the account for a token, creating it on first use.
    ///
    /// A new account gets an empty root archive slot whose first version is
    /// generated here, so the client's first root write is a plain update.
    pub async fn digest(&self, token: &str) -> Result<Account> {
        if token.is_empty() {
            return Err(StateError::BadRequest("token cannot be empty".into()));
        }

        let mut store = self.inner.store.lock().await;
        if let Some(account) = store.accounts.get(token) {
            return Ok(account.clone());
        }

        let account = Account {
            root_archive_id: new_id(),
            personal_org_id: new_id(),
            archive_ids: BTreeSet::new(),
        };
        let mut next = store.clone();
        next.archives.insert(
            account.root_archive_id.clone(),
            StoredArchive {
                owner: token.to_string(),
                contents: None,
                update_id: generate_update_id(),
                is_root: true,
                name: None,
                organisation_id: Some(account.personal_org_id.clone()),
            },
        );
        next.accounts.insert(token.to_string(), account.clone());
        self.persist(&next)?;
        *store = next;

        info!("Created account with root archive {}", account.root_archive_id);
        Ok(account)
    }

    /// Returns the contents and version of an archive owned by `token`.
    pub async fn fetch(&self, token: &str, archive_id: &str) -> Result<FetchedRecord> {
        let store = self.inner.store.lock().await;
        let archive = owned_archive(&store, token, archive_id)?;
        Ok(FetchedRecord {
            contents: archive.contents.clone(),
            update_id: archive.update_id.clone(),
        })
    }

    /// Applies a versioned write.
    ///
    /// New archives are created at the supplied `update_id`. Existing
    /// archives are only replaced when `update_id` matches the stored
    /// version, which then becomes `new_update_id`.
    pub async fn write(&self, write: ArchiveWrite) -> Result<WriteReceipt> {
        let mut store = self.inner.store.lock().await;

        let account = store
            .accounts
            .get(&write.token)
            .ok_or_else(|| StateError::NotFound("unknown account".into()))?;
        if account.root_archive_id != write.root_archive_id {
            return Err(StateError::BadRequest(format!(
                "root archive {} does not belong to this account",
                write.root_archive_id
            )));
        }
        let root_archive_id = account.root_archive_id.clone();

        let mut next = store.clone();
        let receipt = if write.is_new {
            create_archive(&mut next, write)?
        } else {
            update_archive(&mut next, &root_archive_id, write)?
        };

        self.persist(&next)?;
        *store = next;
        Ok(receipt)
    }

    /// Returns a copy of a stored archive, for inspection.
    pub async fn archive(&self, archive_id: &str) -> Option<StoredArchive> {
        let store = self.inner.store.lock().await;
        store.archives.get(archive_id).cloned()
    }

    /// Returns a copy of an account, for inspection.
    pub async fn account(&self, token: &str) -> Option<Account> {
        let store = self.inner.store.lock().await;
        store.accounts.get(token).cloned()
    }

    fn persist(&self, store: &Store) -> Result<()> {
        let Some(ref path) = self.inner.path else {
            return Ok(());
        };

        let tmp_path = path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp_path)?;
            serde_json::to_writer(&mut file, store)?;
            file.flush()?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;
        debug!("Persisted store to {}", path.display());
        Ok(())
    }
}

fn create_archive(store: &mut Store, write: ArchiveWrite) -> Result<WriteReceipt> {
    if write.is_root {
        return Err(StateError::BadRequest(
            "root archives are created with the account".into(),
        ));
    }
    if write.archive_id.is_some() {
        return Err(StateError::BadRequest(
            "new archives must not carry an archive id".into(),
        ));
    }

    let archive_id = new_id();
    store.archives.insert(
        archive_id.clone(),
        StoredArchive {
            owner: write.token.clone(),
            contents: Some(write.contents),
            update_id: write.update_id.clone(),
            is_root: false,
            name: write.name,
            organisation_id: write.organisation_id,
        },
    );
    if let Some(account) = store.accounts.get_mut(&write.token) {
        account.archive_ids.insert(archive_id.clone());
    }

    info!("Created archive {}", archive_id);
    Ok(WriteReceipt {
        archive_id,
        update_id: write.update_id,
    })
}

fn update_archive(
    store: &mut Store,
    root_archive_id: &str,
    write: ArchiveWrite,
) -> Result<WriteReceipt> {
    let archive_id = write
        .archive_id
        .ok_or_else(|| StateError::BadRequest("archive id is required".into()))?;
    let new_update_id = write
        .new_update_id
        .ok_or_else(|| StateError::BadRequest("new update id is required".into()))?;

    if write.is_root != (archive_id == root_archive_id) {
        return Err(StateError::BadRequest(format!(
            "archive {} is_root flag does not match the account",
            archive_id
        )));
    }

    let archive = match store.archives.get_mut(&archive_id) {
        Some(archive) if archive.owner == write.token => archive,
        _ => return Err(StateError::NotFound(format!("archive {}", archive_id))),
    };

    if archive.update_id != write.update_id {
        return Err(StateError::Conflict {
            archive_id,
            expected: write.update_id,
            actual: archive.update_id.clone(),
        });
    }

    archive.contents = Some(write.contents);
    archive.update_id = new_update_id.clone();
    if write.name.is_some() {
        archive.name = write.name;
    }

    debug!("Updated archive {} to {}", archive_id, new_update_id);
    Ok(WriteReceipt {
        archive_id,
        update_id: new_update_id,
    })
}

fn owned_archive<'a>(store: &'a Store, token: &str, archive_id: &str) -> Result<&'a StoredArchive> {
    match store.archives.get(archive_id) {
        Some(archive) if archive.owner == token => Ok(archive),
        _ => Err(StateError::NotFound(format!("archive {}", archive_id))),
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
