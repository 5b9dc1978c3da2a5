// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Archive document model.
//!
//! An archive is a tree of titled groups, each holding entries that are
//! bags of string properties. The entry title is stored as the `title`
//! property so that title lookups and property lookups share one path.
//!
//! The same type backs both child archives and the per-account root
//! archive; nothing here knows which role an archive plays.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Property holding an entry's title.
pub const TITLE_PROPERTY: &str = "title";

/// Property holding an entry's password.
pub const PASSWORD_PROPERTY: &str = "password";

/// A credential vault document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// A titled collection of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// A single record made of key-value properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Archive {
    /// Creates an empty archive.
    pub fn new() -> Self {
        Archive::default()
    }

    /// Returns every group with the given title, in insertion order.
    pub fn find_groups_by_title(&self, title: &str) -> Vec<&Group> {
        self.groups.iter().filter(|g| g.title == title).collect()
    }

    /// Returns the first group with the given title for mutation.
    pub fn find_group_mut(&mut self, title: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.title == title)
    }

    /// Appends a new, empty group and returns it.
    pub fn create_group(&mut self, title: impl Into<String>) -> &mut Group {
        let index = self.groups.len();
        self.groups.push(Group {
            id: new_id(),
            title: title.into(),
            entries: Vec::new(),
        });
        &mut self.groups[index]
    }

    /// Returns the group with the given title, creating it if absent.
    pub fn group_or_create(&mut self, title: &str) -> &mut Group {
        match self.groups.iter().position(|g| g.title == title) {
            Some(index) => &mut self.groups[index],
            None => self.create_group(title),
        }
    }

    /// Total number of entries across all groups.
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }
}

impl Group {
    /// Returns entries whose property `name` equals `value`.
    pub fn find_entries_by_property(&self, name: &str, value: &str) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|e| e.property(name) == Some(value))
            .collect()
    }

    /// Mutable variant of [`Group::find_entries_by_property`].
    pub fn find_entries_by_property_mut(&mut self, name: &str, value: &str) -> Vec<&mut Entry> {
        self.entries
            .iter_mut()
            .filter(|e| e.property(name) == Some(value))
            .collect()
    }

    /// Appends a new entry with the given title and returns it.
    pub fn create_entry(&mut self, title: impl Into<String>) -> &mut Entry {
        let index = self.entries.len();
        let mut entry = Entry {
            id: new_id(),
            properties: BTreeMap::new(),
        };
        entry.set_property(TITLE_PROPERTY, title);
        self.entries.push(entry);
        &mut self.entries[index]
    }

    /// Deletes every entry whose property `name` equals `value`.
    ///
    /// Returns the number of entries removed.
    pub fn delete_entries_by_property(&mut self, name: &str, value: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.property(name) != Some(value));
        before - self.entries.len()
    }
}

impl Entry {
    /// Returns the value of a property, if set.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Sets (or overwrites) a property.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// The entry title, or an empty string when unset.
    pub fn title(&self) -> &str {
        self.property(TITLE_PROPERTY).unwrap_or_default()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
