//! In-memory entry store.
//!
//! The store is an owned value: every browsing session builds its own from
//! the seed, so sessions never observe each other's votes. Mutation is
//! limited to vote increments (see [`crate::votes`]) and explicit promotion
//! of generated entries.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::types::{Entry, MAX_CATEGORIES};

/// Errors raised while building or extending the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate entry id: {0}")]
    DuplicateEntry(String),

    #[error("duplicate community definition id {definition_id} in entry {entry_id}")]
    DuplicateDefinition {
        entry_id: String,
        definition_id: String,
    },

    #[error("entry {entry_id} has {count} categories, expected 1 to {max}")]
    CategoryCount {
        entry_id: String,
        count: usize,
        max: usize,
    },
}

/// Ordered collection of entries with an id index.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl EntryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from entries, preserving their order.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for entry in entries {
            store.insert(entry)?;
        }
        Ok(store)
    }

    /// Append an entry after validating its invariants.
    pub fn insert(&mut self, entry: Entry) -> Result<(), StoreError> {
        validate(&entry)?;
        if self.index.contains_key(&entry.id) {
            return Err(StoreError::DuplicateEntry(entry.id));
        }
        self.index.insert(entry.id.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Add a generated entry to the shared pool.
    ///
    /// Generated entries are display-only unless promoted here. Any attached
    /// mention data is dropped on the way in.
    pub fn promote(&mut self, mut entry: Entry) -> Result<(), StoreError> {
        entry.in_the_wild = None;
        debug!(entry_id = %entry.id, term = %entry.term, "Promoting generated entry");
        self.insert(entry)
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Entry> {
        match self.index.get(id) {
            Some(&i) => self.entries.get_mut(i),
            None => None,
        }
    }

    /// Find an entry by headword, ignoring case.
    pub fn find_by_term(&self, term: &str) -> Option<&Entry> {
        let needle = term.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.term.to_lowercase() == needle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate(entry: &Entry) -> Result<(), StoreError> {
    let count = entry.categories.len();
    if count == 0 || count > MAX_CATEGORIES {
        return Err(StoreError::CategoryCount {
            entry_id: entry.id.clone(),
            count,
            max: MAX_CATEGORIES,
        });
    }

    let mut seen = HashSet::new();
    for def in &entry.community_definitions {
        if !seen.insert(def.id.as_str()) {
            return Err(StoreError::DuplicateDefinition {
                entry_id: entry.id.clone(),
                definition_id: def.id.clone(),
            });
        }
    }
    Ok(())
}
