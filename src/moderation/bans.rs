//! Ban set
//!
//! Presence of a name here forces the stream offline and rejects
//! sends and joins regardless of token validity, until unbanned.
//! Unbanning never reactivates a stream by itself.

use std::collections::HashSet;
use std::sync::RwLock;

/// Set of banned stream names
///
/// Sync leaf: the lock guards short, non-awaiting sections only.
#[derive(Debug, Default)]
pub struct BanSet {
    names: RwLock<HashSet<String>>,
}

impl BanSet {
    /// Create an empty ban set
    pub fn new() -> Self {
        Self::default()
    }

    /// Ban a name; returns false if it was already banned
    pub fn insert(&self, name: &str) -> bool {
        self.names
            .write()
            .expect("ban set lock poisoned")
            .insert(name.to_string())
    }

    /// Unban a name; returns false if it was not banned
    pub fn remove(&self, name: &str) -> bool {
        self.names
            .write()
            .expect("ban set lock poisoned")
            .remove(name)
    }

    /// Whether a name is banned
    pub fn contains(&self, name: &str) -> bool {
        self.names
            .read()
            .expect("ban set lock poisoned")
            .contains(name)
    }

    /// All banned names, sorted for stable admin output
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .names
            .read()
            .expect("ban set lock poisoned")
            .iter()
            .cloned()
            .collect();
        names.sort();
        names
    }
}
