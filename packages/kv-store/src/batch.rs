//! Batches of pending changes.

use std::collections::BTreeMap;

/// A single change to a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
    /// Replace whatever is stored at `key` with `value`.
    Put { key: String, value: String },

    /// Delete `key`.
    Remove { key: String },

    /// Delete every key.
    Clear,
}

/// An ordered list of changes, flushed to a store as one unit.
///
/// Changes are applied in the order they were added, so a `Clear` followed
/// by a `Put` leaves exactly one key behind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Batch {
    changes: Vec<Change>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Apply every change, in order, to a map of payloads.
    pub fn apply_to(&self, entries: &mut BTreeMap<String, String>) {
        for change in &self.changes {
            match change {
                Change::Put { key, value } => {
                    entries.insert(key.clone(), value.clone());
                }
                Change::Remove { key } => {
                    entries.remove(key);
                }
                Change::Clear => entries.clear(),
            }
        }
    }
}

impl IntoIterator for Batch {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}
