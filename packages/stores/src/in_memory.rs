//! In-memory store.
//!
//! Keeps two views of the data so callers can observe the difference between
//! visible and durable writes without touching the filesystem.

use std::collections::BTreeMap;
use std::sync::RwLock;

use typedpref_kv_store::{Batch, Error, KvStore};

#[derive(Default)]
struct State {
    live: BTreeMap<String, String>,
    durable: BTreeMap<String, String>,
    pending: bool,
}

/// A volatile store holding payloads in a `BTreeMap`.
///
/// `commit` updates both the live and the durable view. `apply` updates only
/// the live view and leaves the batch pending until `sync`.
///
/// # Example
///
/// ```rust
/// use typedpref_stores::{InMemoryStore, KvStore, KvStoreExt, WritePolicy};
///
/// let store = InMemoryStore::new();
///
/// store.put_string("name", "\"Alice\"").flush(WritePolicy::Deferred).unwrap();
///
/// // Visible right away...
/// assert_eq!(store.get_string("name").unwrap().as_deref(), Some("\"Alice\""));
/// // ...durable only after a sync.
/// assert!(store.has_pending().unwrap());
/// store.sync().unwrap();
/// assert!(store.durable_snapshot().unwrap().contains_key("name"));
/// ```
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial, already durable, data.
    pub fn with_data(data: BTreeMap<String, String>) -> Self {
        Self {
            state: RwLock::new(State {
                live: data.clone(),
                durable: data,
                pending: false,
            }),
        }
    }

    /// Make every applied batch durable.
    pub fn sync(&self) -> Result<(), Error> {
        let mut state = self.state.write().map_err(|_| Error::Poisoned)?;
        if state.pending {
            state.durable = state.live.clone();
            state.pending = false;
        }
        Ok(())
    }

    /// Whether applied batches are waiting for a sync.
    pub fn has_pending(&self) -> Result<bool, Error> {
        let state = self.state.read().map_err(|_| Error::Poisoned)?;
        Ok(state.pending)
    }

    /// Copy of the data as it would survive a crash right now.
    pub fn durable_snapshot(&self) -> Result<BTreeMap<String, String>, Error> {
        let state = self.state.read().map_err(|_| Error::Poisoned)?;
        Ok(state.durable.clone())
    }
}

impl KvStore for InMemoryStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, Error> {
        let state = self.state.read().map_err(|_| Error::Poisoned)?;
        Ok(state.live.get(key).cloned())
    }

    fn contains(&self, key: &str) -> Result<bool, Error> {
        let state = self.state.read().map_err(|_| Error::Poisoned)?;
        Ok(state.live.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, Error> {
        let state = self.state.read().map_err(|_| Error::Poisoned)?;
        Ok(state.live.keys().cloned().collect())
    }

    fn commit(&self, batch: Batch) -> Result<(), Error> {
        let mut state = self.state.write().map_err(|_| Error::Poisoned)?;
        batch.apply_to(&mut state.live);
        // Earlier applied batches become durable along with this one.
        state.durable = state.live.clone();
        state.pending = false;
        Ok(())
    }

    fn apply(&self, batch: Batch) -> Result<(), Error> {
        let mut state = self.state.write().map_err(|_| Error::Poisoned)?;
        batch.apply_to(&mut state.live);
        state.pending = true;
        Ok(())
    }
}
