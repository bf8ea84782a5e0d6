//! typedpref KV store: the persistence layer
//!
//! This is the bottom of the typedpref stack. Everything at this level is a
//! plain string payload stored under a string key - no types, no codecs.
//!
//! - `KvStore`: get payloads, commit or apply batches of changes
//! - `Edit`: a write handle that collects changes and flushes them once
//! - `WritePolicy`: Immediate (durable on return) or Deferred (durable later)
//!
//! # Example
//!
//! ```rust
//! use typedpref_kv_store::{Batch, Error, KvStore, KvStoreExt, WritePolicy};
//! use std::collections::BTreeMap;
//! use std::sync::RwLock;
//!
//! #[derive(Default)]
//! struct MapStore {
//!     data: RwLock<BTreeMap<String, String>>,
//! }
//!
//! impl KvStore for MapStore {
//!     fn get_string(&self, key: &str) -> Result<Option<String>, Error> {
//!         let data = self.data.read().map_err(|_| Error::Poisoned)?;
//!         Ok(data.get(key).cloned())
//!     }
//!
//!     fn keys(&self) -> Result<Vec<String>, Error> {
//!         let data = self.data.read().map_err(|_| Error::Poisoned)?;
//!         Ok(data.keys().cloned().collect())
//!     }
//!
//!     fn commit(&self, batch: Batch) -> Result<(), Error> {
//!         let mut data = self.data.write().map_err(|_| Error::Poisoned)?;
//!         batch.apply_to(&mut data);
//!         Ok(())
//!     }
//!
//!     fn apply(&self, batch: Batch) -> Result<(), Error> {
//!         self.commit(batch)
//!     }
//! }
//!
//! let store = MapStore::default();
//! store.put_string("greeting", "\"hi\"").flush(WritePolicy::Immediate).unwrap();
//! assert_eq!(store.get_string("greeting").unwrap().as_deref(), Some("\"hi\""));
//! ```

mod batch;
mod error;
mod policy;
mod traits;

pub use batch::{Batch, Change};
pub use error::Error;
pub use policy::WritePolicy;
pub use traits::{Edit, KvStore, KvStoreExt};
