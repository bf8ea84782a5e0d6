//! typedpref: typed properties persisted in a string-keyed store.
//!
//! Declare a `Model` over a store, bind each property to a key with an
//! adapter and a lazy default, then read and write it as a plain value.
//!
//! ```rust
//! use std::sync::Arc;
//! use typedpref::{Model, ModelOptions, InMemoryStore};
//!
//! let model = Model::new(Arc::new(InMemoryStore::new()), ModelOptions::new("prefs"));
//! let list = model.bind::<Vec<String>>("list").json().build(Vec::new).unwrap();
//!
//! list.set(&vec!["a".to_string(), "b".to_string()]).unwrap();
//! assert_eq!(list.get().unwrap().len(), 2);
//! ```

pub use typedpref_adapter::{
    is_null_marker, Adapter, AdapterError, AdapterRegistry, JsonAdapter, Locked, StatefulAdapter,
    NULL_MARKER,
};
pub use typedpref_binding::{
    Binding, BindingBuilder, Error, Model, ModelOptions, NullableBinding,
};
pub use typedpref_kv_store::{Batch, Change, Edit, KvStore, KvStoreExt, WritePolicy};
pub use typedpref_stores::{InMemoryStore, JsonFileStore};

/// Errors raised by stores.
pub type StoreError = typedpref_kv_store::Error;
