//! Typed property bindings
//!
//! This layer binds typed values to keys of a `KvStore`. It adds:
//! - `Model`: one store, its bound keys, and the default write policy
//! - `Binding<T>`: a property that always has a value, via a lazy default
//! - `NullableBinding<T>`: a property that may store an explicit null
//!
//! Values pass through a marshaling `Adapter<T>`, given per binding or found
//! in the model's `AdapterRegistry` on first use. Reads never fail because of
//! what is stored: a missing key, a null marker, or a payload the adapter
//! cannot parse all resolve to the binding's default.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use typedpref_binding::{Model, ModelOptions};
//! use typedpref_stores::InMemoryStore;
//!
//! let model = Model::new(Arc::new(InMemoryStore::new()), ModelOptions::new("settings"));
//!
//! let title = model.bind::<String>("title").json().build_value("untitled".to_string()).unwrap();
//! let note = model.bind::<String>("note").json().nullable().unwrap();
//!
//! assert_eq!(title.get().unwrap(), "untitled");
//! title.set(&"Hello".to_string()).unwrap();
//! assert_eq!(title.get().unwrap(), "Hello");
//!
//! note.set(None).unwrap();
//! assert_eq!(note.get().unwrap(), None);
//! ```

mod binding;
mod builder;
mod error;
mod model;
mod nullable;
mod property;

pub use binding::Binding;
pub use builder::BindingBuilder;
pub use error::Error;
pub use model::{Model, ModelOptions};
pub use nullable::NullableBinding;

// Re-export the layers below for convenience
pub use typedpref_adapter::{Adapter, AdapterError, AdapterRegistry, JsonAdapter, NULL_MARKER};
pub use typedpref_kv_store::{Edit, KvStore, KvStoreExt, WritePolicy};
