//! Marshaling adapters for typedpref
//!
//! This layer converts typed values to and from the string payloads a
//! `KvStore` holds. It adds:
//! - `Adapter<T>`: the capability every binding consumes
//! - `JsonAdapter<T>`: serde_json wire format for any serde type
//! - `StatefulAdapter<T>` + `Locked<A>`: adapters with mutable state,
//!   serialized behind a mutex so they can be shared across threads
//! - `AdapterRegistry`: per-type adapter lookup
//!
//! # Example
//!
//! ```rust
//! use typedpref_adapter::{Adapter, JsonAdapter, NULL_MARKER};
//!
//! let adapter = JsonAdapter::<Vec<String>>::new();
//!
//! let payload = adapter.encode(Some(&vec!["a".to_string()])).unwrap();
//! assert_eq!(payload, r#"["a"]"#);
//!
//! assert_eq!(adapter.encode(None).unwrap(), NULL_MARKER);
//! assert_eq!(adapter.decode(NULL_MARKER).unwrap(), None);
//! ```

mod adapter;
mod error;
mod json;
mod locked;
mod registry;

pub use adapter::{is_null_marker, Adapter, NULL_MARKER};
pub use error::AdapterError;
pub use json::JsonAdapter;
pub use locked::{Locked, StatefulAdapter};
pub use registry::AdapterRegistry;
