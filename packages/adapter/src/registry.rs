//! Per-type adapter lookup.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Adapter, JsonAdapter};

/// A set of adapters, at most one per value type.
///
/// Build it once at startup, then share it (`Arc<AdapterRegistry>`) with the
/// models whose bindings should find their adapters here.
///
/// # Example
///
/// ```rust
/// use typedpref_adapter::AdapterRegistry;
///
/// let mut registry = AdapterRegistry::new();
/// registry.register_json::<Vec<String>>();
///
/// assert!(registry.contains::<Vec<String>>());
/// assert!(registry.get::<u32>().is_none());
/// ```
#[derive(Default)]
pub struct AdapterRegistry {
    // Each value is an `Arc<dyn Adapter<T>>` for the `T` named by its key.
    adapters: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the adapter for `T`, replacing any previous one.
    pub fn register<T: 'static>(&mut self, adapter: impl Adapter<T> + 'static) -> &mut Self {
        let adapter: Arc<dyn Adapter<T>> = Arc::new(adapter);
        self.adapters.insert(TypeId::of::<T>(), Box::new(adapter));
        self
    }

    /// Register a [`JsonAdapter`] for `T`.
    pub fn register_json<T>(&mut self) -> &mut Self
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        self.register::<T>(JsonAdapter::<T>::new())
    }

    /// Look up the adapter for `T`.
    pub fn get<T: 'static>(&self) -> Option<Arc<dyn Adapter<T>>> {
        self.adapters
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Arc<dyn Adapter<T>>>())
            .cloned()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.adapters.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.adapters.len())
            .finish()
    }
}
