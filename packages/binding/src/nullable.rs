//! Nullable bindings.

use std::fmt;

use typedpref_kv_store::{Edit, KvStore, WritePolicy};

use crate::property::Property;
use crate::Error;

pub(crate) type NullableDefaultFn<T> = Box<dyn Fn() -> Option<T> + Send + Sync>;

/// A typed property stored under one key that may hold null.
///
/// Writing `None` stores the null marker, which is distinct from the key
/// being absent at the storage level. On read, both resolve through the
/// default provider, as does a payload the adapter cannot parse.
pub struct NullableBinding<T> {
    property: Property<T>,
    default: NullableDefaultFn<T>,
}

impl<T: 'static> NullableBinding<T> {
    pub(crate) fn new(property: Property<T>, default: NullableDefaultFn<T>) -> Self {
        Self { property, default }
    }

    pub fn key(&self) -> &str {
        self.property.key()
    }

    pub fn policy(&self) -> WritePolicy {
        self.property.policy()
    }

    /// Read the current value, falling back to the default.
    pub fn get(&self) -> Result<Option<T>, Error> {
        match self.property.read()? {
            Some(value) => Ok(Some(value)),
            None => Ok((self.default)()),
        }
    }

    /// Replace the stored value; `None` stores the null marker.
    pub fn set(&self, value: Option<&T>) -> Result<(), Error> {
        self.property.write(value)
    }

    pub fn stage(&self, edit: &mut Edit<'_, dyn KvStore>, value: Option<&T>) -> Result<(), Error> {
        self.property.stage(edit, value)
    }

    /// Delete the stored value, leaving the key absent.
    pub fn remove(&self) -> Result<(), Error> {
        self.property.remove()
    }

    pub fn is_set(&self) -> Result<bool, Error> {
        self.property.is_set()
    }
}

impl<T: 'static> fmt::Debug for NullableBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NullableBinding")
            .field("key", &self.property.key())
            .field("policy", &self.property.policy())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Model, ModelOptions};
    use std::sync::Arc;
    use typedpref_adapter::NULL_MARKER;
    use typedpref_kv_store::KvStoreExt;
    use typedpref_stores::InMemoryStore;

    fn model() -> (Arc<InMemoryStore>, Model) {
        let store = Arc::new(InMemoryStore::new());
        let model = Model::new(store.clone(), ModelOptions::new("example"));
        (store, model)
    }

    #[test]
    fn note_scenario() {
        let (store, model) = model();
        let note = model.bind::<String>("note").json().nullable().unwrap();

        assert_eq!(note.get().unwrap(), None);
        assert!(!store.contains("note").unwrap());

        note.set(None).unwrap();

        assert_eq!(note.get().unwrap(), None);
        assert_eq!(
            store.get_string("note").unwrap().as_deref(),
            Some(NULL_MARKER)
        );
    }

    #[test]
    fn value_roundtrip() {
        let (_store, model) = model();
        let note = model.bind::<String>("note").json().nullable().unwrap();

        note.set(Some(&"remember the milk".to_string())).unwrap();
        assert_eq!(note.get().unwrap().as_deref(), Some("remember the milk"));
    }

    #[test]
    fn null_and_absent_both_resolve_to_default() {
        let (store, model) = model();
        let note = model
            .bind::<String>("note")
            .json()
            .nullable_with(|| Some("fallback".to_string()))
            .unwrap();

        assert_eq!(note.get().unwrap().as_deref(), Some("fallback"));

        note.set(None).unwrap();
        assert!(note.is_set().unwrap());
        assert_eq!(note.get().unwrap().as_deref(), Some("fallback"));

        store
            .put_string("note", "not json")
            .flush(WritePolicy::Immediate)
            .unwrap();
        assert_eq!(note.get().unwrap().as_deref(), Some("fallback"));
    }

    #[test]
    fn remove_leaves_key_absent() {
        let (store, model) = model();
        let note = model.bind::<String>("note").json().nullable().unwrap();

        note.set(None).unwrap();
        note.remove().unwrap();

        assert!(store.get_string("note").unwrap().is_none());
    }
}
