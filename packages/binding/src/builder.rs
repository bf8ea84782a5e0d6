//! Declaring bindings.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use typedpref_adapter::{Adapter, JsonAdapter};
use typedpref_kv_store::WritePolicy;

use crate::property::Property;
use crate::{Binding, Error, Model, NullableBinding};

/// Collects the optional parts of a binding before it is created.
///
/// Returned by [`Model::bind`]. Finish with [`build`](Self::build),
/// [`build_value`](Self::build_value), [`nullable`](Self::nullable) or
/// [`nullable_with`](Self::nullable_with).
///
/// ```rust
/// use std::sync::Arc;
/// use typedpref_binding::{Model, ModelOptions};
/// use typedpref_kv_store::WritePolicy;
/// use typedpref_stores::InMemoryStore;
///
/// let model = Model::new(Arc::new(InMemoryStore::new()), ModelOptions::new("app"));
///
/// let theme = model
///     .bind::<String>("theme")
///     .key("ui.theme")
///     .policy(WritePolicy::Immediate)
///     .json()
///     .build_value("light".to_string())
///     .unwrap();
///
/// assert_eq!(theme.key(), "ui.theme");
/// assert_eq!(theme.get().unwrap(), "light");
/// ```
#[must_use = "a binding is only created by one of the build methods"]
pub struct BindingBuilder<'m, T> {
    model: &'m Model,
    name: String,
    key: Option<String>,
    policy: Option<WritePolicy>,
    adapter: Option<Arc<dyn Adapter<T>>>,
}

impl<'m, T: 'static> BindingBuilder<'m, T> {
    pub(crate) fn new(model: &'m Model, name: String) -> Self {
        Self {
            model,
            name,
            key: None,
            policy: None,
            adapter: None,
        }
    }

    /// Store under `key` instead of the binding's name.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Override the model's default write policy.
    pub fn policy(mut self, policy: WritePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Override the model's default with a "commit" flag.
    pub fn commit(self, commit: bool) -> Self {
        self.policy(WritePolicy::from_commit_flag(commit))
    }

    /// Use `adapter` instead of looking one up in the model's registry.
    pub fn adapter(self, adapter: impl Adapter<T> + 'static) -> Self {
        self.shared_adapter(Arc::new(adapter))
    }

    /// Use an adapter shared with other bindings.
    pub fn shared_adapter(mut self, adapter: Arc<dyn Adapter<T>>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Marshal as JSON.
    pub fn json(self) -> Self
    where
        T: Serialize + DeserializeOwned,
    {
        self.adapter(JsonAdapter::<T>::new())
    }

    /// Create a non-null binding whose default comes from `default`.
    ///
    /// `default` runs on every read that finds no usable value.
    pub fn build<F>(self, default: F) -> Result<Binding<T>, Error>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Ok(Binding::new(self.into_property()?, Box::new(default)))
    }

    /// Create a non-null binding defaulting to a clone of `value`.
    pub fn build_value(self, value: T) -> Result<Binding<T>, Error>
    where
        T: Clone + Send + Sync,
    {
        self.build(move || value.clone())
    }

    /// Create a nullable binding defaulting to `None`.
    pub fn nullable(self) -> Result<NullableBinding<T>, Error> {
        self.nullable_with(|| None)
    }

    /// Create a nullable binding whose default comes from `default`.
    pub fn nullable_with<F>(self, default: F) -> Result<NullableBinding<T>, Error>
    where
        F: Fn() -> Option<T> + Send + Sync + 'static,
    {
        Ok(NullableBinding::new(self.into_property()?, Box::new(default)))
    }

    fn into_property(self) -> Result<Property<T>, Error> {
        let key = self.key.unwrap_or(self.name);
        let policy = self.policy.unwrap_or_else(|| self.model.default_policy());

        self.model.claim_key(&key)?;
        log::debug!(
            "Bound `{}` in model `{}` ({} writes)",
            key,
            self.model.name(),
            policy
        );

        Ok(Property::new(
            key,
            policy,
            Arc::clone(self.model.store()),
            self.model.registry(),
            self.adapter,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelOptions;
    use typedpref_adapter::{AdapterError, AdapterRegistry, NULL_MARKER};
    use typedpref_kv_store::KvStore;
    use typedpref_stores::InMemoryStore;

    fn test_model(commit: bool) -> (Arc<InMemoryStore>, Model) {
        let store = Arc::new(InMemoryStore::new());
        let options = ModelOptions::new("example").commit_by_default(commit);
        (store.clone(), Model::new(store, options))
    }

    /// Stores integers in hex.
    struct Hex;

    impl Adapter<u32> for Hex {
        fn encode(&self, value: Option<&u32>) -> Result<String, AdapterError> {
            Ok(value.map_or(NULL_MARKER.to_string(), |v| format!("{:x}", v)))
        }

        fn decode(&self, payload: &str) -> Result<Option<u32>, AdapterError> {
            if payload == NULL_MARKER {
                return Ok(None);
            }
            u32::from_str_radix(payload, 16)
                .map(Some)
                .map_err(|e| AdapterError::decode(e.to_string()))
        }
    }

    #[test]
    fn name_is_the_default_key() {
        let (_store, model) = test_model(false);
        let binding = model.bind::<u32>("count").json().build(|| 0).unwrap();
        assert_eq!(binding.key(), "count");
    }

    #[test]
    fn policy_override_beats_model_default() {
        let (_store, model) = test_model(false);

        let inherited = model.bind::<u32>("a").json().build(|| 0).unwrap();
        let immediate = model.bind::<u32>("b").commit(true).json().build(|| 0).unwrap();

        assert_eq!(inherited.policy(), WritePolicy::Deferred);
        assert_eq!(immediate.policy(), WritePolicy::Immediate);

        let (_store, model) = test_model(true);
        let deferred = model
            .bind::<u32>("c")
            .policy(WritePolicy::Deferred)
            .json()
            .build(|| 0)
            .unwrap();
        assert_eq!(deferred.policy(), WritePolicy::Deferred);
    }

    #[test]
    fn immediate_binding_commits_in_deferred_model() {
        let (store, model) = test_model(false);
        let count = model
            .bind::<u32>("count")
            .policy(WritePolicy::Immediate)
            .json()
            .build(|| 0)
            .unwrap();

        count.set(&9).unwrap();

        assert!(!store.has_pending().unwrap());
        assert_eq!(
            store.durable_snapshot().unwrap().get("count").map(String::as_str),
            Some("9")
        );
    }

    #[test]
    fn explicit_adapter_is_used() {
        let (store, model) = test_model(true);
        let count = model.bind::<u32>("count").adapter(Hex).build(|| 0).unwrap();

        count.set(&255).unwrap();

        assert_eq!(store.get_string("count").unwrap().as_deref(), Some("ff"));
        assert_eq!(count.get().unwrap(), 255);
    }

    #[test]
    fn registry_supplies_missing_adapter() {
        let mut registry = AdapterRegistry::new();
        registry.register::<u32>(Hex);

        let store = Arc::new(InMemoryStore::new());
        let model = Model::new(store.clone(), ModelOptions::new("example"))
            .with_registry(Arc::new(registry));

        let count = model.bind::<u32>("count").build(|| 0).unwrap();
        count.set(&16).unwrap();

        assert_eq!(store.get_string("count").unwrap().as_deref(), Some("10"));
    }

    #[test]
    fn explicit_adapter_beats_registry() {
        let mut registry = AdapterRegistry::new();
        registry.register::<u32>(Hex);

        let store = Arc::new(InMemoryStore::new());
        let model = Model::new(store.clone(), ModelOptions::new("example"))
            .with_registry(Arc::new(registry));

        let count = model.bind::<u32>("count").json().build(|| 0).unwrap();
        count.set(&16).unwrap();

        assert_eq!(store.get_string("count").unwrap().as_deref(), Some("16"));
    }

    #[test]
    fn registry_without_type_is_adapter_missing() {
        let store = Arc::new(InMemoryStore::new());
        let model = Model::new(store, ModelOptions::new("example"))
            .with_registry(Arc::new(AdapterRegistry::new()));

        let note = model.bind::<String>("note").nullable().unwrap();

        match note.get() {
            Err(Error::AdapterMissing { key, type_name }) => {
                assert_eq!(key, "note");
                assert!(type_name.contains("String"));
            }
            other => panic!("expected AdapterMissing, got {:?}", other),
        }
    }

    #[test]
    fn shared_adapter_serves_several_bindings() {
        let (store, model) = test_model(true);
        let hex: Arc<dyn Adapter<u32>> = Arc::new(Hex);

        let a = model
            .bind::<u32>("a")
            .shared_adapter(Arc::clone(&hex))
            .build(|| 0)
            .unwrap();
        let b = model
            .bind::<u32>("b")
            .shared_adapter(hex)
            .build(|| 0)
            .unwrap();

        a.set(&10).unwrap();
        b.set(&11).unwrap();

        assert_eq!(store.get_string("a").unwrap().as_deref(), Some("a"));
        assert_eq!(store.get_string("b").unwrap().as_deref(), Some("b"));
    }
}
