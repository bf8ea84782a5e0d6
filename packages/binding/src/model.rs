//! Models: a store, its bound keys, and model-wide defaults.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use typedpref_adapter::AdapterRegistry;
use typedpref_kv_store::{Edit, KvStore, WritePolicy};

use crate::{BindingBuilder, Error};

/// Model-wide settings.
///
/// Deserializable so a model can be configured from JSON:
///
/// ```rust
/// use typedpref_binding::ModelOptions;
/// use typedpref_kv_store::WritePolicy;
///
/// let options = ModelOptions::from_json(r#"{ "name": "settings", "commit_by_default": true }"#).unwrap();
/// assert_eq!(options.default_policy(), WritePolicy::Immediate);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Name of the model, used in diagnostics.
    pub name: String,

    /// Commit every write immediately unless a binding says otherwise.
    pub commit_by_default: bool,
}

impl ModelOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_by_default: false,
        }
    }

    pub fn commit_by_default(mut self, commit: bool) -> Self {
        self.commit_by_default = commit;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Config {
            message: e.to_string(),
        })
    }

    pub fn default_policy(&self) -> WritePolicy {
        WritePolicy::from_commit_flag(self.commit_by_default)
    }
}

/// The owner of a set of bindings over one store.
///
/// Keys are unique within a model. The model also supplies the default
/// write policy and, optionally, an adapter registry for bindings that were
/// not given an adapter of their own.
pub struct Model {
    options: ModelOptions,
    store: Arc<dyn KvStore>,
    registry: Option<Arc<AdapterRegistry>>,
    keys: Mutex<BTreeSet<String>>,
}

impl Model {
    pub fn new(store: Arc<dyn KvStore>, options: ModelOptions) -> Self {
        Self {
            options,
            store,
            registry: None,
            keys: Mutex::new(BTreeSet::new()),
        }
    }

    /// Look up adapters in `registry` for bindings without their own.
    pub fn with_registry(mut self, registry: Arc<AdapterRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn default_policy(&self) -> WritePolicy {
        self.options.default_policy()
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    pub(crate) fn registry(&self) -> Option<Arc<AdapterRegistry>> {
        self.registry.clone()
    }

    /// Start declaring a binding named `name`.
    ///
    /// The name is the store key unless the builder is given an explicit one.
    pub fn bind<T: 'static>(&self, name: impl Into<String>) -> BindingBuilder<'_, T> {
        BindingBuilder::new(self, name.into())
    }

    /// Reserve `key` for a new binding.
    pub(crate) fn claim_key(&self, key: &str) -> Result<(), Error> {
        let mut keys = self.keys.lock().map_err(|_| {
            Error::Store(typedpref_kv_store::Error::ImplementationFailure {
                message: format!("key registry of model `{}` is poisoned", self.name()),
            })
        })?;

        if !keys.insert(key.to_string()) {
            return Err(Error::DuplicateKey {
                key: key.to_string(),
                model: self.name().to_string(),
            });
        }
        Ok(())
    }

    /// Stage several writes and flush them together.
    ///
    /// The edit is flushed with the model's default policy once `f` returns
    /// `Ok`. If `f` fails, nothing is written.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use typedpref_binding::{Model, ModelOptions};
    /// use typedpref_stores::InMemoryStore;
    ///
    /// let model = Model::new(Arc::new(InMemoryStore::new()), ModelOptions::new("window"));
    /// let width = model.bind::<u32>("width").json().build(|| 800).unwrap();
    /// let height = model.bind::<u32>("height").json().build(|| 600).unwrap();
    ///
    /// model
    ///     .bulk(|edit| {
    ///         width.stage(edit, &1024)?;
    ///         height.stage(edit, &768)
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(width.get().unwrap(), 1024);
    /// assert_eq!(height.get().unwrap(), 768);
    /// ```
    pub fn bulk<F>(&self, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Edit<'_, dyn KvStore>) -> Result<(), Error>,
    {
        let mut edit = Edit::new(self.store.as_ref());
        f(&mut edit)?;
        edit.flush(self.default_policy())?;
        Ok(())
    }

    /// Delete every key in the store.
    pub fn clear(&self) -> Result<(), Error> {
        let mut edit = Edit::new(self.store.as_ref());
        edit.clear();
        edit.flush(self.default_policy())?;
        Ok(())
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("options", &self.options)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
