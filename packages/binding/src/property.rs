//! The read/write plumbing shared by both binding variants.

use std::sync::{Arc, OnceLock};

use typedpref_adapter::{Adapter, AdapterRegistry};
use typedpref_kv_store::{Edit, KvStore, KvStoreExt, WritePolicy};

use crate::Error;

/// A key in a store, plus what it takes to read and write it as a `T`.
///
/// `read` yields `None` for every "no value" outcome (absent key, null
/// marker, undecodable payload); the variants decide what that means.
pub(crate) struct Property<T> {
    key: String,
    policy: WritePolicy,
    store: Arc<dyn KvStore>,
    registry: Option<Arc<AdapterRegistry>>,
    adapter: OnceLock<Arc<dyn Adapter<T>>>,
}

impl<T: 'static> Property<T> {
    pub(crate) fn new(
        key: String,
        policy: WritePolicy,
        store: Arc<dyn KvStore>,
        registry: Option<Arc<AdapterRegistry>>,
        adapter: Option<Arc<dyn Adapter<T>>>,
    ) -> Self {
        let slot = OnceLock::new();
        if let Some(adapter) = adapter {
            let _ = slot.set(adapter);
        }

        Self {
            key,
            policy,
            store,
            registry,
            adapter: slot,
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn policy(&self) -> WritePolicy {
        self.policy
    }

    /// The binding's adapter, looked up in the registry on first use.
    fn adapter(&self) -> Result<&dyn Adapter<T>, Error> {
        if let Some(adapter) = self.adapter.get() {
            return Ok(adapter.as_ref());
        }

        let found = self
            .registry
            .as_ref()
            .and_then(|registry| registry.get::<T>())
            .ok_or_else(|| Error::AdapterMissing {
                key: self.key.clone(),
                type_name: std::any::type_name::<T>(),
            })?;

        Ok(self.adapter.get_or_init(|| found).as_ref())
    }

    pub(crate) fn read(&self) -> Result<Option<T>, Error> {
        let adapter = self.adapter()?;

        let Some(payload) = self.store.get_string(&self.key)? else {
            return Ok(None);
        };

        match adapter.decode(&payload) {
            Ok(value) => Ok(value),
            Err(err) => {
                log::warn!(
                    "Stored payload for `{}` could not be decoded, using default: {}",
                    self.key,
                    err
                );
                Ok(None)
            }
        }
    }

    fn encode(&self, value: Option<&T>) -> Result<String, Error> {
        self.adapter()?
            .encode(value)
            .map_err(|source| Error::Encode {
                key: self.key.clone(),
                source,
            })
    }

    pub(crate) fn write(&self, value: Option<&T>) -> Result<(), Error> {
        let payload = self.encode(value)?;
        self.store
            .put_string(&self.key, payload)
            .flush(self.policy)?;
        Ok(())
    }

    pub(crate) fn stage(
        &self,
        edit: &mut Edit<'_, dyn KvStore>,
        value: Option<&T>,
    ) -> Result<(), Error> {
        let payload = self.encode(value)?;
        edit.put_string(&self.key, payload);
        Ok(())
    }

    pub(crate) fn remove(&self) -> Result<(), Error> {
        let mut edit = self.store.edit();
        edit.remove(&self.key);
        edit.flush(self.policy)?;
        Ok(())
    }

    pub(crate) fn is_set(&self) -> Result<bool, Error> {
        Ok(self.store.contains(&self.key)?)
    }
}
