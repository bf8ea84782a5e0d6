//! Non-null bindings.

use std::fmt;

use typedpref_kv_store::{Edit, KvStore, WritePolicy};

use crate::property::Property;
use crate::Error;

pub(crate) type DefaultFn<T> = Box<dyn Fn() -> T + Send + Sync>;

/// A typed property stored under one key, never empty.
///
/// Reading an absent key, a null marker, or a payload the adapter cannot
/// parse all yield a fresh value from the default provider. The default is
/// never written back.
///
/// Create one with [`Model::bind`](crate::Model::bind).
pub struct Binding<T> {
    property: Property<T>,
    default: DefaultFn<T>,
}

impl<T: 'static> Binding<T> {
    pub(crate) fn new(property: Property<T>, default: DefaultFn<T>) -> Self {
        Self { property, default }
    }

    pub fn key(&self) -> &str {
        self.property.key()
    }

    pub fn policy(&self) -> WritePolicy {
        self.property.policy()
    }

    /// Read the current value, falling back to the default.
    ///
    /// Fails only if no adapter is configured or the store cannot be read.
    pub fn get(&self) -> Result<T, Error> {
        Ok(self.property.read()?.unwrap_or_else(|| (self.default)()))
    }

    /// Replace the stored value using the binding's write policy.
    pub fn set(&self, value: &T) -> Result<(), Error> {
        self.property.write(Some(value))
    }

    /// Stage a write in a bulk edit instead of writing now.
    pub fn stage(&self, edit: &mut Edit<'_, dyn KvStore>, value: &T) -> Result<(), Error> {
        self.property.stage(edit, Some(value))
    }

    /// Delete the stored value; later reads yield the default.
    pub fn remove(&self) -> Result<(), Error> {
        self.property.remove()
    }

    /// Whether anything is stored under the key.
    pub fn is_set(&self) -> Result<bool, Error> {
        self.property.is_set()
    }
}

impl<T: 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.property.key())
            .field("policy", &self.property.policy())
            .finish()
    }
}
