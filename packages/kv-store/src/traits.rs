//! Store traits: KvStore, plus the Edit write handle.

use std::sync::Arc;

use crate::{Batch, Change, Error, WritePolicy};

/// A string-keyed persistent store.
///
/// Payloads are opaque strings. Implementations must support concurrent
/// readers and writers from any thread, and must make every committed or
/// applied change visible to `get_string` before the call returns
/// (read-your-writes), regardless of when it becomes durable.
///
/// # Object Safety
///
/// This trait is object-safe: bindings hold an `Arc<dyn KvStore>`.
pub trait KvStore: Send + Sync {
    /// Read the payload stored at `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - Nothing is stored at `key`.
    /// * `Ok(Some(payload))` - The payload at `key`.
    /// * `Err(Error)` - The store could not be read.
    fn get_string(&self, key: &str) -> Result<Option<String>, Error>;

    /// Check whether anything is stored at `key`.
    fn contains(&self, key: &str) -> Result<bool, Error> {
        Ok(self.get_string(key)?.is_some())
    }

    /// List every key, sorted.
    fn keys(&self) -> Result<Vec<String>, Error>;

    /// Apply `batch` and block until it is durable.
    fn commit(&self, batch: Batch) -> Result<(), Error>;

    /// Apply `batch` so it is visible now, and durable eventually.
    ///
    /// Only failures that prevent the batch from becoming visible are
    /// returned. Failures of the eventual flush are reported through the
    /// store's own channel.
    fn apply(&self, batch: Batch) -> Result<(), Error>;
}

/// A write handle collecting changes for one flush.
///
/// Dropping an `Edit` without calling `flush` discards its changes.
#[must_use = "changes are discarded unless the edit is flushed"]
pub struct Edit<'a, S: KvStore + ?Sized> {
    store: &'a S,
    batch: Batch,
}

impl<'a, S: KvStore + ?Sized> Edit<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            batch: Batch::new(),
        }
    }

    /// Stage `value` at `key`, replacing any previous payload.
    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.batch.push(Change::Put {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Stage removal of `key`.
    pub fn remove(&mut self, key: impl Into<String>) -> &mut Self {
        self.batch.push(Change::Remove { key: key.into() });
        self
    }

    /// Stage removal of every key.
    pub fn clear(&mut self) -> &mut Self {
        self.batch.push(Change::Clear);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Hand the staged changes to the store.
    ///
    /// `Immediate` routes to `KvStore::commit`, `Deferred` to
    /// `KvStore::apply`. An empty edit never touches the store.
    pub fn flush(self, policy: WritePolicy) -> Result<(), Error> {
        if self.batch.is_empty() {
            return Ok(());
        }

        match policy {
            WritePolicy::Immediate => self.store.commit(self.batch),
            WritePolicy::Deferred => self.store.apply(self.batch),
        }
    }
}

/// Extension trait for opening write handles.
///
/// This trait is automatically implemented for all `KvStore` implementations,
/// including `dyn KvStore`.
pub trait KvStoreExt: KvStore {
    /// Open an empty write handle.
    fn edit(&self) -> Edit<'_, Self> {
        Edit::new(self)
    }

    /// Open a write handle with one `put` already staged.
    fn put_string(&self, key: impl Into<String>, value: impl Into<String>) -> Edit<'_, Self> {
        let mut edit = self.edit();
        edit.put_string(key, value);
        edit
    }
}

// Blanket implementation for all stores
impl<S: KvStore + ?Sized> KvStoreExt for S {}

// Blanket implementations for shared and boxed stores

impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    fn get_string(&self, key: &str) -> Result<Option<String>, Error> {
        self.as_ref().get_string(key)
    }

    fn contains(&self, key: &str) -> Result<bool, Error> {
        self.as_ref().contains(key)
    }

    fn keys(&self) -> Result<Vec<String>, Error> {
        self.as_ref().keys()
    }

    fn commit(&self, batch: Batch) -> Result<(), Error> {
        self.as_ref().commit(batch)
    }

    fn apply(&self, batch: Batch) -> Result<(), Error> {
        self.as_ref().apply(batch)
    }
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get_string(&self, key: &str) -> Result<Option<String>, Error> {
        self.as_ref().get_string(key)
    }

    fn contains(&self, key: &str) -> Result<bool, Error> {
        self.as_ref().contains(key)
    }

    fn keys(&self) -> Result<Vec<String>, Error> {
        self.as_ref().keys()
    }

    fn commit(&self, batch: Batch) -> Result<(), Error> {
        self.as_ref().commit(batch)
    }

    fn apply(&self, batch: Batch) -> Result<(), Error> {
        self.as_ref().apply(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Simple store recording which path each batch took.
    #[derive(Default)]
    struct TestStore {
        data: Mutex<BTreeMap<String, String>>,
        commits: Mutex<usize>,
        applies: Mutex<usize>,
    }

    impl KvStore for TestStore {
        fn get_string(&self, key: &str) -> Result<Option<String>, Error> {
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        fn keys(&self) -> Result<Vec<String>, Error> {
            Ok(self.data.lock().unwrap().keys().cloned().collect())
        }

        fn commit(&self, batch: Batch) -> Result<(), Error> {
            *self.commits.lock().unwrap() += 1;
            batch.apply_to(&mut self.data.lock().unwrap());
            Ok(())
        }

        fn apply(&self, batch: Batch) -> Result<(), Error> {
            *self.applies.lock().unwrap() += 1;
            batch.apply_to(&mut self.data.lock().unwrap());
            Ok(())
        }
    }

    #[test]
    fn flush_routes_by_policy() {
        let store = TestStore::default();

        store
            .put_string("a", "1")
            .flush(WritePolicy::Immediate)
            .unwrap();
        store
            .put_string("b", "2")
            .flush(WritePolicy::Deferred)
            .unwrap();

        assert_eq!(*store.commits.lock().unwrap(), 1);
        assert_eq!(*store.applies.lock().unwrap(), 1);
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn empty_edit_does_not_touch_store() {
        let store = TestStore::default();

        let edit = store.edit();
        assert!(edit.is_empty());
        edit.flush(WritePolicy::Immediate).unwrap();

        assert_eq!(*store.commits.lock().unwrap(), 0);
    }

    #[test]
    fn dropped_edit_discards_changes() {
        let store = TestStore::default();

        {
            let _edit = store.put_string("ghost", "1");
        }

        assert!(!store.contains("ghost").unwrap());
    }

    #[test]
    fn object_safety_works() {
        let store: Arc<dyn KvStore> = Arc::new(TestStore::default());

        let mut edit = store.edit();
        edit.put_string("x", "1").put_string("y", "2").remove("x");
        edit.flush(WritePolicy::Immediate).unwrap();

        assert!(!store.contains("x").unwrap());
        assert_eq!(store.get_string("y").unwrap().as_deref(), Some("2"));
    }
}
