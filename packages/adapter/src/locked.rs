//! Mutex-serialized adapters for implementations with mutable state.

use std::sync::Mutex;

use crate::{Adapter, AdapterError};

/// An adapter that needs exclusive access while it works.
///
/// Implement this instead of [`Adapter`] when encoding or decoding mutates
/// internal state, such as a reusable output buffer. Wrap the result in
/// [`Locked`] to share it between bindings and threads.
pub trait StatefulAdapter<T>: Send {
    fn encode(&mut self, value: Option<&T>) -> Result<String, AdapterError>;

    fn decode(&mut self, payload: &str) -> Result<Option<T>, AdapterError>;
}

/// Serializes every call to a [`StatefulAdapter`] through a mutex.
///
/// # Example
///
/// ```rust
/// use typedpref_adapter::{Adapter, AdapterError, Locked, StatefulAdapter, NULL_MARKER};
///
/// struct Shouting {
///     buffer: String,
/// }
///
/// impl StatefulAdapter<String> for Shouting {
///     fn encode(&mut self, value: Option<&String>) -> Result<String, AdapterError> {
///         self.buffer.clear();
///         match value {
///             Some(v) => self.buffer.push_str(&v.to_uppercase()),
///             None => self.buffer.push_str(NULL_MARKER),
///         }
///         Ok(self.buffer.clone())
///     }
///
///     fn decode(&mut self, payload: &str) -> Result<Option<String>, AdapterError> {
///         Ok((payload != NULL_MARKER).then(|| payload.to_lowercase()))
///     }
/// }
///
/// let adapter = Locked::new(Shouting { buffer: String::new() });
/// assert_eq!(adapter.encode(Some(&"hey".to_string())).unwrap(), "HEY");
/// ```
#[derive(Debug, Default)]
pub struct Locked<A> {
    inner: Mutex<A>,
}

impl<A> Locked<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            inner: Mutex::new(adapter),
        }
    }

    /// Unwrap the inner adapter.
    pub fn into_inner(self) -> Result<A, AdapterError> {
        self.inner.into_inner().map_err(|_| AdapterError::Poisoned)
    }
}

impl<T, A> Adapter<T> for Locked<A>
where
    A: StatefulAdapter<T>,
{
    fn encode(&self, value: Option<&T>) -> Result<String, AdapterError> {
        let mut adapter = self.inner.lock().map_err(|_| AdapterError::Poisoned)?;
        adapter.encode(value)
    }

    fn decode(&self, payload: &str) -> Result<Option<T>, AdapterError> {
        let mut adapter = self.inner.lock().map_err(|_| AdapterError::Poisoned)?;
        adapter.decode(payload)
    }
}
