//! The adapter capability.

use std::sync::Arc;

use crate::AdapterError;

/// Payload meaning "an explicitly stored null".
///
/// Distinct from the key being absent, and distinct from an empty string.
pub const NULL_MARKER: &str = "null";

/// Check whether a payload is the null marker, ignoring surrounding whitespace.
pub fn is_null_marker(payload: &str) -> bool {
    payload.trim() == NULL_MARKER
}

/// Converts values of type `T` to and from string payloads.
///
/// Adapters are shared by every binding of their type, across threads, so
/// both methods take `&self`. An adapter with mutable internal state (a
/// reusable buffer, a writer) must serialize access itself; wrap it in
/// [`Locked`](crate::Locked) to get that for free.
///
/// # Contract
///
/// - `encode(None)` returns [`NULL_MARKER`].
/// - `decode(NULL_MARKER)` returns `Ok(None)`.
/// - `decode` of a malformed payload returns `Err(AdapterError::Decode)`.
/// - For every `v` the adapter accepts, `decode(&encode(Some(&v))?)` yields
///   `Some(v)`. Lossy adapters must say so in their documentation.
///
/// # Implementing Custom Adapters
///
/// ```rust
/// use typedpref_adapter::{is_null_marker, Adapter, AdapterError, NULL_MARKER};
///
/// struct Celsius(f32);
///
/// struct CelsiusAdapter;
///
/// impl Adapter<Celsius> for CelsiusAdapter {
///     fn encode(&self, value: Option<&Celsius>) -> Result<String, AdapterError> {
///         Ok(match value {
///             Some(c) => format!("{}C", c.0),
///             None => NULL_MARKER.to_string(),
///         })
///     }
///
///     fn decode(&self, payload: &str) -> Result<Option<Celsius>, AdapterError> {
///         if is_null_marker(payload) {
///             return Ok(None);
///         }
///         let digits = payload
///             .strip_suffix('C')
///             .ok_or_else(|| AdapterError::decode("missing unit"))?;
///         digits
///             .parse()
///             .map(|v| Some(Celsius(v)))
///             .map_err(|e: std::num::ParseFloatError| AdapterError::decode(e.to_string()))
///     }
/// }
///
/// let adapter = CelsiusAdapter;
/// assert_eq!(adapter.encode(Some(&Celsius(21.5))).unwrap(), "21.5C");
/// assert!(adapter.decode("hot").is_err());
/// ```
pub trait Adapter<T>: Send + Sync {
    /// Turn a value (or null) into a payload.
    fn encode(&self, value: Option<&T>) -> Result<String, AdapterError>;

    /// Parse a payload. The null marker yields `Ok(None)`.
    fn decode(&self, payload: &str) -> Result<Option<T>, AdapterError>;
}

// Blanket implementations for shared and boxed adapters

impl<T, A: Adapter<T> + ?Sized> Adapter<T> for Arc<A> {
    fn encode(&self, value: Option<&T>) -> Result<String, AdapterError> {
        self.as_ref().encode(value)
    }

    fn decode(&self, payload: &str) -> Result<Option<T>, AdapterError> {
        self.as_ref().decode(payload)
    }
}

impl<T, A: Adapter<T> + ?Sized> Adapter<T> for Box<A> {
    fn encode(&self, value: Option<&T>) -> Result<String, AdapterError> {
        self.as_ref().encode(value)
    }

    fn decode(&self, payload: &str) -> Result<Option<T>, AdapterError> {
        self.as_ref().decode(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_marker_detection() {
        assert!(is_null_marker("null"));
        assert!(is_null_marker("  null\n"));
        assert!(!is_null_marker(""));
        assert!(!is_null_marker("\"null\""));
        assert!(!is_null_marker("nullable"));
    }
}
