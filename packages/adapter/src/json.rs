//! JSON adapter implementation.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{is_null_marker, Adapter, AdapterError, NULL_MARKER};

/// An adapter that marshals any serde type as JSON.
///
/// This is the default adapter for most use cases, including generic
/// collections like `Vec<String>` or `HashMap<String, u32>`.
///
/// # Lossy values
///
/// serde_json writes non-finite floats (`NaN`, `inf`) as `null`, so they
/// read back as the null marker rather than as themselves. The same holds
/// for any value whose JSON form is `null`: `Option::None`, `()`, and unit
/// structs. A non-null binding over such a type reads its default instead.
///
/// # Example
///
/// ```rust
/// use typedpref_adapter::{Adapter, JsonAdapter};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Window {
///     width: u32,
///     height: u32,
/// }
///
/// let adapter = JsonAdapter::<Window>::new();
/// let payload = adapter.encode(Some(&Window { width: 800, height: 600 })).unwrap();
/// let decoded = adapter.decode(&payload).unwrap();
///
/// assert_eq!(decoded, Some(Window { width: 800, height: 600 }));
/// ```
pub struct JsonAdapter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonAdapter<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonAdapter<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for JsonAdapter<T> {}

impl<T> fmt::Debug for JsonAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonAdapter<{}>", std::any::type_name::<T>())
    }
}

impl<T: Serialize + DeserializeOwned> Adapter<T> for JsonAdapter<T> {
    fn encode(&self, value: Option<&T>) -> Result<String, AdapterError> {
        let Some(value) = value else {
            return Ok(NULL_MARKER.to_string());
        };

        serde_json::to_string(value).map_err(|e| AdapterError::encode(e.to_string()))
    }

    fn decode(&self, payload: &str) -> Result<Option<T>, AdapterError> {
        if is_null_marker(payload) {
            return Ok(None);
        }

        serde_json::from_str(payload)
            .map(Some)
            .map_err(|e| AdapterError::decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Content {
        title: String,
        body: String,
    }

    #[test]
    fn json_adapter_roundtrip() {
        let adapter = JsonAdapter::<Content>::new();

        let original = Content {
            title: "new title".to_string(),
            body: "this is new content".to_string(),
        };

        let payload = adapter.encode(Some(&original)).unwrap();
        let decoded = adapter.decode(&payload).unwrap();

        assert_eq!(decoded, Some(original));
    }

    #[test]
    fn generic_collections_keep_order() {
        let adapter = JsonAdapter::<Vec<String>>::new();
        let list = vec!["serde".to_string(), "generic".to_string(), "type".to_string()];

        let payload = adapter.encode(Some(&list)).unwrap();
        assert_eq!(payload, r#"["serde","generic","type"]"#);
        assert_eq!(adapter.decode(&payload).unwrap(), Some(list));
    }

    #[test]
    fn null_encodes_to_marker_not_empty_string() {
        let adapter = JsonAdapter::<Content>::new();

        let payload = adapter.encode(None).unwrap();

        assert_eq!(payload, NULL_MARKER);
        assert!(!payload.is_empty());
        assert_eq!(adapter.decode(&payload).unwrap(), None);
    }

    #[test]
    fn malformed_payload_is_decode_error() {
        let adapter = JsonAdapter::<Content>::new();

        let result = adapter.decode("{not json");
        assert!(matches!(result, Err(AdapterError::Decode { .. })));

        let result = adapter.decode("");
        assert!(matches!(result, Err(AdapterError::Decode { .. })));
    }

    #[test]
    fn wrong_shape_is_decode_error() {
        let adapter = JsonAdapter::<u32>::new();

        let result = adapter.decode("\"forty-two\"");
        assert!(matches!(result, Err(AdapterError::Decode { .. })));
    }

    #[test]
    fn non_string_map_keys_fail_to_encode() {
        let adapter = JsonAdapter::<HashMap<Vec<u8>, u32>>::new();
        let mut map = HashMap::new();
        map.insert(vec![1, 2], 3);

        let result = adapter.encode(Some(&map));
        assert!(matches!(result, Err(AdapterError::Encode { .. })));
    }

    #[test]
    fn non_finite_float_reads_back_as_null() {
        let adapter = JsonAdapter::<f64>::new();

        let payload = adapter.encode(Some(&f64::NAN)).unwrap();
        assert_eq!(adapter.decode(&payload).unwrap(), None);
    }

    #[test]
    fn values_written_as_null_read_back_as_null() {
        let adapter = JsonAdapter::<Option<u32>>::new();

        let payload = adapter.encode(Some(&None)).unwrap();
        assert_eq!(payload, NULL_MARKER);
        assert_eq!(adapter.decode(&payload).unwrap(), None);
    }

    #[test]
    fn debug_names_type() {
        let adapter = JsonAdapter::<u32>::new();
        assert_eq!(format!("{:?}", adapter), "JsonAdapter<u32>");
    }
}
