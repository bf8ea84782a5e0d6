//! Error types for the adapter layer.

/// Errors raised while marshaling a value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The value could not be turned into a payload.
    #[error("encode error: {message}")]
    Encode { message: String },

    /// The payload could not be parsed.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// A thread panicked while holding the adapter's state.
    #[error("adapter state poisoned")]
    Poisoned,
}

impl AdapterError {
    pub fn encode(message: impl Into<String>) -> Self {
        AdapterError::Encode {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        AdapterError::Decode {
            message: message.into(),
        }
    }
}
