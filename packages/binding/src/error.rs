//! Error types for bindings.

use typedpref_adapter::AdapterError;

/// Errors surfaced by models and bindings.
///
/// Decode failures never appear here: a payload that cannot be parsed is
/// logged and the binding's default is returned instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No adapter was supplied for the binding and the model's registry has
    /// none for its type. A configuration defect; retrying will not help.
    #[error("no marshaling adapter configured for `{type_name}` (key `{key}`)")]
    AdapterMissing {
        key: String,
        type_name: &'static str,
    },

    /// The value could not be encoded. Nothing was written.
    #[error("failed to encode value for key `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: AdapterError,
    },

    /// The store failed to read or persist.
    #[error("store failure: {0}")]
    Store(#[from] typedpref_kv_store::Error),

    /// Another binding in the same model already uses this key.
    #[error("key `{key}` is already bound in model `{model}`")]
    DuplicateKey { key: String, model: String },

    /// Model options could not be parsed.
    #[error("invalid model options: {message}")]
    Config { message: String },
}
