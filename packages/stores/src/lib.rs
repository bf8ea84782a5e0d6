pub mod in_memory;
pub mod json_file;

pub use typedpref_kv_store::{Batch, Change, Error, KvStore, KvStoreExt, WritePolicy};

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;
