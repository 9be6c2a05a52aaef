//! Storage layer
//!
//! A board persists its whole collection as one JSON value under a single
//! key. The [`KeyValueStore`] trait is the seam: [`FileStore`] keeps one
//! file per key on disk, [`MemoryStore`] keeps values in process (with an
//! optional quota, like browser storage).

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// A synchronous string key-value store
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}
