//! Accountbook Storage Layer
//!
//! Named key-value slots holding serialized application state.
//! Every write replaces the whole slot; there are no partial writes.

mod database;
mod error;
mod memory;
mod migrations;

pub use database::Database;
pub use error::StorageError;
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StorageError>;

/// A synchronous string-to-string slot store.
///
/// Implementations must make `set_item` visible to the next `get_item`
/// on any clone of the same store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if the slot is empty.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the slot `key` with `value`.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Clear the slot `key`. Clearing an empty slot is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}
