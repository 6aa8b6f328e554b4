//! Storage facilities.
//!
//! A storage facility is a synchronous, process-wide, string-keyed map with
//! no expiry. The store treats it as opaque apart from serializing values
//! to and from JSON.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::errors::StoreResult;

/// Shared string-keyed storage, one namespace for all tenants.
pub trait StorageFacility: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String) -> StoreResult<()>;

    /// Remove `key`. Returns whether a value was present.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Every key currently present, in no particular order.
    fn keys(&self) -> Vec<String>;
}
