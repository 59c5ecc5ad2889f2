mod file;
mod memory;
pub mod record;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod browser;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub use browser::BrowserStorage;
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use record::{RecordKind, CURRENT_VERSION};

use crate::errors::StorageError;

/// Key-value port every persisted component is built on.
///
/// Values are whole serialized records; there are no partial updates.
pub trait Storage {
    /// Read the value stored under `key`, `None` when absent.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
