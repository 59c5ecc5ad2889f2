pub mod core_error;
pub mod export;
pub mod profile;
pub mod registry;
pub mod storage;
pub mod threshold;

pub use core_error::CoreError;
pub use export::ExportError;
pub use profile::ProfileError;
pub use registry::RegistryError;
pub use storage::{RecordError, StorageError};
pub use threshold::ThresholdError;

/// Coarse classification used by callers to decide how to report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The referenced record does not exist
    NotFound,
    /// The input was rejected, nothing was mutated
    InvalidInput,
    /// The operation is not allowed on this record
    Forbidden,
    /// The storage backend failed
    Storage,
}
