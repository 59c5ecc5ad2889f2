use super::{
    ErrorCategory, ExportError, ProfileError, RecordError, RegistryError, StorageError,
    ThresholdError,
};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Profile error: {0}")]
    ProfileError(#[from] ProfileError),

    #[error("Registry error: {0}")]
    RegistryError(#[from] RegistryError),

    #[error("Threshold error: {0}")]
    ThresholdError(#[from] ThresholdError),

    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Record error: {0}")]
    RecordError(#[from] RecordError),
}

impl CoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CoreError::ProfileError(e) => e.category(),
            CoreError::RegistryError(e) => e.category(),
            CoreError::ThresholdError(_) => ErrorCategory::InvalidInput,
            CoreError::ExportError(_) => ErrorCategory::Storage,
            CoreError::StorageError(_) => ErrorCategory::Storage,
            CoreError::RecordError(_) => ErrorCategory::Storage,
        }
    }
}
