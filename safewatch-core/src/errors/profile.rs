use super::ErrorCategory;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile must have an email")]
    MissingEmail,

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Invalid profile import: {0}")]
    InvalidImport(String),

    #[error("Failed to serialize profiles: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ProfileError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProfileError::MissingEmail => ErrorCategory::InvalidInput,
            ProfileError::ProfileNotFound(_) => ErrorCategory::NotFound,
            ProfileError::InvalidImport(_) => ErrorCategory::InvalidInput,
            ProfileError::Serialize(_) => ErrorCategory::Storage,
        }
    }
}
