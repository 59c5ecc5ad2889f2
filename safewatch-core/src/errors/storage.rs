#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage lock poisoned")]
    Poisoned,

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a `{expected}` record, found `{found}`")]
    KindMismatch { expected: String, found: String },

    #[error("Record version {0} is newer than supported")]
    UnsupportedVersion(u32),

    #[error("Migration from version {from} failed: {reason}")]
    Migration { from: u32, reason: String },
}
