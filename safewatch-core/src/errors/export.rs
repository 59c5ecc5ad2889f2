#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Failed to flush export buffer: {0}")]
    Flush(String),
}
