use thiserror::Error;

/// Raised by the ingestor for a single candidate. Never aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{name} is {size} bytes, over the {limit} byte limit")]
    SizeExceeded { name: String, size: u64, limit: u64 },
}

impl ValidationError {
    pub fn file_name(&self) -> &str {
        match self {
            Self::SizeExceeded { name, .. } => name,
        }
    }
}

/// Terminal for the task that raised it, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transfer failed: {0}")]
    Failed(String),
    #[error("upload driver stopped before reporting an outcome")]
    DriverExited,
}

/// Swallowed by the manager: a failed preview just means no preview.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("failed to read file contents: {0}")]
    Io(#[from] std::io::Error),
    #[error("file is {size} bytes, previews are limited to {limit}")]
    TooLarge { size: u64, limit: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("no files to upload")]
    EmptyQueue,
    #[error("{pending} file(s) have not finished uploading")]
    NotReady { pending: usize },
}
