use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No documents indexed yet")]
    NotIndexed,

    #[error("At least {min} files are required, received {received}")]
    TooFewFiles { received: usize, min: usize },

    #[error("At most {max} files are allowed, received {received}")]
    TooManyFiles { received: usize, max: usize },

    #[error("Unsupported file format: {}", .0.join(", "))]
    UnsupportedFormat(Vec<String>),

    #[error("At least {required} valid documents are required, only {processed} processed. Errors: {}", .errors.join(", "))]
    InsufficientDocuments {
        processed: usize,
        required: usize,
        errors: Vec<String>,
    },

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
