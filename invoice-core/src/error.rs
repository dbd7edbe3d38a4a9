use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("storage unavailable for key \"{key}\": {source}")]
    StorageUnavailable {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored collection under \"{key}\" is corrupted: {reason}")]
    CorruptedStore { key: String, reason: String },

    #[error("collection under \"{key}\" kept changing during the write; try again")]
    Conflict { key: String },

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid numeric input for {field}: {input:?}")]
    InvalidNumericInput { field: String, input: String },
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, InvoiceError>;
