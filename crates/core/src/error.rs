use thiserror::Error;

pub type RelayResult<T> = Result<T, RelayError>;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Campaign store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Partial delivery: {written} of {expected} logs written: {reason}")]
    PartialDelivery {
        written: usize,
        expected: usize,
        reason: String,
    },

    #[error("Message suggestion error: {0}")]
    Suggestion(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
