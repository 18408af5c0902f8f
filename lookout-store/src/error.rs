//! Store error types

use lookout_client::ClientError;
use thiserror::Error;

/// Result type alias for store effects
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by store effects
///
/// Effects never retry; failures propagate to the caller unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The API call behind the effect failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The effect was called with arguments it cannot honor
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Reading or writing persisted selection failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Persisted selection could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
