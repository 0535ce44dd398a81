//! Error types shared by the query core and its storage backends.

/// Errors surfaced by geo math, the planners and storage backends.
///
/// A missing record is not an error: lookups return `Ok(None)`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PoiError {
    /// Malformed or out-of-domain arguments (zero radius, polar latitude,
    /// empty search text, ...). Never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The index or record store failed or timed out.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl PoiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        PoiError::InvalidInput(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        PoiError::StorageUnavailable(message.into())
    }
}

impl From<elasticsearch::Error> for PoiError {
    fn from(err: elasticsearch::Error) -> Self {
        PoiError::StorageUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PoiError>;
