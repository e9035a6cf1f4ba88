use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum BackendError {
    /// Transport-level failure; no usable response was received.
    #[error("Request error: {0}")]
    Request(String),

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Serde error: {0}")]
    Serde(String),

    /// The backend rejected the request with an explicit `{"error": ...}` body.
    #[error("{0}")]
    Rejected(String),
}
