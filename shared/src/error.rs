use thiserror::Error;

/// Failures reported by a [`crate::store::UserStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional write found the key already taken.
    #[error("user already exists")]
    AlreadyExists,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("malformed item in table: {0}")]
    Malformed(String),
}

/// Errors that escape a handler. Every variant ends up as a generic 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to serialize response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to build response: {0}")]
    Http(#[from] lambda_http::http::Error),
}
