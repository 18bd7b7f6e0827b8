#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Too many requests, please try again later.")]
    RateLimited,

    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}
