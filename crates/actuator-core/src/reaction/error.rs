use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReactionError {
    #[error("reaction failed: {0}")]
    Failed(String),

    #[error("reaction timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("reaction canceled")]
    Canceled,

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ReactionError {
    fn from(e: std::io::Error) -> Self {
        ReactionError::Io(e.to_string())
    }
}
