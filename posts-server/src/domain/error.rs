use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("post not found: {0}")]
    PostNotFound(String),
    #[error("invalid post id: {0}")]
    InvalidId(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("storage error: {0}")]
    Storage(String),
}
