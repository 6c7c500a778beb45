use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;
use tracing::warn;

use crate::domain::error::DomainError;
use crate::presentation::dto::ErrorResponse;

/// Failure of one of the post operations, as reported to the client.
///
/// Only the fixed message reaches the response body; the underlying
/// [`DomainError`] is logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to fetch posts")]
    FetchPosts(#[source] DomainError),
    #[error("Failed to create post")]
    CreatePost(#[source] DomainError),
    #[error("Failed to update post")]
    UpdatePost(#[source] DomainError),
    #[error("Failed to delete post")]
    DeletePost(#[source] DomainError),
    #[error("Post not found")]
    NotFound(String),
}

impl ApiError {
    pub fn fetch(err: DomainError) -> Self {
        ApiError::FetchPosts(err)
    }

    pub fn create(err: DomainError) -> Self {
        ApiError::CreatePost(err)
    }

    pub fn update(err: DomainError) -> Self {
        match err {
            DomainError::PostNotFound(id) => ApiError::NotFound(id),
            other => ApiError::UpdatePost(other),
        }
    }

    pub fn delete(err: DomainError) -> Self {
        match err {
            DomainError::PostNotFound(id) => ApiError::NotFound(id),
            other => ApiError::DeletePost(other),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::CreatePost(_) | ApiError::UpdatePost(_) => StatusCode::BAD_REQUEST,
            ApiError::FetchPosts(_) | ApiError::DeletePost(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::NotFound(id) => warn!(post_id = %id, "post not found"),
            ApiError::FetchPosts(source)
            | ApiError::CreatePost(source)
            | ApiError::UpdatePost(source)
            | ApiError::DeletePost(source) => warn!(error = %source, "{}", self),
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
