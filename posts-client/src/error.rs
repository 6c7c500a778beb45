use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostsClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Not found")]
    NotFound,
    #[error("Server returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl PostsClientError {
    pub(crate) async fn from_http_response(resp: Response) -> Self {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        Self::from_parts(status, &text)
    }

    fn from_parts(status: StatusCode, body: &str) -> Self {
        if status == StatusCode::NOT_FOUND {
            return PostsClientError::NotFound;
        }

        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.trim().to_string());

        PostsClientError::Api { status, message }
    }
}
