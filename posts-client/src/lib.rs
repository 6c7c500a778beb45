//! Async HTTP client for the posts service.

mod error;
mod http_client;
mod model;

pub use error::PostsClientError;
pub use http_client::PostsClient;
pub use model::{Post, PostPatch};
