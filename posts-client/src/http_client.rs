use crate::error::PostsClientError;
use crate::model::{Post, PostPatch};
use reqwest::Client;
use serde::Deserialize;

#[derive(Clone)]
pub struct PostsClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

impl PostsClient {
    pub fn connect(endpoint: &str) -> Result<Self, PostsClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }

    fn post_url(&self, id: &str) -> String {
        format!("{}/posts/{}", self.base_url, id)
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, PostsClientError> {
        let resp = self.client.get(self.posts_url()).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(PostsClientError::from_http_response(resp).await)
        }
    }

    pub async fn create_post(&self, post: &PostPatch) -> Result<Post, PostsClientError> {
        let resp = self.client.post(self.posts_url()).json(post).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(PostsClientError::from_http_response(resp).await)
        }
    }

    pub async fn update_post(&self, id: &str, patch: &PostPatch) -> Result<Post, PostsClientError> {
        let resp = self.client.put(self.post_url(id)).json(patch).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(PostsClientError::from_http_response(resp).await)
        }
    }

    /// Returns the server's confirmation message.
    pub async fn delete_post(&self, id: &str) -> Result<String, PostsClientError> {
        let resp = self.client.delete(self.post_url(id)).send().await?;

        if resp.status().is_success() {
            let body: MessageResponse = resp.json().await?;
            Ok(body.message)
        } else {
            Err(PostsClientError::from_http_response(resp).await)
        }
    }
}
