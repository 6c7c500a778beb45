//! In-memory post store, used when `POSTS_STORE=memory` and by the HTTP tests.
//!
//! Records keep insertion order, which is what `list` returns. Data is lost
//! on restart.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostPatch};

#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.read().await.clone())
    }

    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let post = post.with_id(ObjectId::new());
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn update(&self, id: ObjectId, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let id = id.to_hex();
        let mut posts = self.posts.write().await;

        Ok(posts.iter_mut().find(|p| p.id == id).map(|post| {
            post.apply(patch);
            post.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> Result<Option<Post>, DomainError> {
        let id = id.to_hex();
        let mut posts = self.posts.write().await;

        Ok(posts
            .iter()
            .position(|p| p.id == id)
            .map(|idx| posts.remove(idx)))
    }
}
