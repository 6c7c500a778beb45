use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostPatch, parse_post_id};
use chrono::Utc;
use tracing::instrument;

#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    touch_updated_at: bool,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self {
            repo,
            touch_updated_at: false,
        }
    }

    /// When enabled, `update_post` stamps `updatedAt` with the current time
    /// unless the payload carries its own value.
    pub fn with_touch_updated_at(mut self, enabled: bool) -> Self {
        self.touch_updated_at = enabled;
        self
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.repo.list().await
    }

    #[instrument(skip(self))]
    pub async fn create_post(&self, payload: PostPatch) -> Result<Post, DomainError> {
        let post = payload.into_new_post(Utc::now());
        self.repo.create(post).await
    }

    #[instrument(skip(self))]
    pub async fn update_post(&self, id: &str, mut payload: PostPatch) -> Result<Post, DomainError> {
        let post_id = parse_post_id(id)?;

        if self.touch_updated_at && payload.updated_at.is_none() {
            payload.updated_at = Some(Some(Utc::now()));
        }

        self.repo
            .update(post_id, payload)
            .await?
            .ok_or_else(|| DomainError::PostNotFound(id.to_owned()))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: &str) -> Result<Post, DomainError> {
        let post_id = parse_post_id(id)?;

        self.repo
            .delete(post_id)
            .await?
            .ok_or_else(|| DomainError::PostNotFound(id.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory_repository::InMemoryPostRepository;
    use chrono::{Duration, TimeZone};

    fn service() -> PostService {
        PostService::new(Arc::new(InMemoryPostRepository::new()))
    }

    fn titled(title: &str) -> PostPatch {
        PostPatch {
            title: Some(Some(title.into())),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_recent_created_at() {
        let service = service();
        let before = Utc::now() - Duration::seconds(1);

        let post = service.create_post(titled("A")).await.unwrap();

        assert!(post.created_at >= before);
        assert!(post.created_at <= Utc::now());
        assert!(post.updated_at.is_none());
    }

    #[tokio::test]
    async fn create_keeps_caller_created_at() {
        let service = service();
        let ts = Utc.with_ymd_and_hms(2019, 5, 4, 3, 2, 1).unwrap();

        let post = service
            .create_post(PostPatch {
                created_at: Some(ts),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(post.created_at, ts);
    }

    #[tokio::test]
    async fn update_with_malformed_id_is_invalid() {
        let err = service()
            .update_post("nope", titled("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(id) if id == "nope"));
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let err = service()
            .delete_post("65a1f0c2e4b0a1b2c3d4e5f6")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PostNotFound(_)));
    }

    #[tokio::test]
    async fn update_leaves_updated_at_alone_by_default() {
        let service = service();
        let post = service.create_post(titled("A")).await.unwrap();

        let updated = service.update_post(&post.id, titled("B")).await.unwrap();

        assert_eq!(updated.title.as_deref(), Some("B"));
        assert!(updated.updated_at.is_none());
        assert_eq!(updated.created_at, post.created_at);
    }

    #[tokio::test]
    async fn update_touches_updated_at_when_enabled() {
        let service = service().with_touch_updated_at(true);
        let post = service.create_post(titled("A")).await.unwrap();

        let updated = service.update_post(&post.id, titled("B")).await.unwrap();
        assert!(updated.updated_at.is_some());

        let explicit = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let updated = service
            .update_post(
                &post.id,
                PostPatch {
                    updated_at: Some(Some(explicit)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.updated_at, Some(explicit));
    }
}
