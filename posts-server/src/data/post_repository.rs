use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostPatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub const POSTS_COLLECTION: &str = "posts";

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Post>, DomainError>;
    async fn create(&self, post: NewPost) -> Result<Post, DomainError>;
    /// Returns the post as it is after the update, or `None` if no post has `id`.
    async fn update(&self, id: ObjectId, patch: PostPatch) -> Result<Option<Post>, DomainError>;
    /// Returns the removed post, or `None` if no post has `id`.
    async fn delete(&self, id: ObjectId) -> Result<Option<Post>, DomainError>;

    async fn close(&self) {}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PostDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    // Missing or null on documents written by other tools.
    #[serde(rename = "createdAt", default)]
    created_at: Option<bson::DateTime>,
    #[serde(
        rename = "updatedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    updated_at: Option<bson::DateTime>,
}

impl From<PostDocument> for Post {
    fn from(doc: PostDocument) -> Self {
        Post {
            id: doc.id.to_hex(),
            title: doc.title,
            content: doc.content,
            // ObjectIds embed their creation second.
            created_at: to_chrono(doc.created_at.unwrap_or_else(|| doc.id.timestamp())),
            updated_at: doc.updated_at.map(to_chrono),
        }
    }
}

fn to_bson(ts: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(ts.timestamp_millis())
}

fn to_chrono(ts: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or_default()
}

/// `$set` body for a patch. Fields sent as `null` are stored as null.
fn set_document(patch: PostPatch) -> Document {
    let mut set = Document::new();
    if let Some(title) = patch.title {
        set.insert("title", title.map_or(Bson::Null, Bson::String));
    }
    if let Some(content) = patch.content {
        set.insert("content", content.map_or(Bson::Null, Bson::String));
    }
    if let Some(created_at) = patch.created_at {
        set.insert("createdAt", to_bson(created_at));
    }
    if let Some(updated_at) = patch.updated_at {
        set.insert(
            "updatedAt",
            updated_at.map_or(Bson::Null, |ts| Bson::DateTime(to_bson(ts))),
        );
    }
    set
}

#[derive(Clone)]
pub struct MongoPostRepository {
    client: Client,
    posts: Collection<PostDocument>,
}

impl MongoPostRepository {
    /// Builds the client and checks that the server answers.
    ///
    /// An unparsable URI is fatal. An unreachable server is only logged: the
    /// driver keeps trying to reach it on every operation.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);

        match db.run_command(doc! { "ping": 1 }).await {
            Ok(_) => info!(database, "connected to MongoDB"),
            Err(e) => error!(error = %e, "MongoDB connection error"),
        }

        Ok(Self {
            posts: db.collection(POSTS_COLLECTION),
            client,
        })
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn list(&self) -> Result<Vec<Post>, DomainError> {
        let cursor = self.posts.find(doc! {}).await.map_err(|e| {
            error!("db error while fetching posts: {}", e);
            DomainError::Storage(e.to_string())
        })?;

        let docs: Vec<PostDocument> = cursor.try_collect().await.map_err(|e| {
            error!("db error while reading posts cursor: {}", e);
            DomainError::Storage(e.to_string())
        })?;

        Ok(docs.into_iter().map(Post::from).collect())
    }

    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let doc = PostDocument {
            id: ObjectId::new(),
            title: post.title,
            content: post.content,
            created_at: Some(to_bson(post.created_at)),
            updated_at: post.updated_at.map(to_bson),
        };

        self.posts.insert_one(&doc).await.map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::Storage(e.to_string())
        })?;

        Ok(Post::from(doc))
    }

    async fn update(&self, id: ObjectId, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let filter = doc! { "_id": id };

        // MongoDB refuses an empty `$set`, so a no-op update is a plain lookup.
        let result = if patch.is_empty() {
            self.posts.find_one(filter).await
        } else {
            self.posts
                .find_one_and_update(filter, doc! { "$set": set_document(patch) })
                .return_document(ReturnDocument::After)
                .await
        };

        let found = result.map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::Storage(e.to_string())
        })?;

        Ok(found.map(Post::from))
    }

    async fn delete(&self, id: ObjectId) -> Result<Option<Post>, DomainError> {
        let removed = self
            .posts
            .find_one_and_delete(doc! { "_id": id })
            .await
            .map_err(|e| {
                error!("failed to delete post {}: {}", id, e);
                DomainError::Storage(e.to_string())
            })?;

        Ok(removed.map(Post::from))
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB client closed");
    }
}
