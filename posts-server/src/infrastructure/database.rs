use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::data::memory_repository::InMemoryPostRepository;
use crate::data::post_repository::{MongoPostRepository, PostRepository};
use crate::infrastructure::config::{AppConfig, StoreBackend};

/// Opens the post store selected by the configuration.
pub async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn PostRepository>> {
    match config.store {
        StoreBackend::Mongo => {
            let repo = MongoPostRepository::connect(&config.mongodb_uri, &config.database_name)
                .await
                .with_context(|| format!("invalid MongoDB URI {}", config.mongodb_uri))?;
            Ok(Arc::new(repo))
        }
        StoreBackend::Memory => {
            info!("using in-memory post store");
            Ok(Arc::new(InMemoryPostRepository::new()))
        }
    }
}
