use anyhow::Context;
use posts_server::application::post_service::PostService;
use posts_server::infrastructure::config::AppConfig;
use posts_server::infrastructure::database::connect_store;
use posts_server::infrastructure::logging::init_logging;
use posts_server::server::start_rest_server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let repo = connect_store(&config).await?;

    let post_service =
        PostService::new(repo.clone()).with_touch_updated_at(config.touch_updated_at);

    let served = start_rest_server(&config, post_service).await;
    repo.close().await;
    served
}
