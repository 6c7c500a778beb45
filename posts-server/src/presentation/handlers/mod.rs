use actix_web::web;

pub mod health;
pub mod post;

/// Registers every route of the service.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(post::list_posts)
        .service(post::create_post)
        .service(post::update_post)
        .service(post::delete_post);
}
