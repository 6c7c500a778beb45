use crate::application::post_service::PostService;
use crate::presentation::dto::MessageResponse;
use crate::presentation::error::ApiError;
use crate::presentation::middleware::RequestId;
use crate::presentation::payload::parse_post_payload;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;

#[get("/posts")]
pub async fn list_posts(
    req: HttpRequest,
    posts: web::Data<PostService>,
) -> Result<HttpResponse, ApiError> {
    let posts = posts.list_posts().await.map_err(ApiError::fetch)?;

    info!(
        request_id = %request_id(&req),
        count = posts.len(),
        "posts retrieved"
    );

    Ok(HttpResponse::Ok().json(posts))
}

#[post("/posts")]
pub async fn create_post(
    req: HttpRequest,
    posts: web::Data<PostService>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let payload = parse_post_payload(&req, &body).map_err(ApiError::create)?;
    let post = posts.create_post(payload).await.map_err(ApiError::create)?;

    info!(
        request_id = %request_id(&req),
        post_id = %post.id,
        "post created"
    );

    Ok(HttpResponse::Created().json(post))
}

#[put("/posts/{id}")]
pub async fn update_post(
    req: HttpRequest,
    posts: web::Data<PostService>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();
    let payload = parse_post_payload(&req, &body).map_err(ApiError::update)?;
    let post = posts
        .update_post(&post_id, payload)
        .await
        .map_err(ApiError::update)?;

    info!(
        request_id = %request_id(&req),
        post_id = %post.id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/posts/{id}")]
pub async fn delete_post(
    req: HttpRequest,
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();
    posts.delete_post(&post_id).await.map_err(ApiError::delete)?;

    info!(
        request_id = %request_id(&req),
        post_id = %post_id,
        "post deleted"
    );

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Post deleted successfully",
    }))
}

fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}
