use actix_web::{HttpResponse, Responder, get};
use chrono::Utc;

use crate::presentation::dto::HealthResponse;

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
