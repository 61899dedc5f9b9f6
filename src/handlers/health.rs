//! Liveness check

use actix_web::{web, HttpResponse};
use serde_json::json;
use crate::utils::helpers::format_timestamp;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": crate::NAME,
        "version": crate::VERSION,
        "timestamp": format_timestamp(chrono::Utc::now()),
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
