//! WhatsApp gateway HTTP handlers.
//!
//! ```text
//! POST /send      (also /api/whatsapp/send)
//! POST /webhook   (also /api/whatsapp/webhook)
//! ```
//!
//! These endpoints keep the flat `{error}` body the messaging frontend
//! expects instead of the API envelope.

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::debug;
use crate::models::message::{InboundMessage, SendMessageRequest};
use crate::services::ServiceFactory;
use crate::utils::errors::HackPortalError;

/// Forward a message to the vendor
pub async fn send_message(
    services: web::Data<ServiceFactory>,
    payload: Option<web::Json<SendMessageRequest>>,
) -> HttpResponse {
    let request = payload.map(web::Json::into_inner).unwrap_or_default();

    match services
        .whatsapp_service
        .send_message(request.to.as_deref(), request.message.as_deref())
        .await
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(HackPortalError::InvalidInput(_)) => {
            HttpResponse::BadRequest().json(json!({ "error": "Missing required fields" }))
        }
        Err(_) => HttpResponse::InternalServerError().json(json!({ "error": "Failed to send message" })),
    }
}

/// Accept an inbound delivery, form-encoded or JSON, and log it
pub async fn webhook(services: web::Data<ServiceFactory>, req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let inbound = parse_inbound(&req, &body);
    services.whatsapp_service.receive(&inbound);
    HttpResponse::Ok().finish()
}

fn parse_inbound(req: &HttpRequest, body: &[u8]) -> InboundMessage {
    let is_json = req
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| value.starts_with("application/json"));

    let parsed = if is_json {
        serde_json::from_slice::<InboundMessage>(body).ok()
    } else {
        std::str::from_utf8(body)
            .ok()
            .and_then(|text| web::Query::<InboundMessage>::from_query(text).ok())
            .map(web::Query::into_inner)
    };

    parsed.unwrap_or_else(|| {
        debug!(bytes = body.len(), "Webhook payload not understood");
        InboundMessage::default()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/send", web::post().to(send_message))
        .route("/api/whatsapp/send", web::post().to(send_message))
        .route("/webhook", web::post().to(webhook))
        .route("/api/whatsapp/webhook", web::post().to(webhook));
}
