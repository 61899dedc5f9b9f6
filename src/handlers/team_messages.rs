//! Team chat HTTP handlers.
//!
//! ```text
//! POST /api/messages
//! GET  /api/messages/team/{teamId}?page=&limit=
//! GET  /api/messages/unread/{teamId}/{userId}
//! GET  /api/messages/{id}
//! POST /api/messages/{id}/read
//! ```

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use crate::handlers::response::{created, ok, ApiResult};
use crate::models::team_message::{CreateTeamMessageRequest, TeamMessageQuery};
use crate::services::ServiceFactory;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRequest {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread_count: usize,
}

pub async fn send_message(
    services: web::Data<ServiceFactory>,
    payload: web::Json<CreateTeamMessageRequest>,
) -> ApiResult<HttpResponse> {
    let message = services.team_chat_service.send_message(payload.into_inner()).await?;
    Ok(created(message, "Message created successfully"))
}

pub async fn team_messages(
    services: web::Data<ServiceFactory>,
    path: web::Path<String>,
    query: web::Query<TeamMessageQuery>,
) -> ApiResult<HttpResponse> {
    let page = services.team_chat_service.team_messages(&path, &query).await?;
    Ok(ok(page, "Messages fetched successfully"))
}

pub async fn unread_count(
    services: web::Data<ServiceFactory>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (team_id, user_id) = path.into_inner();
    let unread_count = services.team_chat_service.unread_count(&team_id, &user_id).await?;
    Ok(ok(UnreadCount { unread_count }, "Unread count fetched successfully"))
}

pub async fn get_message(services: web::Data<ServiceFactory>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let message = services.team_chat_service.get_message(&path).await?;
    Ok(ok(message, "Message fetched successfully"))
}

pub async fn mark_read(
    services: web::Data<ServiceFactory>,
    path: web::Path<String>,
    payload: web::Json<ReadRequest>,
) -> ApiResult<HttpResponse> {
    let message = services.team_chat_service.mark_read(&path, &payload.user_id).await?;
    Ok(ok(message, "Message marked as read successfully"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/messages")
            .route("", web::post().to(send_message))
            .route("/team/{team_id}", web::get().to(team_messages))
            .route("/unread/{team_id}/{user_id}", web::get().to(unread_count))
            .route("/{id}", web::get().to(get_message))
            .route("/{id}/read", web::post().to(mark_read)),
    );
}
