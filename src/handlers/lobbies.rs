//! Lobby HTTP handlers.
//!
//! ```text
//! GET  /api/lobbies
//! POST /api/lobbies
//! GET  /api/lobbies/{id}
//! POST /api/lobbies/{id}/join
//! POST /api/lobbies/{id}/leave
//! GET  /api/users/{userId}/lobbies
//! ```

use actix_web::{web, HttpResponse};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use crate::handlers::response::{created, ok, ApiResult};
use crate::models::lobby::{CreateLobbyRequest, LobbyFilters, MembershipChange};
use crate::services::ServiceFactory;
use crate::utils::errors::HackPortalError;

/// Catalogue query string; list filters are comma separated
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    #[serde(rename = "type")]
    pub lobby_type: Option<String>,
    pub skills: Option<String>,
}

impl TryFrom<LobbyListQuery> for LobbyFilters {
    type Error = HackPortalError;

    fn try_from(query: LobbyListQuery) -> Result<Self, Self::Error> {
        Ok(LobbyFilters {
            search_term: query.search.unwrap_or_default(),
            selected_category: query.category.unwrap_or_else(|| "All".to_string()),
            selected_difficulties: parse_list(query.difficulty.as_deref(), "difficulty")?,
            selected_types: parse_list(query.lobby_type.as_deref(), "type")?,
            selected_skills: split_list(query.skills.as_deref()).map(str::to_string).collect(),
        })
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

fn parse_list<T: DeserializeOwned>(raw: Option<&str>, field: &str) -> Result<Vec<T>, HackPortalError> {
    split_list(raw)
        .map(|item| {
            serde_json::from_value(serde_json::Value::String(item.to_string()))
                .map_err(|_| HackPortalError::InvalidInput(format!("Unknown {} '{}'", field, item)))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRequest {
    #[serde(default)]
    pub user_id: String,
}

pub async fn list_lobbies(
    services: web::Data<ServiceFactory>,
    query: web::Query<LobbyListQuery>,
) -> ApiResult<HttpResponse> {
    let filters = LobbyFilters::try_from(query.into_inner())?;
    let lobbies = services.lobby_service.list_lobbies(&filters).await?;
    Ok(ok(lobbies, "Lobbies fetched successfully"))
}

pub async fn get_lobby(services: web::Data<ServiceFactory>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let lobby = services.lobby_service.get_lobby(&path).await?;
    Ok(ok(lobby, "Lobby fetched successfully"))
}

pub async fn create_lobby(
    services: web::Data<ServiceFactory>,
    payload: web::Json<CreateLobbyRequest>,
) -> ApiResult<HttpResponse> {
    let lobby = services.lobby_service.create_lobby(payload.into_inner()).await?;
    Ok(created(lobby, "Lobby created successfully"))
}

fn join_message(change: &MembershipChange) -> &'static str {
    if change.changed {
        "Joined lobby"
    } else if change.participants >= change.max_participants {
        "Lobby is full"
    } else {
        "Already a member of this lobby"
    }
}

pub async fn join_lobby(
    services: web::Data<ServiceFactory>,
    path: web::Path<String>,
    payload: web::Json<MembershipRequest>,
) -> ApiResult<HttpResponse> {
    let change = services.lobby_service.join_lobby(&path, &payload.user_id).await?;
    let message = join_message(&change);
    Ok(ok(change, message))
}

pub async fn leave_lobby(
    services: web::Data<ServiceFactory>,
    path: web::Path<String>,
    payload: web::Json<MembershipRequest>,
) -> ApiResult<HttpResponse> {
    let change = services.lobby_service.leave_lobby(&path, &payload.user_id).await?;
    let message = if change.changed { "Left lobby" } else { "Not a member of this lobby" };
    Ok(ok(change, message))
}

pub async fn user_lobbies(services: web::Data<ServiceFactory>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let lobbies = services.lobby_service.user_lobbies(&path).await?;
    Ok(ok(lobbies, "User lobbies fetched successfully"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/lobbies")
            .route("", web::get().to(list_lobbies))
            .route("", web::post().to(create_lobby))
            .route("/{id}", web::get().to(get_lobby))
            .route("/{id}/join", web::post().to(join_lobby))
            .route("/{id}/leave", web::post().to(leave_lobby)),
    )
    .route("/api/users/{user_id}/lobbies", web::get().to(user_lobbies));
}
