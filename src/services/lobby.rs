//! Lobby service implementation
//!
//! Catalogue browsing plus join/leave with capacity rules.

use tracing::{debug, info};
use crate::database::repositories::LobbyRepository;
use crate::models::lobby::{Lobby, LobbyFilters, CreateLobbyRequest, MembershipChange};
use crate::utils::errors::{HackPortalError, Result};
use crate::utils::logging::log_lobby_action;

#[derive(Debug, Clone)]
pub struct LobbyService {
    lobby_repository: LobbyRepository,
}

impl LobbyService {
    pub fn new(lobby_repository: LobbyRepository) -> Self {
        Self { lobby_repository }
    }

    pub async fn list_lobbies(&self, filters: &LobbyFilters) -> Result<Vec<Lobby>> {
        debug!(search = %filters.search_term, category = %filters.selected_category, "Listing lobbies");
        self.lobby_repository.list(filters).await
    }

    pub async fn get_lobby(&self, lobby_id: &str) -> Result<Lobby> {
        self.lobby_repository
            .find_by_id(lobby_id)
            .await?
            .ok_or_else(|| HackPortalError::LobbyNotFound { lobby_id: lobby_id.to_string() })
    }

    /// Create a lobby after basic sanity checks
    pub async fn create_lobby(&self, request: CreateLobbyRequest) -> Result<Lobby> {
        if request.title.trim().is_empty() {
            return Err(HackPortalError::InvalidInput("Lobby title is required".to_string()));
        }
        if request.max_participants == 0 {
            return Err(HackPortalError::InvalidInput(
                "maxParticipants must be greater than zero".to_string(),
            ));
        }

        let lobby = self.lobby_repository.create(request).await?;
        info!(lobby_id = %lobby.id, title = %lobby.title, "Lobby created");
        Ok(lobby)
    }

    /// Join a lobby; a full lobby or a repeat join leaves the count unchanged
    pub async fn join_lobby(&self, lobby_id: &str, user_id: &str) -> Result<MembershipChange> {
        require_user(user_id)?;
        let change = self.lobby_repository.join(lobby_id, user_id).await?;
        if change.changed {
            log_lobby_action(lobby_id, "join", user_id, change.participants);
        } else {
            debug!(lobby_id = lobby_id, user_id = user_id, "Join left lobby unchanged");
        }
        Ok(change)
    }

    /// Leave a lobby; the count never drops below zero
    pub async fn leave_lobby(&self, lobby_id: &str, user_id: &str) -> Result<MembershipChange> {
        require_user(user_id)?;
        let change = self.lobby_repository.leave(lobby_id, user_id).await?;
        if change.changed {
            log_lobby_action(lobby_id, "leave", user_id, change.participants);
        }
        Ok(change)
    }

    pub async fn user_lobbies(&self, user_id: &str) -> Result<Vec<Lobby>> {
        self.lobby_repository.user_lobbies(user_id).await
    }
}

fn require_user(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(HackPortalError::InvalidInput("userId is required".to_string()));
    }
    Ok(())
}
