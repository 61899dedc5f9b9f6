//! Lobby repository implementation

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::models::lobby::{Lobby, LobbyFilters, LobbyStatus, CreateLobbyRequest, MembershipChange};
use crate::utils::errors::HackPortalError;
use crate::utils::helpers::generate_uuid;

#[derive(Debug, Default)]
struct LobbyStore {
    lobbies: Vec<Lobby>,
    memberships: HashMap<String, Vec<String>>,
}

impl LobbyStore {
    fn position(&self, id: &str) -> Result<usize, HackPortalError> {
        self.lobbies
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| HackPortalError::LobbyNotFound { lobby_id: id.to_string() })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LobbyRepository {
    store: Arc<RwLock<LobbyStore>>,
}

impl LobbyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new lobby
    pub async fn create(&self, request: CreateLobbyRequest) -> Result<Lobby, HackPortalError> {
        let timeline = format!("{} - {}", request.start_date, request.end_date);
        let lobby = Lobby {
            id: generate_uuid(),
            title: request.title,
            description: request.description,
            category: request.category,
            difficulty: request.difficulty,
            lobby_type: request.lobby_type,
            skills: request.skills,
            participants: 0,
            max_participants: request.max_participants,
            prize: request.prize,
            duration: request.duration,
            start_date: request.start_date,
            end_date: request.end_date,
            status: LobbyStatus::Upcoming,
            tags: request.tags,
            organizer: request.organizer,
            host: request.host,
            location: request.location,
            requirements: request.requirements,
            timeline,
            featured: request.featured,
        };

        self.insert(lobby.clone()).await?;
        Ok(lobby)
    }

    /// Insert a fully formed lobby, rejecting duplicate ids
    pub async fn insert(&self, lobby: Lobby) -> Result<(), HackPortalError> {
        let mut store = self.store.write().await;
        if store.lobbies.iter().any(|l| l.id == lobby.id) {
            return Err(HackPortalError::Duplicate(format!("Lobby {} already exists", lobby.id)));
        }
        store.lobbies.push(lobby);
        Ok(())
    }

    /// Find lobby by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Lobby>, HackPortalError> {
        let store = self.store.read().await;
        Ok(store.lobbies.iter().find(|l| l.id == id).cloned())
    }

    /// List lobbies matching the filters, in insertion order
    pub async fn list(&self, filters: &LobbyFilters) -> Result<Vec<Lobby>, HackPortalError> {
        let store = self.store.read().await;
        Ok(store.lobbies.iter().filter(|l| filters.matches(l)).cloned().collect())
    }

    /// Add a participant while the lobby has room
    pub async fn join(&self, lobby_id: &str, user_id: &str) -> Result<MembershipChange, HackPortalError> {
        let mut store = self.store.write().await;
        let index = store.position(lobby_id)?;

        let already_member = store
            .memberships
            .get(user_id)
            .map_or(false, |ids| ids.iter().any(|id| id == lobby_id));

        let lobby = &mut store.lobbies[index];
        let changed = !already_member && !lobby.is_full();
        if changed {
            lobby.participants += 1;
        }
        let change = MembershipChange {
            lobby_id: lobby.id.clone(),
            participants: lobby.participants,
            max_participants: lobby.max_participants,
            changed,
        };

        if changed {
            store
                .memberships
                .entry(user_id.to_string())
                .or_default()
                .push(lobby_id.to_string());
        }

        Ok(change)
    }

    /// Remove a participant while the count is positive
    pub async fn leave(&self, lobby_id: &str, user_id: &str) -> Result<MembershipChange, HackPortalError> {
        let mut store = self.store.write().await;
        let index = store.position(lobby_id)?;

        let is_member = store
            .memberships
            .get(user_id)
            .map_or(false, |ids| ids.iter().any(|id| id == lobby_id));

        let lobby = &mut store.lobbies[index];
        let changed = is_member && lobby.participants > 0;
        if changed {
            lobby.participants -= 1;
        }
        let change = MembershipChange {
            lobby_id: lobby.id.clone(),
            participants: lobby.participants,
            max_participants: lobby.max_participants,
            changed,
        };

        if changed {
            if let Some(ids) = store.memberships.get_mut(user_id) {
                ids.retain(|id| id != lobby_id);
            }
        }

        Ok(change)
    }

    /// Lobbies a user has joined
    pub async fn user_lobbies(&self, user_id: &str) -> Result<Vec<Lobby>, HackPortalError> {
        let store = self.store.read().await;
        let Some(ids) = store.memberships.get(user_id) else {
            return Ok(Vec::new());
        };
        Ok(ids
            .iter()
            .filter_map(|id| store.lobbies.iter().find(|l| &l.id == id).cloned())
            .collect())
    }

    /// Count lobbies
    pub async fn count(&self) -> usize {
        self.store.read().await.lobbies.len()
    }
}
