//! Lobby model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lobby {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(rename = "type")]
    pub lobby_type: LobbyType,
    pub skills: Vec<String>,
    pub participants: u32,
    pub max_participants: u32,
    pub prize: String,
    pub duration: String,
    pub start_date: String,
    pub end_date: String,
    pub status: LobbyStatus,
    pub tags: Vec<String>,
    pub organizer: String,
    pub host: String,
    pub location: Option<String>,
    pub requirements: Vec<String>,
    pub timeline: String,
    pub featured: bool,
}

impl Lobby {
    pub fn is_full(&self) -> bool {
        self.participants >= self.max_participants
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LobbyType {
    Virtual,
    #[serde(rename = "In-Person")]
    InPerson,
    Hybrid,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LobbyStatus {
    Upcoming,
    Active,
    Completed,
}

/// Catalogue filters; empty lists and the "All" category match everything
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LobbyFilters {
    pub search_term: String,
    pub selected_category: String,
    pub selected_difficulties: Vec<Difficulty>,
    pub selected_types: Vec<LobbyType>,
    pub selected_skills: Vec<String>,
}

impl Default for LobbyFilters {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            selected_category: "All".to_string(),
            selected_difficulties: Vec::new(),
            selected_types: Vec::new(),
            selected_skills: Vec::new(),
        }
    }
}

impl LobbyFilters {
    pub fn matches(&self, lobby: &Lobby) -> bool {
        let term = self.search_term.trim().to_lowercase();
        let matches_search = term.is_empty()
            || lobby.title.to_lowercase().contains(&term)
            || lobby.description.to_lowercase().contains(&term)
            || lobby.tags.iter().any(|t| t.to_lowercase().contains(&term));

        let matches_category = self.selected_category.is_empty()
            || self.selected_category == "All"
            || lobby.category == self.selected_category;

        let matches_difficulty = self.selected_difficulties.is_empty()
            || self.selected_difficulties.contains(&lobby.difficulty);

        let matches_type = self.selected_types.is_empty()
            || self.selected_types.contains(&lobby.lobby_type);

        let matches_skills = self.selected_skills.is_empty()
            || self
                .selected_skills
                .iter()
                .any(|s| lobby.skills.iter().any(|ls| ls.eq_ignore_ascii_case(s)));

        matches_search && matches_category && matches_difficulty && matches_type && matches_skills
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLobbyRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(rename = "type")]
    pub lobby_type: LobbyType,
    #[serde(default)]
    pub skills: Vec<String>,
    pub max_participants: u32,
    #[serde(default)]
    pub prize: String,
    #[serde(default)]
    pub duration: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub organizer: String,
    pub host: String,
    pub location: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

/// Result of a join or leave request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MembershipChange {
    pub lobby_id: String,
    pub participants: u32,
    pub max_participants: u32,
    pub changed: bool,
}
