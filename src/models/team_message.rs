//! Team chat message model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Longest text a chat message may carry
pub const MAX_MESSAGE_LENGTH: usize = 1000;

/// Page size used when the client sends none
pub const DEFAULT_MESSAGE_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMessage {
    pub id: String,
    pub team_id: String,
    pub sender_id: String,
    pub text: String,
    pub message_type: MessageType,
    pub url: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub read_by: Vec<ReadReceipt>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamMessage {
    pub fn is_read_by(&self, user_id: &str) -> bool {
        self.read_by.iter().any(|r| r.user_id == user_id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    File,
    System,
    Url,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    pub user_id: String,
    pub read_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamMessageRequest {
    pub team_id: Option<String>,
    pub sender_id: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub message_type: MessageType,
    pub url: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMessageQuery {
    pub page: usize,
    pub limit: usize,
}

impl Default for TeamMessageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_MESSAGE_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_messages: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// One page of a team's history, oldest message first
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMessagePage {
    pub messages: Vec<TeamMessage>,
    pub pagination: Pagination,
}
