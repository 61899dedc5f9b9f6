//! Team message repository implementation

use std::sync::Arc;
use chrono::Utc;
use tokio::sync::RwLock;
use crate::models::team_message::{Pagination, ReadReceipt, TeamMessage, TeamMessagePage, MessageType};
use crate::utils::errors::HackPortalError;
use crate::utils::helpers::{calculate_offset, generate_uuid, total_pages};

/// Fields of a message about to be stored
#[derive(Debug, Clone)]
pub struct NewTeamMessage {
    pub team_id: String,
    pub sender_id: String,
    pub text: String,
    pub message_type: MessageType,
    pub url: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TeamMessageRepository {
    messages: Arc<RwLock<Vec<TeamMessage>>>,
}

fn not_found(id: &str) -> HackPortalError {
    HackPortalError::MessageNotFound { message_id: id.to_string() }
}

impl TeamMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, message: NewTeamMessage) -> Result<TeamMessage, HackPortalError> {
        let now = Utc::now();
        let message = TeamMessage {
            id: generate_uuid(),
            team_id: message.team_id,
            sender_id: message.sender_id,
            text: message.text,
            message_type: message.message_type,
            url: message.url,
            file_url: message.file_url,
            file_name: message.file_name,
            read_by: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.messages.write().await.push(message.clone());
        Ok(message)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<TeamMessage>, HackPortalError> {
        let messages = self.messages.read().await;
        Ok(messages.iter().find(|m| m.id == id).cloned())
    }

    /// Page `page` counting back from the newest message; the page itself
    /// is returned oldest first
    pub async fn list_for_team(&self, team_id: &str, page: usize, limit: usize) -> Result<TeamMessagePage, HackPortalError> {
        let offset = calculate_offset(page, limit)
            .ok_or_else(|| HackPortalError::InvalidInput(format!("Page {} is out of range", page)))?;

        let messages = self.messages.read().await;
        // stored in insertion order, so reversing gives newest first
        let team: Vec<&TeamMessage> = messages.iter().rev().filter(|m| m.team_id == team_id).collect();
        let total = team.len();
        let pages = total_pages(total, limit);

        let mut page_messages: Vec<TeamMessage> = team.into_iter().skip(offset).take(limit).cloned().collect();
        page_messages.reverse();

        Ok(TeamMessagePage {
            messages: page_messages,
            pagination: Pagination {
                current_page: page,
                total_pages: pages,
                total_messages: total,
                has_next_page: page < pages,
                has_prev_page: page > 1,
            },
        })
    }

    /// Record a read receipt once per user
    pub async fn mark_read(&self, id: &str, user_id: &str) -> Result<TeamMessage, HackPortalError> {
        let mut messages = self.messages.write().await;
        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found(id))?;

        if !message.is_read_by(user_id) {
            message.read_by.push(ReadReceipt {
                user_id: user_id.to_string(),
                read_at: Utc::now(),
            });
        }
        Ok(message.clone())
    }

    /// Messages in a team the user neither sent nor read
    pub async fn unread_count(&self, team_id: &str, user_id: &str) -> Result<usize, HackPortalError> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .filter(|m| m.team_id == team_id && m.sender_id != user_id && !m.is_read_by(user_id))
            .count())
    }
}
