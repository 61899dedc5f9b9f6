//! Team chat service implementation
//!
//! Messages posted inside a team, paged history and read receipts.

use tracing::{debug, info};
use crate::database::repositories::{NewTeamMessage, TeamMessageRepository};
use crate::models::team_message::{
    CreateTeamMessageRequest, MessageType, TeamMessage, TeamMessagePage, TeamMessageQuery, MAX_MESSAGE_LENGTH,
};
use crate::models::registration::MAX_PAGE_LIMIT;
use crate::utils::errors::{HackPortalError, Result};

#[derive(Debug, Clone)]
pub struct TeamChatService {
    message_repository: TeamMessageRepository,
}

impl TeamChatService {
    pub fn new(message_repository: TeamMessageRepository) -> Self {
        Self { message_repository }
    }

    /// Post a message to a team
    pub async fn send_message(&self, request: CreateTeamMessageRequest) -> Result<TeamMessage> {
        let (Some(team_id), Some(sender_id), Some(text)) = (
            trimmed(&request.team_id),
            trimmed(&request.sender_id),
            trimmed(&request.text),
        ) else {
            return Err(invalid("TeamId, senderId, and text are required"));
        };
        if text.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(invalid(&format!(
                "Message text cannot exceed {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }

        let url = trimmed(&request.url);
        let file_url = trimmed(&request.file_url);
        match request.message_type {
            MessageType::File if file_url.is_none() => return Err(invalid("fileUrl is required for file messages")),
            MessageType::Url if url.is_none() => return Err(invalid("url is required for url messages")),
            _ => {}
        }

        let message = self
            .message_repository
            .create(NewTeamMessage {
                team_id,
                sender_id,
                text,
                message_type: request.message_type,
                url,
                file_url,
                file_name: trimmed(&request.file_name),
            })
            .await?;

        info!(team_id = %message.team_id, message_id = %message.id, "Team message posted");
        Ok(message)
    }

    pub async fn team_messages(&self, team_id: &str, query: &TeamMessageQuery) -> Result<TeamMessagePage> {
        if team_id.trim().is_empty() {
            return Err(invalid("teamId is required"));
        }
        if query.page == 0 || query.limit == 0 {
            return Err(invalid("Page and limit must be positive numbers"));
        }

        let page = self
            .message_repository
            .list_for_team(team_id, query.page, query.limit.min(MAX_PAGE_LIMIT))
            .await?;
        debug!(team_id = team_id, page = query.page, returned = page.messages.len(), "Fetched team messages");
        Ok(page)
    }

    pub async fn get_message(&self, id: &str) -> Result<TeamMessage> {
        self.message_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| HackPortalError::MessageNotFound { message_id: id.to_string() })
    }

    pub async fn mark_read(&self, id: &str, user_id: &str) -> Result<TeamMessage> {
        if user_id.trim().is_empty() {
            return Err(invalid("userId is required"));
        }
        self.message_repository.mark_read(id, user_id.trim()).await
    }

    pub async fn unread_count(&self, team_id: &str, user_id: &str) -> Result<usize> {
        self.message_repository.unread_count(team_id, user_id).await
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn invalid(message: &str) -> HackPortalError {
    HackPortalError::InvalidInput(message.to_string())
}
