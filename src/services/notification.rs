//! Notification service implementation
//!
//! Admin authoring of notifications and the per-user feed with read tracking.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use crate::config::settings::NotificationConfig;
use crate::database::repositories::NotificationRepository;
use crate::models::notification::{
    ActionType, CreateNotificationRequest, Notification, NotificationAction, NotificationQuery,
    UpdateNotificationRequest, UserNotification,
};
use crate::utils::errors::{HackPortalError, Result};
use crate::utils::logging::log_admin_action;

/// A user's feed together with how many entries they have not read
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFeed {
    pub notifications: Vec<UserNotification>,
    pub unread_count: usize,
}

#[derive(Debug, Clone)]
pub struct NotificationService {
    notification_repository: NotificationRepository,
    config: NotificationConfig,
}

impl NotificationService {
    pub fn new(notification_repository: NotificationRepository, config: NotificationConfig) -> Self {
        Self {
            notification_repository,
            config,
        }
    }

    /// Create a notification after checking its content and targeting
    pub async fn create_notification(&self, request: CreateNotificationRequest) -> Result<Notification> {
        Content::from(&request).validate()?;

        let notification = self
            .notification_repository
            .create(request, self.config.default_timer_ms)
            .await?;
        log_admin_action("create_notification", Some(&notification.id), Some(&notification.title));
        Ok(notification)
    }

    pub async fn get_notification(&self, id: &str) -> Result<Notification> {
        self.notification_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| HackPortalError::NotificationNotFound { notification_id: id.to_string() })
    }

    pub async fn list_notifications(&self, query: &NotificationQuery) -> Result<Vec<Notification>> {
        self.notification_repository.list(query).await
    }

    pub async fn update_notification(&self, id: &str, request: UpdateNotificationRequest) -> Result<Notification> {
        let notification = self
            .notification_repository
            .update(id, request, |merged| Content::from(merged).validate())
            .await?;
        log_admin_action("update_notification", Some(id), None);
        Ok(notification)
    }

    /// Soft delete
    pub async fn archive_notification(&self, id: &str) -> Result<Notification> {
        let notification = self.notification_repository.archive(id).await?;
        log_admin_action("archive_notification", Some(id), None);
        Ok(notification)
    }

    /// Live notifications for a user with read flags
    pub async fn user_feed(&self, user_id: &str) -> Result<UserFeed> {
        if user_id.trim().is_empty() {
            return Err(HackPortalError::InvalidInput("userId is required".to_string()));
        }

        let notifications: Vec<UserNotification> = self
            .notification_repository
            .list_for_user(user_id, Utc::now())
            .await?
            .into_iter()
            .map(|notification| {
                let read = notification.is_read_by(user_id);
                UserNotification { notification, read }
            })
            .collect();
        let unread_count = notifications.iter().filter(|n| !n.read).count();

        debug!(user_id = user_id, total = notifications.len(), unread = unread_count, "Built user feed");
        Ok(UserFeed { notifications, unread_count })
    }

    pub async fn mark_read(&self, id: &str, user_id: &str) -> Result<Notification> {
        if user_id.trim().is_empty() {
            return Err(HackPortalError::InvalidInput("userId is required".to_string()));
        }
        let notification = self.notification_repository.mark_read(id, user_id).await?;
        info!(notification_id = id, user_id = user_id, "Notification marked read");
        Ok(notification)
    }
}

/// The parts of a notification that must stay consistent on create and update
struct Content<'a> {
    title: &'a str,
    message: &'a str,
    is_broadcast: bool,
    has_recipients: bool,
    action: &'a NotificationAction,
    scheduled_for: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
}

impl Content<'_> {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.message.trim().is_empty() {
            return Err(invalid("Title and message are required"));
        }
        if !self.is_broadcast && !self.has_recipients {
            return Err(invalid("Recipients are required unless the notification is a broadcast"));
        }
        if matches!(self.action.action_type, ActionType::Redirect | ActionType::ExternalLink | ActionType::ApiCall)
            && self.action.url.as_deref().map_or(true, |u| u.trim().is_empty())
        {
            return Err(invalid("Action url is required"));
        }
        if let (Some(scheduled), Some(expires)) = (self.scheduled_for, self.expires_at) {
            if expires <= scheduled {
                return Err(invalid("expiresAt must be later than scheduledFor"));
            }
        }
        Ok(())
    }
}

impl<'a> From<&'a CreateNotificationRequest> for Content<'a> {
    fn from(request: &'a CreateNotificationRequest) -> Self {
        Self {
            title: &request.title,
            message: &request.message,
            is_broadcast: request.is_broadcast,
            has_recipients: !request.recipient_ids.is_empty(),
            action: &request.action,
            scheduled_for: request.scheduled_for,
            expires_at: request.expires_at,
        }
    }
}

impl<'a> From<&'a Notification> for Content<'a> {
    fn from(notification: &'a Notification) -> Self {
        Self {
            title: &notification.title,
            message: &notification.message,
            is_broadcast: notification.is_broadcast,
            has_recipients: !notification.recipients.is_empty(),
            action: &notification.action,
            scheduled_for: notification.scheduled_for,
            expires_at: notification.expires_at,
        }
    }
}

fn invalid(message: &str) -> HackPortalError {
    HackPortalError::InvalidInput(message.to_string())
}
