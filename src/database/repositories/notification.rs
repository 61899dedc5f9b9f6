//! Notification repository implementation

use std::sync::Arc;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use crate::models::notification::{
    Notification, NotificationStatus, CreateNotificationRequest, UpdateNotificationRequest,
    NotificationQuery, Recipient,
};
use crate::utils::errors::HackPortalError;
use crate::utils::helpers::generate_uuid;

#[derive(Debug, Clone, Default)]
pub struct NotificationRepository {
    notifications: Arc<RwLock<Vec<Notification>>>,
}

fn not_found(id: &str) -> HackPortalError {
    HackPortalError::NotificationNotFound { notification_id: id.to_string() }
}

impl NotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new notification
    pub async fn create(&self, request: CreateNotificationRequest, default_timer_ms: u64) -> Result<Notification, HackPortalError> {
        let now = Utc::now();
        let notification = Notification {
            id: generate_uuid(),
            title: request.title.trim().to_string(),
            message: request.message.trim().to_string(),
            description: request.description.map(|d| d.trim().to_string()),
            status: NotificationStatus::Active,
            notification_type: request.notification_type,
            position: request.position,
            priority: request.priority,
            duration: request
                .duration
                .unwrap_or(crate::models::NotificationDuration::Fixed { timer: default_timer_ms }),
            action: request.action,
            is_broadcast: request.is_broadcast,
            sender: request.sender,
            recipients: request.recipient_ids.into_iter().map(Recipient::unread).collect(),
            expires_at: request.expires_at,
            scheduled_for: request.scheduled_for,
            deleted: false,
            deleted_at: None,
            metadata: request.metadata,
            created_at: now,
            updated_at: now,
        };

        self.notifications.write().await.push(notification.clone());
        Ok(notification)
    }

    /// Find notification by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Notification>, HackPortalError> {
        let notifications = self.notifications.read().await;
        Ok(notifications.iter().find(|n| n.id == id).cloned())
    }

    /// Update notification
    /// Apply the changed fields; `validate` sees the merged notification
    /// and nothing is stored when it fails
    pub async fn update<F>(&self, id: &str, request: UpdateNotificationRequest, validate: F) -> Result<Notification, HackPortalError>
    where
        F: FnOnce(&Notification) -> Result<(), HackPortalError>,
    {
        let mut notifications = self.notifications.write().await;
        let stored = notifications
            .iter_mut()
            .find(|n| n.id == id && !n.deleted)
            .ok_or_else(|| not_found(id))?;
        let mut notification = stored.clone();

        if let Some(title) = request.title {
            notification.title = title;
        }
        if let Some(message) = request.message {
            notification.message = message;
        }
        if let Some(description) = request.description {
            notification.description = Some(description);
        }
        if let Some(status) = request.status {
            notification.status = status;
        }
        if let Some(priority) = request.priority {
            notification.priority = priority;
        }
        if let Some(duration) = request.duration {
            notification.duration = duration;
        }
        if let Some(expires_at) = request.expires_at {
            notification.expires_at = Some(expires_at);
        }
        validate(&notification)?;

        notification.updated_at = Utc::now();
        *stored = notification.clone();
        Ok(notification)
    }

    /// Soft delete: archive and hide from every listing
    pub async fn archive(&self, id: &str) -> Result<Notification, HackPortalError> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| not_found(id))?;

        let now = Utc::now();
        notification.deleted = true;
        notification.deleted_at = Some(now);
        notification.status = NotificationStatus::Archived;
        notification.updated_at = now;

        Ok(notification.clone())
    }

    /// Admin listing, newest first
    pub async fn list(&self, query: &NotificationQuery) -> Result<Vec<Notification>, HackPortalError> {
        let notifications = self.notifications.read().await;
        let include_deleted = query.include_deleted.unwrap_or(false);

        let mut result: Vec<Notification> = notifications
            .iter()
            .filter(|n| include_deleted || !n.deleted)
            .filter(|n| query.status.map_or(true, |s| n.status == s))
            .filter(|n| query.notification_type.map_or(true, |t| n.notification_type == t))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result)
    }

    /// Live notifications addressed to a user, newest first
    pub async fn list_for_user(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<Notification>, HackPortalError> {
        let notifications = self.notifications.read().await;
        let mut result: Vec<Notification> = notifications
            .iter()
            .filter(|n| n.is_live(now) && n.targets(user_id))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.priority.cmp(&a.priority).then(b.created_at.cmp(&a.created_at)));

        Ok(result)
    }

    /// Mark a notification read for one user
    pub async fn mark_read(&self, id: &str, user_id: &str) -> Result<Notification, HackPortalError> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id && !n.deleted)
            .ok_or_else(|| not_found(id))?;

        if !notification.targets(user_id) {
            return Err(HackPortalError::InvalidInput(format!(
                "Notification {} is not addressed to user {}",
                id, user_id
            )));
        }

        let now = Utc::now();
        match notification.recipients.iter_mut().find(|r| r.user_id == user_id) {
            Some(recipient) if !recipient.read => {
                recipient.read = true;
                recipient.read_at = Some(now);
            }
            Some(_) => {}
            None => notification.recipients.push(Recipient {
                user_id: user_id.to_string(),
                read: true,
                read_at: Some(now),
            }),
        }
        notification.updated_at = now;

        Ok(notification.clone())
    }
}
