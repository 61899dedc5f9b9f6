//! Notification model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub description: Option<String>,
    pub status: NotificationStatus,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub position: NotificationPosition,
    pub priority: NotificationPriority,
    pub duration: NotificationDuration,
    pub action: NotificationAction,
    pub is_broadcast: bool,
    pub sender: Option<String>,
    pub recipients: Vec<Recipient>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Whether the notification should be shown at `now`
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.deleted
            && self.status == NotificationStatus::Active
            && self.scheduled_for.map_or(true, |at| at <= now)
            && self.expires_at.map_or(true, |at| at > now)
    }

    /// Whether `user_id` is addressed by this notification
    pub fn targets(&self, user_id: &str) -> bool {
        self.is_broadcast || self.recipients.iter().any(|r| r.user_id == user_id)
    }

    pub fn is_read_by(&self, user_id: &str) -> bool {
        self.recipients.iter().any(|r| r.user_id == user_id && r.read)
    }

    pub fn unread_count(&self) -> usize {
        self.recipients.iter().filter(|r| !r.read).count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub user_id: String,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
}

impl Recipient {
    pub fn unread(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            read: false,
            read_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    SystemAlert,
    AdminAlert,
    UserSpecific,
    Team,
    Hackathon,
    Message,
    Security,
    Announcement,
    Reminder,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationPosition {
    #[default]
    StickyTop,
    WholePage,
    SideBottomRight,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// How long a notification stays on screen once visible
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum NotificationDuration {
    Fixed { timer: u64 },
    Infinite,
}

impl Default for NotificationDuration {
    fn default() -> Self {
        NotificationDuration::Fixed { timer: 5000 }
    }
}

impl NotificationDuration {
    /// Auto-dismiss delay in milliseconds, if any
    pub fn auto_dismiss_ms(&self) -> Option<u64> {
        match *self {
            NotificationDuration::Fixed { timer } if timer > 0 => Some(timer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Redirect,
    ApiCall,
    Modal,
    ExternalLink,
    #[default]
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NotificationAction {
    #[serde(rename = "type", default)]
    pub action_type: ActionType,
    pub url: Option<String>,
    pub method: Option<String>,
    pub payload: Option<serde_json::Value>,
}

impl NotificationAction {
    /// Button label shown next to the notification
    pub fn label(&self) -> Option<&'static str> {
        match self.action_type {
            ActionType::Redirect => Some("View"),
            ActionType::ExternalLink => Some("Open"),
            ActionType::Modal => Some("Details"),
            ActionType::ApiCall => Some("Action"),
            ActionType::None => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: String,
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub notification_type: NotificationType,
    #[serde(default)]
    pub position: NotificationPosition,
    #[serde(default)]
    pub priority: NotificationPriority,
    pub duration: Option<NotificationDuration>,
    #[serde(default)]
    pub action: NotificationAction,
    #[serde(default)]
    pub is_broadcast: bool,
    pub sender: Option<String>,
    #[serde(default)]
    pub recipient_ids: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub description: Option<String>,
    pub status: Option<NotificationStatus>,
    pub priority: Option<NotificationPriority>,
    pub duration: Option<NotificationDuration>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Admin listing filters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    pub status: Option<NotificationStatus>,
    #[serde(rename = "type")]
    pub notification_type: Option<NotificationType>,
    pub include_deleted: Option<bool>,
}

/// A notification as seen by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNotification {
    #[serde(flatten)]
    pub notification: Notification,
    pub read: bool,
}
