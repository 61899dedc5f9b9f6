//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod lobby;
pub mod notification;
pub mod registration;
pub mod message;
pub mod team_message;

// Re-export commonly used models
pub use lobby::{Lobby, LobbyFilters, LobbyStatus, LobbyType, Difficulty, CreateLobbyRequest, MembershipChange};
pub use notification::{
    Notification, NotificationAction, NotificationDuration, NotificationPosition, NotificationPriority,
    NotificationStatus, NotificationType, ActionType, Recipient, CreateNotificationRequest,
    UpdateNotificationRequest, NotificationQuery, UserNotification,
};
pub use registration::{
    Registration, RegistrationStatus, PaymentMethod, PaymentOrder, OrderStatus, FreeRegistrationRequest,
    QrRegistrationRequest, UpdateRegistrationRequest, RegistrationQuery, RegistrationPage,
    RegistrationStatusView, CreateOrderRequest, VerifyPaymentRequest,
};
pub use message::{SendMessageRequest, SendMessageResponse, InboundMessage, VendorMessage, VendorErrorBody};
pub use team_message::{
    TeamMessage, MessageType, ReadReceipt, CreateTeamMessageRequest, TeamMessageQuery, TeamMessagePage, Pagination,
};
