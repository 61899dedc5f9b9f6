//! Error handling for HackPortal
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for HackPortal application
#[derive(Error, Debug)]
pub enum HackPortalError {
    #[error("WhatsApp gateway error: {0}")]
    WhatsApp(#[from] WhatsAppError),

    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lobby not found: {lobby_id}")]
    LobbyNotFound { lobby_id: String },

    #[error("Notification not found: {notification_id}")]
    NotificationNotFound { notification_id: String },

    #[error("Registration not found: {registration_id}")]
    RegistrationNotFound { registration_id: String },

    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: String },

    #[error("Message not found: {message_id}")]
    MessageNotFound { message_id: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Messaging vendor specific errors
#[derive(Error, Debug)]
pub enum WhatsAppError {
    #[error("Messaging API request failed: {0}")]
    RequestFailed(String),

    #[error("Messaging API timeout")]
    Timeout,

    #[error("Messaging API rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid messaging API response: {0}")]
    InvalidResponse(String),

    #[error("Messaging service unavailable")]
    ServiceUnavailable,
}

/// Payment vendor specific errors
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment API request failed: {0}")]
    RequestFailed(String),

    #[error("Payment API rejected the order ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid payment API response: {0}")]
    InvalidResponse(String),

    #[error("Invalid signature, verification failed")]
    InvalidSignature,
}

/// Result type alias for HackPortal operations
pub type Result<T> = std::result::Result<T, HackPortalError>;

/// Result type alias for messaging vendor operations
pub type WhatsAppResult<T> = std::result::Result<T, WhatsAppError>;

/// Result type alias for payment vendor operations
pub type PaymentResult<T> = std::result::Result<T, PaymentError>;

impl HackPortalError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            HackPortalError::WhatsApp(_) => true,
            HackPortalError::Payment(PaymentError::InvalidSignature) => false,
            HackPortalError::Payment(_) => true,
            HackPortalError::Config(_) => false,
            HackPortalError::LobbyNotFound { .. } => false,
            HackPortalError::NotificationNotFound { .. } => false,
            HackPortalError::RegistrationNotFound { .. } => false,
            HackPortalError::OrderNotFound { .. } => false,
            HackPortalError::MessageNotFound { .. } => false,
            HackPortalError::InvalidStateTransition { .. } => false,
            HackPortalError::Duplicate(_) => false,
            HackPortalError::Http(_) => true,
            HackPortalError::Serialization(_) => false,
            HackPortalError::Io(_) => true,
            HackPortalError::UrlParse(_) => false,
            HackPortalError::RateLimitExceeded => true,
            HackPortalError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            HackPortalError::Config(_) => ErrorSeverity::Critical,
            HackPortalError::RateLimitExceeded => ErrorSeverity::Warning,
            HackPortalError::Payment(PaymentError::InvalidSignature) => ErrorSeverity::Warning,
            HackPortalError::Duplicate(_) => ErrorSeverity::Info,
            HackPortalError::InvalidInput(_) => ErrorSeverity::Info,
            HackPortalError::LobbyNotFound { .. }
            | HackPortalError::NotificationNotFound { .. }
            | HackPortalError::RegistrationNotFound { .. }
            | HackPortalError::OrderNotFound { .. }
            | HackPortalError::MessageNotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// HTTP status code a handler should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            HackPortalError::InvalidInput(_) => 400,
            HackPortalError::Payment(PaymentError::InvalidSignature) => 400,
            HackPortalError::InvalidStateTransition { .. } => 400,
            HackPortalError::LobbyNotFound { .. }
            | HackPortalError::NotificationNotFound { .. }
            | HackPortalError::RegistrationNotFound { .. }
            | HackPortalError::OrderNotFound { .. }
            | HackPortalError::MessageNotFound { .. } => 404,
            HackPortalError::Duplicate(_) => 409,
            HackPortalError::RateLimitExceeded => 429,
            _ => 500,
        }
    }

    /// Numeric error code carried in the response envelope
    pub fn error_code(&self) -> u8 {
        match self.status_code() {
            400 => ErrorCodes::VALIDATION_ERROR,
            404 => ErrorCodes::NOT_FOUND,
            409 => ErrorCodes::DUPLICATE_ENTRY,
            _ => ErrorCodes::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error codes shared with the frontend
pub struct ErrorCodes;

impl ErrorCodes {
    pub const SUCCESS: u8 = 0;
    pub const VALIDATION_ERROR: u8 = 1;
    pub const INTERNAL_SERVER_ERROR: u8 = 2;
    pub const NOT_FOUND: u8 = 3;
    pub const UNAUTHORIZED: u8 = 4;
    pub const FORBIDDEN: u8 = 5;
    pub const DUPLICATE_ENTRY: u8 = 6;
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
