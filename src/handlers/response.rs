//! JSON envelope shared by the API handlers
//!
//! Every API answer is `{success, data, message, errorCode}`. Domain errors
//! turn into the same envelope through [`ResponseError`].

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Serialize;
use tracing::{error, warn};
use crate::utils::errors::{ErrorCodes, ErrorSeverity, HackPortalError};

/// Convenient result alias for HTTP handlers
pub type ApiResult<T> = std::result::Result<T, HackPortalError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub error_code: u8,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error_code: ErrorCodes::SUCCESS,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>, error_code: u8) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            error_code,
        }
    }
}

/// 200 with a success envelope
pub fn ok<T: Serialize>(data: T, message: &str) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(data, message))
}

/// 201 with a success envelope
pub fn created<T: Serialize>(data: T, message: &str) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::ok(data, message))
}

/// JSON extractor config answering malformed bodies with the envelope
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid request body: {}", err);
        let response = HttpResponse::BadRequest().json(ApiResponse::failure(message, ErrorCodes::VALIDATION_ERROR));
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

/// Message shown to clients; internal failures are not leaked
fn public_message(err: &HackPortalError) -> String {
    match err {
        HackPortalError::InvalidInput(message) => message.clone(),
        HackPortalError::LobbyNotFound { .. } => "Lobby not found".to_string(),
        HackPortalError::NotificationNotFound { .. } => "Notification not found".to_string(),
        HackPortalError::RegistrationNotFound { .. } => "Registration not found".to_string(),
        HackPortalError::OrderNotFound { .. } => "Order not found".to_string(),
        HackPortalError::MessageNotFound { .. } => "Message not found".to_string(),
        HackPortalError::Payment(crate::utils::errors::PaymentError::InvalidSignature) => {
            "Invalid signature, verification failed".to_string()
        }
        HackPortalError::Payment(_) => "Error generating order".to_string(),
        HackPortalError::RateLimitExceeded => "Too many requests, please try again later.".to_string(),
        HackPortalError::Duplicate(_) | HackPortalError::InvalidStateTransition { .. } => err.to_string(),
        _ => "Internal server error".to_string(),
    }
}

impl ResponseError for HackPortalError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(HackPortalError::status_code(self)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        match self.severity() {
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                error!(error = %self, recoverable = self.is_recoverable(), "Request failed")
            }
            ErrorSeverity::Warning => warn!(error = %self, "Request rejected"),
            ErrorSeverity::Info => {}
        }

        HttpResponse::build(ResponseError::status_code(self))
            .json(ApiResponse::failure(public_message(self), self.error_code()))
    }
}
