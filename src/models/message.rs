//! WhatsApp message DTOs

use serde::{Deserialize, Serialize};

/// Body of `POST /send`; both fields are optional on the wire so a missing
/// field maps to a 400 rather than an extractor error
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SendMessageRequest {
    pub to: Option<String>,
    pub message: Option<String>,
}

/// Outcome of a forwarded message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub success: bool,
    pub message_id: String,
    pub status: String,
}

/// Inbound webhook payload as posted by the messaging vendor
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct InboundMessage {
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
}

/// Message resource returned by the vendor on creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorMessage {
    pub sid: String,
    pub status: String,
}

/// Error body returned by the vendor on rejection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorErrorBody {
    pub message: Option<String>,
    pub code: Option<i64>,
}
