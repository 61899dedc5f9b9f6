//! WhatsApp gateway service
//!
//! Forwards outbound messages to a Twilio-compatible messaging API and
//! records inbound webhook deliveries.

use std::sync::Arc;
use std::time::{Duration, Instant};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};
use crate::config::settings::WhatsAppConfig;
use crate::models::message::{InboundMessage, SendMessageResponse, VendorErrorBody, VendorMessage};
use crate::utils::errors::{HackPortalError, Result, WhatsAppError, WhatsAppResult};
use crate::utils::helpers::{format_whatsapp_address, is_present, mask_phone};
use crate::utils::logging::{log_api_error, log_inbound_message, log_outbound_message, log_performance_metric};

/// Anything able to deliver a WhatsApp message
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Create one message; `to` and `from` are already channel-prefixed
    async fn create_message(&self, to: &str, from: &str, body: &str) -> WhatsAppResult<VendorMessage>;
}

/// HTTP client for the Twilio Messages resource
#[derive(Debug, Clone)]
pub struct TwilioClient {
    client: Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
}

impl TwilioClient {
    pub fn new(config: &WhatsAppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("HackPortal/1.0")
            .build()
            .map_err(HackPortalError::Http)?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/2010-04-01/Accounts/{}/Messages.json", self.base_url, self.account_sid)
    }
}

#[async_trait]
impl MessagingClient for TwilioClient {
    async fn create_message(&self, to: &str, from: &str, body: &str) -> WhatsAppResult<VendorMessage> {
        let url = self.messages_url();
        debug!(url = %url, to = %mask_phone(to), "Creating vendor message");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", from), ("Body", body)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WhatsAppError::Timeout
                } else if e.is_connect() {
                    WhatsAppError::ServiceUnavailable
                } else {
                    WhatsAppError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<VendorErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or(text);
            return Err(WhatsAppError::Rejected { status: status.as_u16(), message });
        }

        response
            .json::<VendorMessage>()
            .await
            .map_err(|e| WhatsAppError::InvalidResponse(e.to_string()))
    }
}

/// Gateway between HTTP callers and the messaging vendor
#[derive(Clone)]
pub struct WhatsAppService {
    client: Arc<dyn MessagingClient>,
    from_number: String,
}

impl WhatsAppService {
    pub fn new(client: Arc<dyn MessagingClient>, from_number: impl Into<String>) -> Self {
        Self {
            client,
            from_number: from_number.into(),
        }
    }

    /// Forward one message. Both fields must be non-empty; the vendor is
    /// called at most once.
    pub async fn send_message(&self, to: Option<&str>, message: Option<&str>) -> Result<SendMessageResponse> {
        let (to, message) = match (to, message) {
            (Some(to), Some(message)) if is_present(Some(to)) && is_present(Some(message)) => (to, message),
            _ => {
                return Err(HackPortalError::InvalidInput("Missing required fields".to_string()));
            }
        };

        let to = format_whatsapp_address(to);
        let from = format_whatsapp_address(&self.from_number);
        let started = Instant::now();

        let vendor_message = self
            .client
            .create_message(&to, &from, message)
            .await
            .map_err(|e| {
                error!(to = %mask_phone(&to), error = %e, "Error sending WhatsApp message");
                log_api_error("messaging", &e.to_string(), Some("send_message"));
                HackPortalError::WhatsApp(e)
            })?;

        log_performance_metric("whatsapp_send_ms", started.elapsed().as_millis() as f64, "ms");
        log_outbound_message(&to, &vendor_message.sid, &vendor_message.status);

        Ok(SendMessageResponse {
            success: true,
            message_id: vendor_message.sid,
            status: vendor_message.status,
        })
    }

    /// Record an inbound webhook delivery
    pub fn receive(&self, inbound: &InboundMessage) {
        log_inbound_message(inbound.from.as_deref(), inbound.body.as_deref());
        info!("Webhook delivery accepted");
    }
}
