//! Payment service implementation
//!
//! Creates vendor orders through a Razorpay-compatible API and verifies
//! checkout signatures.

use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, error, info, warn};
use crate::config::settings::PaymentConfig;
use crate::database::DatabaseService;
use crate::database::repositories::{NewOrder, NewRegistration};
use crate::models::registration::{
    CreateOrderRequest, OrderStatus, PaymentMethod, PaymentOrder, VerifyPaymentRequest,
};
use crate::utils::errors::{HackPortalError, PaymentError, PaymentResult, Result};
use crate::utils::helpers::{generate_receipt, generate_registration_id};
use crate::utils::logging::{log_api_error, log_registration_action};

type HmacSha256 = Hmac<Sha256>;

/// Order parameters sent to the vendor; `amount` is in the smallest
/// currency unit
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GatewayOrderRequest {
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
    pub payment_capture: u8,
}

/// Order resource returned by the vendor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorEnvelope {
    error: GatewayErrorBody,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    description: Option<String>,
}

/// Anything able to open a payment order
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: &GatewayOrderRequest) -> PaymentResult<GatewayOrder>;
}

/// HTTP client for the Razorpay Orders API
#[derive(Debug, Clone)]
pub struct RazorpayClient {
    client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(config: &PaymentConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("HackPortal/1.0")
            .build()
            .map_err(HackPortalError::Http)?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, request: &GatewayOrderRequest) -> PaymentResult<GatewayOrder> {
        let url = format!("{}/v1/orders", self.base_url);
        debug!(url = %url, receipt = %request.receipt, amount = request.amount, "Creating vendor order");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(request)
            .send()
            .await
            .map_err(|e| PaymentError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GatewayErrorEnvelope>(&text)
                .ok()
                .and_then(|envelope| envelope.error.description)
                .unwrap_or(text);
            return Err(PaymentError::Rejected { status: status.as_u16(), message });
        }

        response
            .json::<GatewayOrder>()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))
    }
}

/// Hex HMAC-SHA256 of `"{order_id}|{payment_id}"`
pub fn payment_signature(secret: &str, order_id: &str, payment_id: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| HackPortalError::Config(format!("Invalid payment key secret: {}", e)))?;
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a checkout signature
pub fn verify_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Result of a successful order creation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order: GatewayOrder,
    pub db_order: PaymentOrder,
}

#[derive(Clone)]
pub struct PaymentService {
    gateway: Arc<dyn PaymentGateway>,
    database: DatabaseService,
    config: PaymentConfig,
}

impl PaymentService {
    pub fn new(gateway: Arc<dyn PaymentGateway>, database: DatabaseService, config: PaymentConfig) -> Self {
        Self {
            gateway,
            database,
            config,
        }
    }

    /// Open an order for a registrant and record a pending registration
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<CreatedOrder> {
        validate_order_request(&request)?;

        if self.database.lobbies.find_by_id(&request.hackathon_id).await?.is_none() {
            return Err(HackPortalError::LobbyNotFound { lobby_id: request.hackathon_id.clone() });
        }

        let deactivated = self.database.orders.deactivate_for_email(&request.email).await?;
        if deactivated > 0 {
            debug!(email = %request.email, deactivated = deactivated, "Deactivated previous orders");
        }

        let currency = request
            .currency
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.config.currency.clone());
        let gateway_request = GatewayOrderRequest {
            amount: (request.amount * 100.0).round() as u64,
            currency: currency.clone(),
            receipt: generate_receipt(),
            payment_capture: 1,
        };

        let order = self.gateway.create_order(&gateway_request).await.map_err(|e| {
            error!(email = %request.email, error = %e, "Error generating order");
            log_api_error("payments", &e.to_string(), Some("create_order"));
            HackPortalError::Payment(e)
        })?;

        let payment_method = request.payment_method.unwrap_or(PaymentMethod::Razorpay);
        let db_order = self
            .database
            .orders
            .create(NewOrder {
                order_id: order.id.clone(),
                amount: request.amount,
                currency: currency.clone(),
                hackathon_id: request.hackathon_id.clone(),
                name: request.name.clone(),
                email: request.email.clone(),
                contact: request.contact.clone(),
                whatsapp: request.whatsapp.clone(),
                payment_method,
            })
            .await?;

        self.database
            .registrations
            .create(NewRegistration {
                id: generate_registration_id("ORDER", &request.email),
                hackathon_id: request.hackathon_id.clone(),
                email: request.email.clone(),
                name: request.name.clone(),
                phone: Some(request.contact.clone()),
                college_name: None,
                whatsapp: request.whatsapp.clone(),
                payment_method,
                amount: request.amount,
                currency,
                order_id: Some(order.id.clone()),
                utr_number: None,
                screenshot_url: None,
            })
            .await?;

        log_registration_action(&request.hackathon_id, "create_order", &request.email, Some(&order.id));
        Ok(CreatedOrder { order, db_order })
    }

    /// Settle an order from the checkout callback
    pub async fn verify_payment(&self, request: VerifyPaymentRequest) -> Result<PaymentOrder> {
        let VerifyPaymentRequest {
            razorpay_order_id: order_id,
            razorpay_payment_id: payment_id,
            razorpay_signature: signature,
        } = request;

        if order_id.trim().is_empty() || payment_id.trim().is_empty() || signature.trim().is_empty() {
            return Err(HackPortalError::InvalidInput("Please provide all required fields".to_string()));
        }

        if !verify_signature(&self.config.key_secret, &order_id, &payment_id, &signature) {
            warn!(order_id = %order_id, "Payment signature mismatch");
            match self
                .database
                .orders
                .update_status(&order_id, OrderStatus::Failed, None, None)
                .await
            {
                Ok(_) | Err(HackPortalError::OrderNotFound { .. }) => {}
                Err(e) => return Err(e),
            }
            return Err(PaymentError::InvalidSignature.into());
        }

        let order = self
            .database
            .orders
            .update_status(&order_id, OrderStatus::Paid, Some(payment_id.clone()), Some(signature))
            .await?;

        if self
            .database
            .registrations
            .confirm_order(&order_id, &order.email, &payment_id)
            .await?
            .is_none()
        {
            warn!(order_id = %order_id, "Paid order has no matching registration");
        }

        info!(order_id = %order_id, "Payment verified successfully");
        log_registration_action(&order.hackathon_id, "verify_payment", &order.email, Some(&order_id));
        Ok(order)
    }
}

fn validate_order_request(request: &CreateOrderRequest) -> Result<()> {
    if !(request.amount.is_finite() && request.amount > 0.0) {
        return Err(HackPortalError::InvalidInput("Amount must be greater than zero".to_string()));
    }
    let required = [&request.name, &request.email, &request.contact, &request.hackathon_id];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(HackPortalError::InvalidInput("Please provide all required fields".to_string()));
    }
    if request.payment_method == Some(PaymentMethod::Free) {
        return Err(HackPortalError::InvalidInput(
            "Free registrations do not need a payment order".to_string(),
        ));
    }
    Ok(())
}
