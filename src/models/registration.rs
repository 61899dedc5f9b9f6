//! Registration and payment order models

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub hackathon_id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub college_name: Option<String>,
    pub whatsapp: Option<String>,
    pub status: RegistrationStatus,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub currency: String,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub utr_number: Option<String>,
    pub screenshot_url: Option<String>,
    pub is_active: bool,
    pub is_joined: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Registered,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Razorpay,
    Qrcode,
    Free,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Razorpay => "razorpay",
            PaymentMethod::Qrcode => "qrcode",
            PaymentMethod::Free => "free",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    pub id: String,
    /// Identifier assigned by the payment vendor
    pub order_id: String,
    pub amount: f64,
    pub currency: String,
    pub hackathon_id: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub whatsapp: Option<String>,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Paid,
    Failed,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeRegistrationRequest {
    pub hackathon_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub college_name: Option<String>,
    pub whatsapp: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrRegistrationRequest {
    pub hackathon_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub utr_number: Option<String>,
    pub screenshot_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistrationRequest {
    pub status: Option<RegistrationStatus>,
    pub is_verified: Option<bool>,
}

/// Registration listing filters and pagination
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationQuery {
    pub page: usize,
    pub limit: usize,
    pub search: String,
    pub hackathon_id: String,
    pub status: String,
    pub payment_method: String,
}

/// Largest page size the listing hands out
pub const MAX_PAGE_LIMIT: usize = 100;

impl Default for RegistrationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: String::new(),
            hackathon_id: String::new(),
            status: String::new(),
            payment_method: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPage {
    pub registrations: Vec<Registration>,
    pub total_pages: usize,
    pub current_page: usize,
    pub total: usize,
    pub unique_hackathon_ids: Vec<String>,
}

/// Where a registrant stands for one hackathon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatusView {
    pub status: String,
    pub order_id: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub message: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RegistrationStatusView {
    pub fn not_registered() -> Self {
        Self {
            status: "not_registered".to_string(),
            order_id: None,
            payment_method: None,
            message: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub amount: f64,
    pub currency: Option<String>,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub hackathon_id: String,
    pub whatsapp: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}
