//! Mock payment vendor for testing
//!
//! Simulates the Razorpay Orders API with wiremock.

use serde_json::json;
use wiremock::{
    matchers::{basic_auth, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_KEY_ID: &str = "rzp_test_key";
pub const TEST_KEY_SECRET: &str = "rzp_test_secret";

/// Mock Razorpay API server
pub struct RazorpayMockServer {
    pub server: MockServer,
}

impl RazorpayMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Answer order creation with a fixed order id
    pub async fn mock_order_created(&self, order_id: &str, amount_paise: u64) {
        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .and(basic_auth(TEST_KEY_ID, TEST_KEY_SECRET))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": order_id,
                "entity": "order",
                "amount": amount_paise,
                "currency": "INR",
                "receipt": "receipt_0",
                "status": "created",
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_order_rejected(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": "BAD_REQUEST_ERROR",
                    "description": "The amount must be atleast INR 1.00",
                }
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn expect_no_calls(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of the orders the vendor received
    pub async fn received_orders(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}
