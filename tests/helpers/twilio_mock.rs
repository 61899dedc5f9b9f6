//! Mock messaging vendor for testing
//!
//! Simulates the Twilio Messages resource with wiremock.

use serde_json::json;
use wiremock::{
    matchers::{basic_auth, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_ACCOUNT_SID: &str = "AC00000000000000000000000000000000";
pub const TEST_AUTH_TOKEN: &str = "test_auth_token";
pub const TEST_FROM_NUMBER: &str = "+14155238886";

/// Mock Twilio API server
pub struct TwilioMockServer {
    pub server: MockServer,
}

impl TwilioMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    fn messages_path() -> String {
        format!("/2010-04-01/Accounts/{}/Messages.json", TEST_ACCOUNT_SID)
    }

    /// Accept messages, answering with the given sid and status
    pub async fn mock_message_created(&self, sid: &str, status: &str, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(Self::messages_path()))
            .and(basic_auth(TEST_ACCOUNT_SID, TEST_AUTH_TOKEN))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "sid": sid,
                "status": status,
                "body": "ignored",
            })))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Reject every message with a vendor error body
    pub async fn mock_message_rejected(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(Self::messages_path()))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "code": 21211,
                "message": message,
                "status": status,
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Fail the test if the vendor is called at all
    pub async fn expect_no_calls(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    /// Form bodies the vendor received
    pub async fn received_forms(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }
}
