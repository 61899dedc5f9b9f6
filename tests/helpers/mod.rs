//! Test helpers module
//!
//! Vendor mock servers, the shared test context and test data builders.

#![allow(dead_code)]

pub mod razorpay_mock;
pub mod test_context;
pub mod test_data;
pub mod twilio_mock;

pub use razorpay_mock::*;
pub use test_context::*;
pub use test_data::*;
pub use twilio_mock::*;

use actix_web::dev::ServiceResponse;
use serde_json::Value;

/// Status and JSON body of a response
pub async fn json_response(response: ServiceResponse) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = actix_web::test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON response body")
    };
    (status, value)
}
