//! Payment HTTP handlers.
//!
//! ```text
//! POST /api/payments/create-order
//! POST /api/payments/verify-payment
//! ```

use actix_web::{web, HttpResponse};
use crate::handlers::response::{created, ok, ApiResult};
use crate::models::registration::{CreateOrderRequest, VerifyPaymentRequest};
use crate::services::ServiceFactory;

pub async fn create_order(
    services: web::Data<ServiceFactory>,
    payload: web::Json<CreateOrderRequest>,
) -> ApiResult<HttpResponse> {
    let order = services.payment_service.create_order(payload.into_inner()).await?;
    Ok(created(order, "Order created successfully"))
}

pub async fn verify_payment(
    services: web::Data<ServiceFactory>,
    payload: web::Json<VerifyPaymentRequest>,
) -> ApiResult<HttpResponse> {
    let order = services.payment_service.verify_payment(payload.into_inner()).await?;
    Ok(ok(order, "Payment verified successfully"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/payments")
            .route("/create-order", web::post().to(create_order))
            .route("/verify-payment", web::post().to(verify_payment)),
    );
}
