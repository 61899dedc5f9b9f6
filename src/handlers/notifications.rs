//! Notification HTTP handlers.
//!
//! ```text
//! POST   /api/admin/notifications
//! GET    /api/admin/notifications
//! GET    /api/admin/notifications/{id}
//! PUT    /api/admin/notifications/{id}
//! DELETE /api/admin/notifications/{id}
//! GET    /api/notifications?userId=
//! POST   /api/notifications/{id}/read
//! ```

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use crate::handlers::response::{created, ok, ApiResult};
use crate::models::notification::{CreateNotificationRequest, NotificationQuery, UpdateNotificationRequest};
use crate::services::ServiceFactory;
use crate::utils::errors::HackPortalError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<String>,
}

impl UserQuery {
    fn require(&self) -> Result<&str, HackPortalError> {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| HackPortalError::InvalidInput("userId is required".to_string()))
    }
}

pub async fn create_notification(
    services: web::Data<ServiceFactory>,
    payload: web::Json<CreateNotificationRequest>,
) -> ApiResult<HttpResponse> {
    let notification = services
        .notification_service
        .create_notification(payload.into_inner())
        .await?;
    Ok(created(notification, "Notification created successfully"))
}

pub async fn list_notifications(
    services: web::Data<ServiceFactory>,
    query: web::Query<NotificationQuery>,
) -> ApiResult<HttpResponse> {
    let notifications = services.notification_service.list_notifications(&query).await?;
    Ok(ok(notifications, "Notifications fetched successfully"))
}

pub async fn get_notification(
    services: web::Data<ServiceFactory>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let notification = services.notification_service.get_notification(&path).await?;
    Ok(ok(notification, "Notification fetched successfully"))
}

pub async fn update_notification(
    services: web::Data<ServiceFactory>,
    path: web::Path<String>,
    payload: web::Json<UpdateNotificationRequest>,
) -> ApiResult<HttpResponse> {
    let notification = services
        .notification_service
        .update_notification(&path, payload.into_inner())
        .await?;
    Ok(ok(notification, "Notification updated successfully"))
}

pub async fn archive_notification(
    services: web::Data<ServiceFactory>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let notification = services.notification_service.archive_notification(&path).await?;
    Ok(ok(notification, "Notification archived successfully"))
}

pub async fn user_feed(services: web::Data<ServiceFactory>, query: web::Query<UserQuery>) -> ApiResult<HttpResponse> {
    let user_id = query.require()?;
    let feed = services.notification_service.user_feed(user_id).await?;
    Ok(ok(feed, "Notifications fetched successfully"))
}

pub async fn mark_read(
    services: web::Data<ServiceFactory>,
    path: web::Path<String>,
    query: web::Query<UserQuery>,
) -> ApiResult<HttpResponse> {
    let user_id = query.require()?;
    let notification = services.notification_service.mark_read(&path, user_id).await?;
    Ok(ok(notification, "Notification marked as read"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin/notifications")
            .route("", web::post().to(create_notification))
            .route("", web::get().to(list_notifications))
            .route("/{id}", web::get().to(get_notification))
            .route("/{id}", web::put().to(update_notification))
            .route("/{id}", web::delete().to(archive_notification)),
    )
    .service(
        web::scope("/api/notifications")
            .route("", web::get().to(user_feed))
            .route("/{id}/read", web::post().to(mark_read)),
    );
}
