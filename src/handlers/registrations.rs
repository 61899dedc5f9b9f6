//! Registration HTTP handlers.
//!
//! ```text
//! POST /api/registrations/free
//! POST /api/registrations/qr-payment   (multipart with a `screenshot` file, or JSON)
//! GET  /api/registrations/status?hackathonId=&email=
//! GET  /api/registrations
//! PUT  /api/registrations/{id}
//! POST /api/registrations/{id}/join
//! ```

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::guard::{self, GuardContext};
use actix_web::{http::header, web, HttpResponse};
use futures::TryStreamExt;
use serde::Deserialize;
use crate::handlers::response::{created, ok, ApiResult};
use crate::models::registration::{
    FreeRegistrationRequest, QrRegistrationRequest, RegistrationQuery, UpdateRegistrationRequest,
};
use crate::services::{FreeRegistrationOutcome, ScreenshotUpload, ServiceFactory};
use crate::utils::errors::HackPortalError;

/// Form part carrying the payment screenshot
const SCREENSHOT_FIELD: &str = "screenshot";
const MAX_TEXT_FIELD_BYTES: usize = 4096;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub hackathon_id: Option<String>,
    pub email: Option<String>,
}

pub async fn register_free(
    services: web::Data<ServiceFactory>,
    payload: web::Json<FreeRegistrationRequest>,
) -> ApiResult<HttpResponse> {
    match services.registration_service.register_free(payload.into_inner()).await? {
        FreeRegistrationOutcome::Created(registration) => {
            Ok(created(registration, "Registration created successfully"))
        }
        FreeRegistrationOutcome::AlreadyJoined(registration) => {
            Ok(ok(registration, "User already registered and joined"))
        }
    }
}

pub async fn register_qr(
    services: web::Data<ServiceFactory>,
    payload: web::Json<QrRegistrationRequest>,
) -> ApiResult<HttpResponse> {
    let registration = services
        .registration_service
        .register_qr(payload.into_inner(), None)
        .await?;
    Ok(created(registration, "Registration submitted, awaiting verification"))
}

pub async fn register_qr_upload(
    services: web::Data<ServiceFactory>,
    mut payload: Multipart,
) -> ApiResult<HttpResponse> {
    let limit = services.registration_service.upload_limit();
    let mut request = QrRegistrationRequest::default();
    let mut upload = None;

    while let Some(mut field) = payload.try_next().await.map_err(bad_form)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == SCREENSHOT_FIELD {
            upload = Some(read_file(&mut field, limit).await?);
            continue;
        }

        let value = read_text(&mut field).await?;
        match name.as_str() {
            "hackathonId" => request.hackathon_id = Some(value),
            "email" => request.email = Some(value),
            "name" => request.name = Some(value),
            "phone" => request.phone = Some(value),
            "whatsapp" => request.whatsapp = Some(value),
            "amount" => request.amount = value.trim().parse().ok(),
            "currency" => request.currency = Some(value),
            "utrNumber" => request.utr_number = Some(value),
            _ => {}
        }
    }

    let registration = services.registration_service.register_qr(request, upload).await?;
    Ok(created(registration, "Registration submitted, awaiting verification"))
}

fn is_multipart(ctx: &GuardContext) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

fn bad_form(err: MultipartError) -> HackPortalError {
    HackPortalError::InvalidInput(format!("Invalid form data: {}", err))
}

async fn read_file(field: &mut Field, limit: usize) -> Result<ScreenshotUpload, HackPortalError> {
    let file_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(str::to_string);
    let content_type = field.content_type().map(|mime| mime.essence_str().to_string());

    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(bad_form)? {
        if bytes.len() + chunk.len() > limit {
            return Err(HackPortalError::InvalidInput(format!(
                "Screenshot exceeds the {} byte limit",
                limit
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(ScreenshotUpload {
        file_name,
        content_type,
        bytes,
    })
}

async fn read_text(field: &mut Field) -> Result<String, HackPortalError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(bad_form)? {
        if bytes.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(HackPortalError::InvalidInput("Form field too large".to_string()));
        }
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes).map_err(|_| HackPortalError::InvalidInput("Form fields must be UTF-8".to_string()))
}

pub async fn registration_status(
    services: web::Data<ServiceFactory>,
    query: web::Query<StatusQuery>,
) -> ApiResult<HttpResponse> {
    let (Some(hackathon_id), Some(email)) = (query.hackathon_id.as_deref(), query.email.as_deref()) else {
        return Err(HackPortalError::InvalidInput("hackathonId and email are required".to_string()));
    };
    let status = services.registration_service.status(hackathon_id, email).await?;
    Ok(ok(status, "Registration status fetched successfully"))
}

pub async fn list_registrations(
    services: web::Data<ServiceFactory>,
    query: web::Query<RegistrationQuery>,
) -> ApiResult<HttpResponse> {
    let page = services.registration_service.list(&query).await?;
    Ok(ok(page, "Registrations fetched successfully"))
}

pub async fn update_registration(
    services: web::Data<ServiceFactory>,
    path: web::Path<String>,
    payload: web::Json<UpdateRegistrationRequest>,
) -> ApiResult<HttpResponse> {
    let registration = services
        .registration_service
        .update(&path, payload.into_inner())
        .await?;
    Ok(ok(registration, "Registration updated successfully"))
}

pub async fn join_hackathon(services: web::Data<ServiceFactory>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let outcome = services.registration_service.join_hackathon(&path).await?;
    Ok(created(outcome, "Joined hackathon successfully"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/registrations")
            .route("", web::get().to(list_registrations))
            .route("/free", web::post().to(register_free))
            .service(
                web::resource("/qr-payment")
                    .route(web::post().guard(guard::fn_guard(is_multipart)).to(register_qr_upload))
                    .route(web::post().to(register_qr)),
            )
            .route("/status", web::get().to(registration_status))
            .route("/{id}", web::put().to(update_registration))
            .route("/{id}/join", web::post().to(join_hackathon)),
    );
}
