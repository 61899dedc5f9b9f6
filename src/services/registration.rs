//! Registration service implementation
//!
//! Free and QR/UPI registrations, status lookup, admin listing and
//! admission of verified registrants into their hackathon lobby.

use async_trait::async_trait;
use tracing::{debug, info};
use crate::config::settings::PaymentConfig;
use crate::database::DatabaseService;
use crate::database::repositories::NewRegistration;
use crate::models::lobby::MembershipChange;
use crate::models::registration::{
    CreateOrderRequest, FreeRegistrationRequest, OrderStatus, PaymentMethod, QrRegistrationRequest,
    Registration, RegistrationPage, RegistrationQuery, RegistrationStatus, RegistrationStatusView,
    UpdateRegistrationRequest,
};
use crate::services::payment::PaymentService;
use crate::services::uploads::{ScreenshotUpload, UploadStore};
use crate::state::registration_wizard::{
    validate_details, RegistrantDetails, RegistrationGateway, RegistrationSubmission,
};
use crate::utils::errors::{HackPortalError, Result};
use crate::utils::helpers::{generate_registration_id, is_present};
use crate::utils::logging::log_registration_action;

const PLACEHOLDER_EMAIL: &str = "email@example.com";
const REGISTRATION_ID_KEYWORD: &str = "HACKPORTAL";

/// Outcome of a free registration request
#[derive(Debug, Clone, PartialEq)]
pub enum FreeRegistrationOutcome {
    Created(Registration),
    /// The registrant is already registered and joined
    AlreadyJoined(Registration),
}

/// Outcome of admitting a registration into its lobby
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinOutcome {
    pub registration: Registration,
    pub membership: MembershipChange,
}

#[derive(Clone)]
pub struct RegistrationService {
    database: DatabaseService,
    payments: PaymentService,
    uploads: UploadStore,
    config: PaymentConfig,
}

fn required(message: &str) -> HackPortalError {
    HackPortalError::InvalidInput(message.to_string())
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl RegistrationService {
    pub fn new(database: DatabaseService, payments: PaymentService, uploads: UploadStore, config: PaymentConfig) -> Self {
        Self {
            database,
            payments,
            uploads,
            config,
        }
    }

    /// Largest payment screenshot accepted, in bytes
    pub fn upload_limit(&self) -> usize {
        self.uploads.max_file_bytes()
    }

    /// Register for a free hackathon
    pub async fn register_free(&self, request: FreeRegistrationRequest) -> Result<FreeRegistrationOutcome> {
        let amount_present = request.amount.is_some();
        let (Some(name), Some(email), Some(college), Some(phone), Some(hackathon_id)) = (
            present(&request.name),
            present(&request.email),
            present(&request.college_name),
            present(&request.phone),
            present(&request.hackathon_id),
        ) else {
            return Err(required("Please provide all required fields"));
        };
        if !amount_present {
            return Err(required("Please provide all required fields"));
        }
        if email == PLACEHOLDER_EMAIL {
            return Err(required("Please provide a valid email address"));
        }

        let details = RegistrantDetails {
            name: name.clone(),
            email: email.clone(),
            phone: phone.clone(),
            college_name: college.clone(),
            whatsapp: request.whatsapp.clone().unwrap_or_default(),
        };
        validate_details(&details).map_err(HackPortalError::InvalidInput)?;

        if let Some(existing) = self.database.registrations.find_joined_verified(&hackathon_id, &email).await? {
            info!(hackathon_id = %hackathon_id, email = %email, "Registrant already joined");
            return Ok(FreeRegistrationOutcome::AlreadyJoined(existing));
        }

        let registration = self
            .database
            .registrations
            .create(NewRegistration {
                id: generate_registration_id(REGISTRATION_ID_KEYWORD, &email),
                hackathon_id: hackathon_id.clone(),
                email: email.clone(),
                name,
                phone: Some(phone),
                college_name: Some(college),
                whatsapp: present(&request.whatsapp),
                payment_method: PaymentMethod::Free,
                amount: request.amount.unwrap_or_default(),
                currency: present(&request.currency).unwrap_or_else(|| self.config.currency.clone()),
                order_id: None,
                utr_number: None,
                screenshot_url: None,
            })
            .await?;

        log_registration_action(&hackathon_id, "free_registration", &email, Some(&registration.id));
        Ok(FreeRegistrationOutcome::Created(registration))
    }

    /// Record a QR/UPI payment awaiting verification. The screenshot comes
    /// either as an uploaded file or as an already hosted `screenshotUrl`.
    pub async fn register_qr(
        &self,
        request: QrRegistrationRequest,
        upload: Option<ScreenshotUpload>,
    ) -> Result<Registration> {
        let upload = upload.filter(|u| !u.bytes.is_empty());
        if upload.is_none() && !is_present(request.screenshot_url.as_deref()) {
            return Err(required("No file uploaded"));
        }

        let (Some(name), Some(email), Some(hackathon_id), Some(amount)) = (
            present(&request.name),
            present(&request.email),
            present(&request.hackathon_id),
            request.amount.filter(|a| *a > 0.0),
        ) else {
            return Err(required("Please provide all required fields"));
        };

        let screenshot_url = match upload {
            Some(upload) => Some(self.uploads.save(&upload).await?),
            None => present(&request.screenshot_url),
        };

        let registration = self
            .database
            .registrations
            .create(NewRegistration {
                id: generate_registration_id(REGISTRATION_ID_KEYWORD, &email),
                hackathon_id: hackathon_id.clone(),
                email: email.clone(),
                name,
                phone: present(&request.phone),
                college_name: None,
                whatsapp: present(&request.whatsapp),
                payment_method: PaymentMethod::Qrcode,
                amount,
                currency: present(&request.currency).unwrap_or_else(|| self.config.currency.clone()),
                order_id: None,
                utr_number: present(&request.utr_number),
                screenshot_url,
            })
            .await?;

        log_registration_action(&hackathon_id, "qr_registration", &email, request.utr_number.as_deref());
        Ok(registration)
    }

    /// Where a registrant stands: active registration, then pending order,
    /// then failed order
    pub async fn status(&self, hackathon_id: &str, email: &str) -> Result<RegistrationStatusView> {
        if hackathon_id.trim().is_empty() || email.trim().is_empty() {
            return Err(required("hackathonId and email are required"));
        }

        if let Some(registration) = self.database.registrations.find_active(hackathon_id, email).await? {
            return Ok(RegistrationStatusView {
                status: registration.status.as_str().to_string(),
                order_id: registration.order_id,
                payment_method: Some(registration.payment_method),
                message: None,
                updated_at: Some(registration.updated_at),
            });
        }

        let pending = self
            .database
            .orders
            .latest_for(hackathon_id, email, &[OrderStatus::Created, OrderStatus::Pending])
            .await?;
        if let Some(order) = pending {
            let awaiting_verification =
                order.status == OrderStatus::Created && order.payment_method == PaymentMethod::Qrcode;
            let (status, message) = if awaiting_verification {
                ("pending_verification", "Payment verification in progress")
            } else {
                ("pending_payment", "Complete your payment to register")
            };
            return Ok(RegistrationStatusView {
                status: status.to_string(),
                order_id: Some(order.order_id),
                payment_method: Some(order.payment_method),
                message: Some(message.to_string()),
                updated_at: Some(order.updated_at),
            });
        }

        if let Some(order) = self
            .database
            .orders
            .latest_for(hackathon_id, email, &[OrderStatus::Failed])
            .await?
        {
            return Ok(RegistrationStatusView {
                status: "payment_failed".to_string(),
                order_id: Some(order.order_id),
                payment_method: Some(order.payment_method),
                message: Some("Payment failed. Please try again.".to_string()),
                updated_at: Some(order.updated_at),
            });
        }

        debug!(hackathon_id = hackathon_id, email = email, "No registration found");
        Ok(RegistrationStatusView::not_registered())
    }

    pub async fn list(&self, query: &RegistrationQuery) -> Result<RegistrationPage> {
        self.database.registrations.list(query).await
    }

    pub async fn update(&self, id: &str, request: UpdateRegistrationRequest) -> Result<Registration> {
        let registration = self.database.registrations.update(id, request).await?;
        log_registration_action(&registration.hackathon_id, "update_registration", &registration.email, Some(id));
        Ok(registration)
    }

    /// Admit a verified registration into its hackathon lobby
    pub async fn join_hackathon(&self, registration_id: &str) -> Result<JoinOutcome> {
        let registration = self
            .database
            .registrations
            .find_by_id(registration_id)
            .await?
            .ok_or_else(|| HackPortalError::RegistrationNotFound { registration_id: registration_id.to_string() })?;

        if !registration.is_active {
            return Err(required("Registration is not active"));
        }
        if !registration.is_verified {
            return Err(required("Registration not verified yet"));
        }
        if registration.status != RegistrationStatus::Registered {
            return Err(required("Registration is not completed"));
        }
        if registration.is_joined {
            return Err(required("User already joined"));
        }

        let membership = self
            .database
            .lobbies
            .join(&registration.hackathon_id, &registration.email)
            .await?;
        if !membership.changed {
            let message = if membership.participants >= membership.max_participants {
                "Hackathon has reached maximum registrations"
            } else {
                "User already joined this hackathon"
            };
            return Err(required(message));
        }

        let registration = self.database.registrations.mark_joined(registration_id).await?;
        log_registration_action(&registration.hackathon_id, "join_hackathon", &registration.email, Some(registration_id));
        Ok(JoinOutcome { registration, membership })
    }
}

#[async_trait]
impl RegistrationGateway for RegistrationService {
    async fn submit(&self, submission: &RegistrationSubmission) -> Result<Option<String>> {
        let details = &submission.details;
        let whatsapp = Some(details.whatsapp.clone()).filter(|w| !w.is_empty());

        match submission.method {
            PaymentMethod::Free => {
                let outcome = self
                    .register_free(FreeRegistrationRequest {
                        hackathon_id: Some(submission.hackathon_id.clone()),
                        email: Some(details.email.clone()),
                        name: Some(details.name.clone()),
                        phone: Some(details.phone.clone()),
                        college_name: Some(details.college_name.clone()),
                        whatsapp,
                        amount: Some(submission.amount),
                        currency: None,
                    })
                    .await?;
                let registration = match outcome {
                    FreeRegistrationOutcome::Created(r) | FreeRegistrationOutcome::AlreadyJoined(r) => r,
                };
                Ok(Some(registration.id))
            }
            PaymentMethod::Qrcode => {
                let request = QrRegistrationRequest {
                    hackathon_id: Some(submission.hackathon_id.clone()),
                    email: Some(details.email.clone()),
                    name: Some(details.name.clone()),
                    phone: Some(details.phone.clone()),
                    whatsapp,
                    amount: Some(submission.amount),
                    currency: None,
                    utr_number: submission.utr_number.clone(),
                    screenshot_url: submission.screenshot_url.clone(),
                };
                let registration = self.register_qr(request, None).await?;
                Ok(Some(registration.id))
            }
            PaymentMethod::Razorpay => {
                let created = self
                    .payments
                    .create_order(CreateOrderRequest {
                        amount: submission.amount,
                        currency: None,
                        name: details.name.clone(),
                        email: details.email.clone(),
                        contact: details.phone.clone(),
                        hackathon_id: submission.hackathon_id.clone(),
                        whatsapp,
                        payment_method: Some(PaymentMethod::Razorpay),
                    })
                    .await?;
                Ok(Some(created.order.id))
            }
        }
    }
}
