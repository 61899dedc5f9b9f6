//! Registration wizard state machine
//!
//! Drives the method-select, details, processing and result steps of a
//! hackathon registration. Network calls go through [`RegistrationGateway`]
//! so the wizard can be exercised without a server.

use std::sync::LazyLock;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::models::registration::PaymentMethod;
use crate::utils::errors::{HackPortalError, Result};
use crate::utils::helpers::generate_utr_number;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z ]{2,50}$").expect("valid name regex"));
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[6-9]\d{9}$").expect("valid phone regex"));
const MIN_COLLEGE_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    MethodSelect,
    DetailsEntry,
    Processing,
    Success,
    Failure,
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WizardStep::MethodSelect => "method_select",
            WizardStep::DetailsEntry => "details_entry",
            WizardStep::Processing => "processing",
            WizardStep::Success => "success",
            WizardStep::Failure => "failure",
        };
        write!(f, "{}", name)
    }
}

/// Registrant fields as typed into the form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college_name: String,
    pub whatsapp: String,
}

/// Everything the gateway needs to register someone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSubmission {
    pub hackathon_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub details: RegistrantDetails,
    pub utr_number: Option<String>,
    pub screenshot_url: Option<String>,
}

/// The single network call a submit makes. Returns the order or
/// registration id assigned by the backend, if any.
#[async_trait]
pub trait RegistrationGateway: Send + Sync {
    async fn submit(&self, submission: &RegistrationSubmission) -> Result<Option<String>>;
}

/// Check trimmed registrant fields; the message is what the form shows inline
pub fn validate_details(details: &RegistrantDetails) -> std::result::Result<(), String> {
    let name = details.name.trim();
    let email = details.email.trim();
    let phone = details.phone.trim();
    let college = details.college_name.trim();

    if name.is_empty() || email.is_empty() || phone.is_empty() || college.is_empty() {
        return Err("All fields are required".to_string());
    }
    if !NAME_RE.is_match(name) {
        return Err("Please enter a valid name".to_string());
    }
    if !PHONE_RE.is_match(phone) {
        return Err("Please enter a valid 10-digit mobile number".to_string());
    }
    if college.chars().count() < MIN_COLLEGE_LENGTH {
        return Err("Please enter a valid college name".to_string());
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    hackathon_id: String,
    amount: f64,
    step: WizardStep,
    method: Option<PaymentMethod>,
    details: RegistrantDetails,
    utr_number: String,
    screenshot_url: Option<String>,
    error: Option<String>,
    order_id: Option<String>,
    existing_order_id: Option<String>,
}

impl RegistrationWizard {
    pub fn new(hackathon_id: impl Into<String>, amount: f64, existing_order_id: Option<String>) -> Self {
        Self {
            hackathon_id: hackathon_id.into(),
            amount,
            step: WizardStep::MethodSelect,
            method: None,
            details: RegistrantDetails::default(),
            utr_number: String::new(),
            screenshot_url: None,
            error: None,
            order_id: None,
            existing_order_id,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    pub fn details(&self) -> &RegistrantDetails {
        &self.details
    }

    pub fn utr_number(&self) -> &str {
        &self.utr_number
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Order id of a completed registration, falling back to the one the
    /// wizard was opened with
    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref().or(self.existing_order_id.as_deref())
    }

    fn transition_error(&self, to: WizardStep) -> HackPortalError {
        HackPortalError::InvalidStateTransition {
            from: self.step.to_string(),
            to: to.to_string(),
        }
    }

    /// Pick a payment method; QR pre-generates a UTR reference
    pub fn select_method(&mut self, method: PaymentMethod) -> Result<()> {
        if self.step != WizardStep::MethodSelect {
            return Err(self.transition_error(WizardStep::DetailsEntry));
        }
        if method == PaymentMethod::Qrcode {
            self.utr_number = generate_utr_number();
        }
        self.method = Some(method);
        self.error = None;
        self.step = WizardStep::DetailsEntry;
        debug!(hackathon_id = %self.hackathon_id, ?method, "Registration method selected");
        Ok(())
    }

    /// Replace the registrant fields
    pub fn set_details(&mut self, details: RegistrantDetails) {
        self.details = details;
    }

    pub fn set_utr_number(&mut self, utr: impl Into<String>) {
        self.utr_number = utr.into();
    }

    pub fn attach_screenshot(&mut self, url: impl Into<String>) {
        self.screenshot_url = Some(url.into());
    }

    pub fn remove_screenshot(&mut self) {
        self.screenshot_url = None;
    }

    /// Whether any field the chosen method requires is still blank
    pub fn has_missing_fields(&self) -> bool {
        let details = &self.details;
        let blank = |value: &str| value.trim().is_empty();
        let base_missing = blank(&details.name)
            || blank(&details.email)
            || blank(&details.phone)
            || blank(&details.college_name);

        let qr_missing = self.method == Some(PaymentMethod::Qrcode)
            && (blank(&self.utr_number) || self.screenshot_url.as_deref().map_or(true, blank));

        base_missing || qr_missing
    }

    /// Submit is enabled only on the details step with every required field
    /// filled; a submission in flight keeps the wizard in `Processing`
    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::DetailsEntry && self.method.is_some() && !self.has_missing_fields()
    }

    /// Validate and move to `Processing`, handing out the submission to send.
    /// Validation failures stay on the details step with an inline error.
    pub fn begin_submit(&mut self) -> Result<RegistrationSubmission> {
        if self.step != WizardStep::DetailsEntry {
            return Err(self.transition_error(WizardStep::Processing));
        }
        let Some(method) = self.method else {
            return Err(self.transition_error(WizardStep::Processing));
        };

        if self.has_missing_fields() {
            let message = if method == PaymentMethod::Qrcode {
                "Please fill all required fields and upload screenshot"
            } else {
                "All fields are required"
            };
            self.error = Some(message.to_string());
            return Err(HackPortalError::InvalidInput(message.to_string()));
        }
        if let Err(message) = validate_details(&self.details) {
            self.error = Some(message.clone());
            return Err(HackPortalError::InvalidInput(message));
        }

        self.error = None;
        self.step = WizardStep::Processing;

        let qr = method == PaymentMethod::Qrcode;
        Ok(RegistrationSubmission {
            hackathon_id: self.hackathon_id.clone(),
            amount: self.amount,
            method,
            details: trimmed(&self.details),
            utr_number: qr.then(|| self.utr_number.trim().to_string()),
            screenshot_url: if qr { self.screenshot_url.clone() } else { None },
        })
    }

    /// Route the gateway result
    pub fn complete(&mut self, outcome: Result<Option<String>>) -> Result<WizardStep> {
        if self.step != WizardStep::Processing {
            return Err(self.transition_error(WizardStep::Success));
        }
        match outcome {
            Ok(order_id) => {
                self.order_id = order_id.or_else(|| self.existing_order_id.clone());
                self.step = WizardStep::Success;
            }
            Err(e) => {
                warn!(hackathon_id = %self.hackathon_id, error = %e, "Registration submit failed");
                self.error = Some(e.to_string());
                self.step = WizardStep::Failure;
            }
        }
        Ok(self.step)
    }

    /// Validate, make the one gateway call and route its result
    pub async fn submit(&mut self, gateway: &dyn RegistrationGateway) -> Result<WizardStep> {
        let submission = self.begin_submit()?;
        let outcome = gateway.submit(&submission).await;
        self.complete(outcome)
    }

    /// Back to the form after a failure, keeping every field
    pub fn retry(&mut self) -> Result<()> {
        if self.step != WizardStep::Failure {
            return Err(self.transition_error(WizardStep::DetailsEntry));
        }
        self.step = WizardStep::DetailsEntry;
        Ok(())
    }

    /// Back to method selection from the form
    pub fn back(&mut self) -> Result<()> {
        if self.step != WizardStep::DetailsEntry {
            return Err(self.transition_error(WizardStep::MethodSelect));
        }
        self.step = WizardStep::MethodSelect;
        self.method = None;
        self.error = None;
        Ok(())
    }

    /// Start over
    pub fn reset(&mut self) {
        *self = Self::new(self.hackathon_id.clone(), self.amount, self.existing_order_id.take());
    }
}

fn trimmed(details: &RegistrantDetails) -> RegistrantDetails {
    RegistrantDetails {
        name: details.name.trim().to_string(),
        email: details.email.trim().to_string(),
        phone: details.phone.trim().to_string(),
        college_name: details.college_name.trim().to_string(),
        whatsapp: details.whatsapp.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubGateway {
        calls: AtomicUsize,
        result: std::result::Result<Option<String>, String>,
    }

    impl StubGateway {
        fn ok(order_id: Option<&str>) -> Self {
            Self { calls: AtomicUsize::new(0), result: Ok(order_id.map(String::from)) }
        }

        fn failing(message: &str) -> Self {
            Self { calls: AtomicUsize::new(0), result: Err(message.to_string()) }
        }
    }

    #[async_trait]
    impl RegistrationGateway for StubGateway {
        async fn submit(&self, _submission: &RegistrationSubmission) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().map_err(HackPortalError::InvalidInput)
        }
    }

    fn details() -> RegistrantDetails {
        RegistrantDetails {
            name: " Asha Rao ".to_string(),
            email: "asha@x.dev".to_string(),
            phone: "9876543210".to_string(),
            college_name: "IIT Madras".to_string(),
            whatsapp: String::new(),
        }
    }

    #[test]
    fn test_validation_rules() {
        assert!(validate_details(&details()).is_ok());

        let mut d = details();
        d.name = "A1".to_string();
        assert_eq!(validate_details(&d), Err("Please enter a valid name".to_string()));

        let mut d = details();
        d.phone = "5876543210".to_string();
        assert_eq!(validate_details(&d), Err("Please enter a valid 10-digit mobile number".to_string()));

        let mut d = details();
        d.college_name = " IT ".to_string();
        assert_eq!(validate_details(&d), Err("Please enter a valid college name".to_string()));

        let mut d = details();
        d.email = "   ".to_string();
        assert_eq!(validate_details(&d), Err("All fields are required".to_string()));
    }

    #[test]
    fn test_field_patterns() {
        assert!(NAME_RE.is_match("Asha Rao"));
        assert!(!NAME_RE.is_match("A"));
        assert!(!NAME_RE.is_match(&"a".repeat(51)));
        assert!(PHONE_RE.is_match("6000000000"));
        assert!(!PHONE_RE.is_match("98765432101"));
        assert!(!PHONE_RE.is_match("+919876543210"));
    }

    #[test]
    fn test_qr_method_pregenerates_utr() {
        let mut wizard = RegistrationWizard::new("1", 199.0, None);
        wizard.select_method(PaymentMethod::Qrcode).unwrap();
        assert_eq!(wizard.step(), WizardStep::DetailsEntry);
        assert!(wizard.utr_number().starts_with("UTR"));
        assert!(wizard.utr_number().len() <= 16);
    }

    #[test]
    fn test_submit_disabled_until_complete_and_while_in_flight() {
        let mut wizard = RegistrationWizard::new("1", 0.0, None);
        assert!(!wizard.can_submit());

        wizard.select_method(PaymentMethod::Free).unwrap();
        assert!(!wizard.can_submit());

        let mut partial = details();
        partial.phone = " ".to_string();
        wizard.set_details(partial);
        assert!(!wizard.can_submit());

        wizard.set_details(details());
        assert!(wizard.can_submit());

        wizard.begin_submit().unwrap();
        assert_eq!(wizard.step(), WizardStep::Processing);
        assert!(!wizard.can_submit());
        assert_matches!(wizard.begin_submit(), Err(HackPortalError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_qr_requires_screenshot() {
        let mut wizard = RegistrationWizard::new("1", 199.0, None);
        wizard.select_method(PaymentMethod::Qrcode).unwrap();
        wizard.set_details(details());
        assert!(!wizard.can_submit());

        assert_matches!(wizard.begin_submit(), Err(HackPortalError::InvalidInput(_)));
        assert_eq!(wizard.step(), WizardStep::DetailsEntry);
        assert!(wizard.error().is_some());

        wizard.attach_screenshot("uploads/receipt.png");
        let submission = wizard.begin_submit().unwrap();
        assert_eq!(submission.details.name, "Asha Rao");
        assert!(submission.utr_number.is_some());
    }

    #[tokio::test]
    async fn test_success_uses_existing_order_id_fallback() {
        let gateway = StubGateway::ok(None);
        let mut wizard = RegistrationWizard::new("1", 0.0, Some("order_prev".to_string()));
        wizard.select_method(PaymentMethod::Free).unwrap();
        wizard.set_details(details());

        assert_eq!(wizard.submit(&gateway).await.unwrap(), WizardStep::Success);
        assert_eq!(wizard.order_id(), Some("order_prev"));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_then_retry_keeps_fields() {
        let gateway = StubGateway::failing("Hackathon not found");
        let mut wizard = RegistrationWizard::new("1", 0.0, None);
        wizard.select_method(PaymentMethod::Free).unwrap();
        wizard.set_details(details());

        assert_eq!(wizard.submit(&gateway).await.unwrap(), WizardStep::Failure);
        assert!(wizard.error().unwrap().contains("Hackathon not found"));

        wizard.retry().unwrap();
        assert_eq!(wizard.step(), WizardStep::DetailsEntry);
        assert_eq!(wizard.details().phone, "9876543210");
        assert!(wizard.can_submit());
    }

    #[tokio::test]
    async fn test_invalid_details_skip_gateway() {
        let gateway = StubGateway::ok(Some("reg_1"));
        let mut wizard = RegistrationWizard::new("1", 0.0, None);
        wizard.select_method(PaymentMethod::Free).unwrap();
        let mut d = details();
        d.phone = "12345".to_string();
        wizard.set_details(d);

        assert!(wizard.submit(&gateway).await.is_err());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(wizard.step(), WizardStep::DetailsEntry);
    }

    #[test]
    fn test_reset_and_back() {
        let mut wizard = RegistrationWizard::new("1", 0.0, Some("order_prev".to_string()));
        wizard.select_method(PaymentMethod::Razorpay).unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.step(), WizardStep::MethodSelect);
        assert_eq!(wizard.method(), None);

        wizard.select_method(PaymentMethod::Razorpay).unwrap();
        wizard.set_details(details());
        wizard.reset();
        assert_eq!(wizard.step(), WizardStep::MethodSelect);
        assert_eq!(wizard.details(), &RegistrantDetails::default());
        assert_eq!(wizard.order_id(), Some("order_prev"));
    }
}
