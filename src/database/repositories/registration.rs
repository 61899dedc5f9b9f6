//! Registration repository implementation

use std::collections::BTreeSet;
use std::sync::Arc;
use chrono::Utc;
use tokio::sync::RwLock;
use crate::models::registration::{
    Registration, RegistrationStatus, PaymentMethod, UpdateRegistrationRequest, RegistrationQuery,
    RegistrationPage, MAX_PAGE_LIMIT,
};
use crate::utils::errors::HackPortalError;
use crate::utils::helpers::{calculate_offset, total_pages};

/// Fields needed to record a registration
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub id: String,
    pub hackathon_id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub college_name: Option<String>,
    pub whatsapp: Option<String>,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub currency: String,
    pub order_id: Option<String>,
    pub utr_number: Option<String>,
    pub screenshot_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationRepository {
    registrations: Arc<RwLock<Vec<Registration>>>,
}

fn not_found(id: &str) -> HackPortalError {
    HackPortalError::RegistrationNotFound { registration_id: id.to_string() }
}

impl RegistrationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pending registration, deactivating older ones for the same
    /// hackathon and email under the same lock
    pub async fn create(&self, registration: NewRegistration) -> Result<Registration, HackPortalError> {
        let mut registrations = self.registrations.write().await;
        if registrations.iter().any(|r| r.id == registration.id) {
            return Err(HackPortalError::Duplicate(format!(
                "Registration {} already exists",
                registration.id
            )));
        }

        let now = Utc::now();
        for older in registrations.iter_mut().filter(|r| {
            r.is_active && r.email == registration.email && r.hackathon_id == registration.hackathon_id
        }) {
            older.is_active = false;
            older.updated_at = now;
        }

        let record = Registration {
            id: registration.id,
            hackathon_id: registration.hackathon_id,
            email: registration.email,
            name: registration.name,
            phone: registration.phone,
            college_name: registration.college_name,
            whatsapp: registration.whatsapp,
            status: RegistrationStatus::Pending,
            payment_method: registration.payment_method,
            amount: registration.amount,
            currency: registration.currency,
            order_id: registration.order_id,
            payment_id: None,
            utr_number: registration.utr_number,
            screenshot_url: registration.screenshot_url,
            is_active: true,
            is_joined: false,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        registrations.push(record.clone());
        Ok(record)
    }

    /// Find registration by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, HackPortalError> {
        let registrations = self.registrations.read().await;
        Ok(registrations.iter().find(|r| r.id == id).cloned())
    }

    /// Admin update of status and verification
    pub async fn update(&self, id: &str, request: UpdateRegistrationRequest) -> Result<Registration, HackPortalError> {
        let mut registrations = self.registrations.write().await;
        let registration = registrations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(status) = request.status {
            registration.status = status;
        }
        if let Some(verified) = request.is_verified {
            registration.is_verified = verified;
        }
        registration.updated_at = Utc::now();

        Ok(registration.clone())
    }

    /// The active registration for a registrant, if any
    pub async fn find_active(&self, hackathon_id: &str, email: &str) -> Result<Option<Registration>, HackPortalError> {
        let registrations = self.registrations.read().await;
        Ok(registrations
            .iter()
            .filter(|r| r.is_active && r.hackathon_id == hackathon_id && r.email == email)
            .max_by_key(|r| r.updated_at)
            .cloned())
    }

    /// Active, verified and joined registration that is already registered
    pub async fn find_joined_verified(&self, hackathon_id: &str, email: &str) -> Result<Option<Registration>, HackPortalError> {
        let registrations = self.registrations.read().await;
        Ok(registrations
            .iter()
            .find(|r| {
                r.is_active
                    && r.is_joined
                    && r.is_verified
                    && r.status == RegistrationStatus::Registered
                    && r.hackathon_id == hackathon_id
                    && r.email == email
            })
            .cloned())
    }

    /// Mark the registration tied to a vendor order as registered. Admin
    /// verification is still required before the registrant can join.
    /// Any other active registration for the same hackathon and email is
    /// deactivated so the paid one is the only active entry.
    pub async fn confirm_order(&self, order_id: &str, email: &str, payment_id: &str) -> Result<Option<Registration>, HackPortalError> {
        let mut registrations = self.registrations.write().await;
        let Some(index) = registrations
            .iter()
            .position(|r| r.order_id.as_deref() == Some(order_id) && r.email == email)
        else {
            return Ok(None);
        };

        let now = Utc::now();
        let hackathon_id = registrations[index].hackathon_id.clone();
        for (i, other) in registrations.iter_mut().enumerate() {
            if i != index && other.is_active && other.email == email && other.hackathon_id == hackathon_id {
                other.is_active = false;
                other.updated_at = now;
            }
        }

        let registration = &mut registrations[index];
        registration.status = RegistrationStatus::Registered;
        registration.payment_id = Some(payment_id.to_string());
        registration.is_active = true;
        registration.updated_at = now;

        Ok(Some(registration.clone()))
    }

    /// Flag a registration as joined
    pub async fn mark_joined(&self, id: &str) -> Result<Registration, HackPortalError> {
        let mut registrations = self.registrations.write().await;
        let registration = registrations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found(id))?;

        registration.is_joined = true;
        registration.updated_at = Utc::now();
        Ok(registration.clone())
    }

    /// Filtered, paginated listing, newest first
    pub async fn list(&self, query: &RegistrationQuery) -> Result<RegistrationPage, HackPortalError> {
        let registrations = self.registrations.read().await;
        let search = query.search.trim().to_lowercase();

        let unique_hackathon_ids: Vec<String> = registrations
            .iter()
            .map(|r| r.hackathon_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut matching: Vec<&Registration> = registrations
            .iter()
            .filter(|r| {
                search.is_empty()
                    || r.name.to_lowercase().contains(&search)
                    || r.email.to_lowercase().contains(&search)
                    || r.phone.as_deref().map_or(false, |p| p.contains(&search))
                    || r.hackathon_id.to_lowercase().contains(&search)
            })
            .filter(|r| unfiltered(&query.hackathon_id) || r.hackathon_id == query.hackathon_id)
            .filter(|r| unfiltered(&query.status) || r.status.as_str() == query.status)
            .filter(|r| unfiltered(&query.payment_method) || r.payment_method.as_str() == query.payment_method)
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let limit = query.limit.clamp(1, MAX_PAGE_LIMIT);
        let page = query.page.max(1);
        let offset = calculate_offset(page, limit)
            .ok_or_else(|| HackPortalError::InvalidInput(format!("Page {} is out of range", page)))?;
        let total = matching.len();

        Ok(RegistrationPage {
            registrations: matching
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
            total_pages: total_pages(total, limit),
            current_page: page,
            total,
            unique_hackathon_ids,
        })
    }
}

/// Empty and "all" both disable a filter
fn unfiltered(value: &str) -> bool {
    value.is_empty() || value == "all"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_registration(id: &str, email: &str, method: PaymentMethod) -> NewRegistration {
        NewRegistration {
            id: id.to_string(),
            hackathon_id: "hack-1".to_string(),
            email: email.to_string(),
            name: "Asha Rao".to_string(),
            phone: Some("9876543210".to_string()),
            college_name: Some("IIT Madras".to_string()),
            whatsapp: None,
            payment_method: method,
            amount: 0.0,
            currency: "INR".to_string(),
            order_id: None,
            utr_number: None,
            screenshot_url: None,
        }
    }

    #[tokio::test]
    async fn test_new_registration_deactivates_older() {
        let repo = RegistrationRepository::new();
        repo.create(new_registration("100000000000001", "a@x.dev", PaymentMethod::Free)).await.unwrap();
        repo.create(new_registration("100000000000002", "a@x.dev", PaymentMethod::Free)).await.unwrap();

        let old = repo.find_by_id("100000000000001").await.unwrap().unwrap();
        assert!(!old.is_active);
        let active = repo.find_active("hack-1", "a@x.dev").await.unwrap().unwrap();
        assert_eq!(active.id, "100000000000002");
    }

    #[tokio::test]
    async fn test_confirm_order_registers() {
        let repo = RegistrationRepository::new();
        let mut reg = new_registration("100000000000001", "a@x.dev", PaymentMethod::Razorpay);
        reg.order_id = Some("order_1".to_string());
        repo.create(reg).await.unwrap();

        let confirmed = repo.confirm_order("order_1", "a@x.dev", "pay_1").await.unwrap().unwrap();
        assert_eq!(confirmed.status, RegistrationStatus::Registered);
        assert!(!confirmed.is_verified);
        assert!(repo.find_joined_verified("hack-1", "a@x.dev").await.unwrap().is_none());
        assert!(repo.confirm_order("order_2", "a@x.dev", "pay_2").await.unwrap().is_none());

        repo.update("100000000000001", UpdateRegistrationRequest { status: None, is_verified: Some(true) })
            .await
            .unwrap();
        repo.mark_joined("100000000000001").await.unwrap();
        assert!(repo.find_joined_verified("hack-1", "a@x.dev").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_confirm_order_keeps_single_active_registration() {
        let repo = RegistrationRepository::new();
        let mut paid = new_registration("100000000000001", "a@x.dev", PaymentMethod::Razorpay);
        paid.order_id = Some("order_1".to_string());
        repo.create(paid).await.unwrap();
        repo.create(new_registration("100000000000002", "a@x.dev", PaymentMethod::Qrcode))
            .await
            .unwrap();

        repo.confirm_order("order_1", "a@x.dev", "pay_1").await.unwrap().unwrap();

        let page = repo.list(&RegistrationQuery::default()).await.unwrap();
        let active: Vec<&str> = page
            .registrations
            .iter()
            .filter(|r| r.is_active)
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(active, vec!["100000000000001"]);
        let current = repo.find_active("hack-1", "a@x.dev").await.unwrap().unwrap();
        assert_eq!(current.status, RegistrationStatus::Registered);
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let repo = RegistrationRepository::new();
        for i in 0..5 {
            let email = format!("user{}@x.dev", i);
            let method = if i % 2 == 0 { PaymentMethod::Free } else { PaymentMethod::Qrcode };
            repo.create(new_registration(&format!("10000000000000{}", i), &email, method))
                .await
                .unwrap();
        }

        let query = RegistrationQuery { limit: 2, ..Default::default() };
        let page = repo.list(&query).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.registrations.len(), 2);
        assert_eq!(page.unique_hackathon_ids, vec!["hack-1".to_string()]);

        let query = RegistrationQuery { payment_method: "qrcode".to_string(), ..Default::default() };
        assert_eq!(repo.list(&query).await.unwrap().total, 2);

        let query = RegistrationQuery { status: "all".to_string(), ..Default::default() };
        assert_eq!(repo.list(&query).await.unwrap().total, 5);

        let query = RegistrationQuery { search: "USER3".to_string(), ..Default::default() };
        assert_eq!(repo.list(&query).await.unwrap().total, 1);

        let query = RegistrationQuery { limit: 10_000, ..Default::default() };
        assert_eq!(repo.list(&query).await.unwrap().total_pages, 1);

        let query = RegistrationQuery { page: usize::MAX, limit: 2, ..Default::default() };
        assert!(matches!(repo.list(&query).await, Err(HackPortalError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_unknown_registration() {
        let repo = RegistrationRepository::new();
        assert!(matches!(
            repo.update("missing", UpdateRegistrationRequest::default()).await,
            Err(HackPortalError::RegistrationNotFound { .. })
        ));
    }
}
