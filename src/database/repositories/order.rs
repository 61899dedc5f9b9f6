//! Payment order repository implementation

use std::sync::Arc;
use chrono::Utc;
use tokio::sync::RwLock;
use crate::models::registration::{PaymentOrder, OrderStatus, PaymentMethod};
use crate::utils::errors::HackPortalError;
use crate::utils::helpers::generate_uuid;

/// Fields needed to record a vendor order
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: String,
    pub amount: f64,
    pub currency: String,
    pub hackathon_id: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub whatsapp: Option<String>,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Default)]
pub struct OrderRepository {
    orders: Arc<RwLock<Vec<PaymentOrder>>>,
}

impl OrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly created vendor order
    pub async fn create(&self, order: NewOrder) -> Result<PaymentOrder, HackPortalError> {
        let mut orders = self.orders.write().await;
        if orders.iter().any(|o| o.order_id == order.order_id) {
            return Err(HackPortalError::Duplicate(format!("Order {} already exists", order.order_id)));
        }

        let now = Utc::now();
        let record = PaymentOrder {
            id: generate_uuid(),
            order_id: order.order_id,
            amount: order.amount,
            currency: order.currency,
            hackathon_id: order.hackathon_id,
            name: order.name,
            email: order.email,
            contact: order.contact,
            whatsapp: order.whatsapp,
            status: OrderStatus::Created,
            payment_method: order.payment_method,
            payment_id: None,
            signature: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        orders.push(record.clone());
        Ok(record)
    }

    /// Find order by the vendor's order id
    pub async fn find_by_vendor_id(&self, order_id: &str) -> Result<Option<PaymentOrder>, HackPortalError> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.order_id == order_id).cloned())
    }

    /// Deactivate every active order placed by `email`; returns how many changed
    pub async fn deactivate_for_email(&self, email: &str) -> Result<usize, HackPortalError> {
        let mut orders = self.orders.write().await;
        let now = Utc::now();
        let mut changed = 0;
        for order in orders.iter_mut().filter(|o| o.is_active && o.email == email) {
            order.is_active = false;
            order.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }

    /// Settle an order after verification
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        payment_id: Option<String>,
        signature: Option<String>,
    ) -> Result<PaymentOrder, HackPortalError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| HackPortalError::OrderNotFound { order_id: order_id.to_string() })?;

        order.status = status;
        if payment_id.is_some() {
            order.payment_id = payment_id;
        }
        if signature.is_some() {
            order.signature = signature;
        }
        if status == OrderStatus::Failed {
            order.is_active = false;
        }
        order.updated_at = Utc::now();

        Ok(order.clone())
    }

    /// Most recent order for a registrant in any of `statuses`
    pub async fn latest_for(
        &self,
        hackathon_id: &str,
        email: &str,
        statuses: &[OrderStatus],
    ) -> Result<Option<PaymentOrder>, HackPortalError> {
        let orders = self.orders.read().await;
        Ok(orders
            .iter()
            .filter(|o| o.hackathon_id == hackathon_id && o.email == email && statuses.contains(&o.status))
            .max_by_key(|o| o.updated_at)
            .cloned())
    }
}
