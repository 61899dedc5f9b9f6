//! Services module
//!
//! This module contains business logic services

pub mod lobby;
pub mod notification;
pub mod payment;
pub mod registration;
pub mod team_chat;
pub mod uploads;
pub mod whatsapp;

// Re-export commonly used services
pub use lobby::LobbyService;
pub use notification::{NotificationService, UserFeed};
pub use payment::{PaymentService, PaymentGateway, RazorpayClient, GatewayOrder, GatewayOrderRequest, CreatedOrder};
pub use registration::{RegistrationService, FreeRegistrationOutcome, JoinOutcome};
pub use team_chat::TeamChatService;
pub use uploads::{ScreenshotUpload, UploadStore};
pub use whatsapp::{WhatsAppService, MessagingClient, TwilioClient};

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub whatsapp_service: WhatsAppService,
    pub lobby_service: LobbyService,
    pub notification_service: NotificationService,
    pub payment_service: PaymentService,
    pub registration_service: RegistrationService,
    pub team_chat_service: TeamChatService,
}

impl ServiceFactory {
    /// Create all services over the vendor HTTP clients
    pub fn new(settings: &Settings, database: DatabaseService) -> Result<Self> {
        let messaging = Arc::new(TwilioClient::new(&settings.whatsapp)?);
        let payments = Arc::new(RazorpayClient::new(&settings.payment)?);
        Ok(Self::with_clients(settings, database, messaging, payments))
    }

    /// Create all services over the given vendor clients
    pub fn with_clients(
        settings: &Settings,
        database: DatabaseService,
        messaging: Arc<dyn MessagingClient>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        let whatsapp_service = WhatsAppService::new(messaging, settings.whatsapp.from_number.clone());
        let lobby_service = LobbyService::new(database.lobbies.clone());
        let notification_service =
            NotificationService::new(database.notifications.clone(), settings.notifications.clone());
        let payment_service = PaymentService::new(payments, database.clone(), settings.payment.clone());
        let team_chat_service = TeamChatService::new(database.team_messages.clone());
        let registration_service = RegistrationService::new(
            database,
            payment_service.clone(),
            UploadStore::new(&settings.uploads),
            settings.payment.clone(),
        );

        Self {
            whatsapp_service,
            lobby_service,
            notification_service,
            payment_service,
            registration_service,
            team_chat_service,
        }
    }
}
