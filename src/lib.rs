//! HackPortal backend
//!
//! Backend for a hackathon platform: a WhatsApp messaging gateway, hackathon
//! lobbies, in-app notifications, registrations with payments, and the
//! client-side flows (notification display, registration wizard, drawer
//! keypad) modelled as state machines.

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod state;
pub mod utils;
pub mod middleware;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{HackPortalError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use state::{Keypad, NotificationCenter, RegistrationWizard};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
