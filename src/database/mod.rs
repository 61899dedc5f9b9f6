//! Database module
//!
//! In-process storage: repositories behind async locks plus a service
//! aggregating them. Nothing is persisted across restarts.

pub mod repositories;
pub mod service;

// Re-export commonly used database components
pub use repositories::{
    LobbyRepository, NotificationRepository, OrderRepository, RegistrationRepository, TeamMessageRepository,
    NewOrder, NewRegistration, NewTeamMessage,
};
pub use service::DatabaseService;
