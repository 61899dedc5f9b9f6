//! Database repositories module
//!
//! In-memory repositories; each one owns its collection behind an async lock

pub mod lobby;
pub mod notification;
pub mod order;
pub mod registration;
pub mod team_message;

// Re-export repositories
pub use lobby::LobbyRepository;
pub use notification::NotificationRepository;
pub use order::{OrderRepository, NewOrder};
pub use registration::{RegistrationRepository, NewRegistration};
pub use team_message::{TeamMessageRepository, NewTeamMessage};
