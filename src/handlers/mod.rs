//! HTTP handlers module
//!
//! Actix-web handlers grouped by resource. Each submodule exposes a
//! `configure` function mounting its routes; [`configure`] mounts the ones
//! enabled by the feature flags.

pub mod health;
pub mod lobbies;
pub mod notifications;
pub mod payments;
pub mod registrations;
pub mod response;
pub mod team_messages;
pub mod whatsapp;

pub use response::{json_config, ApiResponse, ApiResult};

use actix_web::web;
use crate::config::settings::FeaturesConfig;

/// Mount every enabled route group
pub fn configure(cfg: &mut web::ServiceConfig, features: &FeaturesConfig) {
    health::configure(cfg);
    lobbies::configure(cfg);
    notifications::configure(cfg);
    registrations::configure(cfg);
    team_messages::configure(cfg);

    if features.whatsapp_gateway {
        whatsapp::configure(cfg);
    }
    if features.payments {
        payments::configure(cfg);
    }
}
