//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the HackPortal backend.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::{HackPortalError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file appender; keep it alive for the
/// lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.directory)?;
    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(stdout_layer)
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| HackPortalError::Config(format!("Failed to install subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log an outbound WhatsApp message
pub fn log_outbound_message(to: &str, message_id: &str, status: &str) {
    info!(
        to = %super::helpers::mask_phone(to),
        message_id = message_id,
        status = status,
        "WhatsApp message forwarded"
    );
}

/// Log an inbound WhatsApp webhook
pub fn log_inbound_message(from: Option<&str>, body: Option<&str>) {
    match (from, body) {
        (Some(from), Some(body)) => info!(
            from = %super::helpers::mask_phone(from),
            body = body,
            "Received WhatsApp message"
        ),
        _ => warn!(
            from = from,
            body = body,
            "Received WhatsApp webhook without sender or body"
        ),
    }
}

/// Log lobby membership changes
pub fn log_lobby_action(lobby_id: &str, action: &str, user_id: &str, participants: u32) {
    info!(
        lobby_id = lobby_id,
        action = action,
        user_id = user_id,
        participants = participants,
        "Lobby action performed"
    );
}

/// Log registration and payment actions
pub fn log_registration_action(hackathon_id: &str, action: &str, email: &str, details: Option<&str>) {
    info!(
        hackathon_id = hackathon_id,
        action = action,
        email = email,
        details = details,
        "Registration action performed"
    );
}

/// Log admin actions
pub fn log_admin_action(action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log vendor API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}

/// Log performance metrics
pub fn log_performance_metric(metric_name: &str, value: f64, unit: &str) {
    debug!(
        metric = metric_name,
        value = value,
        unit = unit,
        "Performance metric recorded"
    );
}
