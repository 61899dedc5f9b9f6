//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{HackPortalError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_notification_config(&settings.notifications)?;
    validate_keypad_config(&settings.keypad)?;
    validate_rate_limit_config(&settings.rate_limit)?;
    validate_upload_config(&settings.uploads)?;
    validate_logging_config(&settings.logging)?;

    if settings.features.whatsapp_gateway {
        validate_whatsapp_config(&settings.whatsapp)?;
    }

    if settings.features.payments {
        validate_payment_config(&settings.payment)?;
    }

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(HackPortalError::Config(
            "Server host is required".to_string()
        ));
    }

    if config.workers == Some(0) {
        return Err(HackPortalError::Config(
            "Worker count must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate messaging vendor configuration
fn validate_whatsapp_config(config: &super::WhatsAppConfig) -> Result<()> {
    url::Url::parse(&config.api_base_url)?;

    if config.account_sid.is_empty() {
        return Err(HackPortalError::Config(
            "Twilio account SID is required".to_string()
        ));
    }

    if config.auth_token.is_empty() {
        return Err(HackPortalError::Config(
            "Twilio auth token is required".to_string()
        ));
    }

    if config.from_number.is_empty() {
        return Err(HackPortalError::Config(
            "WhatsApp sender number is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(HackPortalError::Config(
            "Messaging timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate payment vendor configuration
fn validate_payment_config(config: &super::PaymentConfig) -> Result<()> {
    url::Url::parse(&config.api_base_url)?;

    if config.key_id.is_empty() || config.key_secret.is_empty() {
        return Err(HackPortalError::Config(
            "Razorpay key id and secret are required".to_string()
        ));
    }

    if config.currency.len() != 3 {
        return Err(HackPortalError::Config(
            format!("Invalid currency code: {}", config.currency)
        ));
    }

    Ok(())
}

/// Validate notification timings
fn validate_notification_config(config: &super::NotificationConfig) -> Result<()> {
    if config.exit_delay_ms == 0 {
        return Err(HackPortalError::Config(
            "Notification exit delay must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate keypad configuration
fn validate_keypad_config(config: &super::KeypadConfig) -> Result<()> {
    if config.unlock_code.len() != crate::state::keypad::CODE_LENGTH
        || !config.unlock_code.chars().all(|c| c.is_ascii_digit())
    {
        return Err(HackPortalError::Config(
            "Keypad unlock code must be exactly 6 digits".to_string()
        ));
    }

    Ok(())
}

/// Validate rate limit configuration
fn validate_rate_limit_config(config: &super::RateLimitSettings) -> Result<()> {
    if config.max_requests == 0 {
        return Err(HackPortalError::Config(
            "Rate limit max requests must be greater than 0".to_string()
        ));
    }

    if config.window_seconds == 0 {
        return Err(HackPortalError::Config(
            "Rate limit window must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate screenshot upload configuration
fn validate_upload_config(config: &super::UploadConfig) -> Result<()> {
    if config.directory.trim().is_empty() {
        return Err(HackPortalError::Config(
            "Upload directory is required".to_string()
        ));
    }

    if config.max_file_bytes == 0 {
        return Err(HackPortalError::Config(
            "Upload size limit must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(HackPortalError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(HackPortalError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
