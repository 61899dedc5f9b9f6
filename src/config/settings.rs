//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub whatsapp: WhatsAppConfig,
    pub payment: PaymentConfig,
    pub notifications: NotificationConfig,
    pub keypad: KeypadConfig,
    pub rate_limit: RateLimitSettings,
    pub uploads: UploadConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Messaging vendor (Twilio WhatsApp) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WhatsAppConfig {
    pub api_base_url: String,
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub timeout_seconds: u64,
}

/// Payment vendor (Razorpay) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentConfig {
    pub api_base_url: String,
    pub key_id: String,
    pub key_secret: String,
    pub currency: String,
    pub timeout_seconds: u64,
}

/// Notification display timings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    pub mount_delay_ms: u64,
    pub exit_delay_ms: u64,
    pub default_timer_ms: u64,
}

/// Drawer keypad configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeypadConfig {
    pub unlock_code: String,
}

/// Request rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_seconds: u64,
    pub burst_allowance: u32,
    /// Key clients by `Forwarded`/`X-Forwarded-For`; only safe behind a proxy that sets them
    pub trust_proxy_headers: bool,
}

/// Payment screenshot uploads
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    pub directory: String,
    pub max_file_bytes: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
    pub file_name: String,
    pub json: bool,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub whatsapp_gateway: bool,
    pub payments: bool,
    pub rate_limiting: bool,
    pub seed_demo_data: bool,
}

impl Settings {
    /// Load settings from defaults, an optional `config` file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("HACKPORTAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = settings.try_deserialize()?;
        settings.apply_vendor_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Honour the vendor variable names the deployment already uses
    pub fn apply_vendor_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(sid) = lookup("TWILIO_ACCOUNT_SID") {
            self.whatsapp.account_sid = sid;
        }
        if let Some(token) = lookup("TWILIO_AUTH_TOKEN") {
            self.whatsapp.auth_token = token;
        }
        if let Some(number) = lookup("TWILIO_WHATSAPP_NUMBER") {
            self.whatsapp.from_number = number;
        }
        if let Some(key_id) = lookup("RZP_KEY_ID") {
            self.payment.key_id = key_id;
        }
        if let Some(key_secret) = lookup("RZP_KEY_SECRET") {
            self.payment.key_secret = key_secret;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::HackPortalError> {
        super::validation::validate_settings(self)
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5001,
                workers: None,
            },
            whatsapp: WhatsAppConfig {
                api_base_url: "https://api.twilio.com".to_string(),
                account_sid: String::new(),
                auth_token: String::new(),
                from_number: String::new(),
                timeout_seconds: 10,
            },
            payment: PaymentConfig {
                api_base_url: "https://api.razorpay.com".to_string(),
                key_id: String::new(),
                key_secret: String::new(),
                currency: "INR".to_string(),
                timeout_seconds: 10,
            },
            notifications: NotificationConfig {
                mount_delay_ms: 100,
                exit_delay_ms: 300,
                default_timer_ms: 5000,
            },
            keypad: KeypadConfig {
                unlock_code: "234567".to_string(),
            },
            rate_limit: RateLimitSettings {
                max_requests: 100,
                window_seconds: 900,
                burst_allowance: 0,
                trust_proxy_headers: false,
            },
            uploads: UploadConfig {
                directory: "uploads".to_string(),
                max_file_bytes: 5 * 1024 * 1024,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: "logs".to_string(),
                file_name: "hackportal.log".to_string(),
                json: false,
            },
            features: FeaturesConfig {
                whatsapp_gateway: true,
                payments: true,
                rate_limiting: true,
                seed_demo_data: true,
            },
        }
    }
}
