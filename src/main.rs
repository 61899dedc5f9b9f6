//! HackPortal backend
//!
//! Main application entry point

use actix_web::middleware::Condition;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use hackportal::{
    config::Settings,
    database::DatabaseService,
    handlers,
    middleware::{RateLimit, RateLimitConfig, RateLimiter, RequestLogging},
    services::ServiceFactory,
    utils::logging,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenv::dotenv() {
        eprintln!("No .env file loaded: {}", e);
    }

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate().context("invalid configuration")?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", hackportal::info());

    let database = DatabaseService::new();
    if settings.features.seed_demo_data {
        database.seed_demo_lobbies().await?;
    }

    info!("Initializing services...");
    let services = web::Data::new(ServiceFactory::new(&settings, database)?);

    if !settings.features.whatsapp_gateway {
        warn!("WhatsApp gateway disabled");
    }
    if !settings.features.payments {
        warn!("Payments disabled");
    }

    let limiter = RateLimiter::new(RateLimitConfig::from(&settings.rate_limit));
    let rate_limiting = settings.features.rate_limiting;
    if rate_limiting {
        limiter.spawn_cleanup();
    }
    let features = settings.features.clone();
    let bind_address = settings.bind_address();

    let mut server = HttpServer::new(move || {
        let features = features.clone();
        App::new()
            .app_data(services.clone())
            .app_data(handlers::json_config())
            .wrap(Condition::new(rate_limiting, RateLimit::new(limiter.clone())))
            .wrap(RequestLogging::default())
            .configure(move |cfg| handlers::configure(cfg, &features))
    });
    if let Some(workers) = settings.server.workers {
        server = server.workers(workers);
    }

    info!(host = %bind_address.0, port = bind_address.1, "Listening");
    server
        .bind(bind_address)
        .context("failed to bind HTTP listener")?
        .run()
        .await?;

    info!("HackPortal has been shut down.");
    Ok(())
}
