//! Test context for unified test setup
//!
//! Starts the vendor mocks, points the settings at them and builds the
//! services and actix app the way the binary does.

use actix_web::{web, App};
use hackportal::config::Settings;
use hackportal::database::DatabaseService;
use hackportal::handlers;
use hackportal::middleware::RequestLogging;
use hackportal::services::ServiceFactory;
use tempfile::TempDir;

use super::razorpay_mock::{RazorpayMockServer, TEST_KEY_ID, TEST_KEY_SECRET};
use super::twilio_mock::{TwilioMockServer, TEST_ACCOUNT_SID, TEST_AUTH_TOKEN, TEST_FROM_NUMBER};

/// Unified test context that manages all test components
pub struct TestContext {
    pub twilio: TwilioMockServer,
    pub razorpay: RazorpayMockServer,
    pub settings: Settings,
    pub database: DatabaseService,
    pub services: ServiceFactory,
    /// Screenshot uploads land here; removed when the context drops
    pub uploads: TempDir,
}

impl TestContext {
    /// Context with the demo lobbies seeded
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let ctx = Self::empty().await?;
        ctx.database.seed_demo_lobbies().await?;
        Ok(ctx)
    }

    /// Context with empty repositories
    pub async fn empty() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let twilio = TwilioMockServer::new().await;
        let razorpay = RazorpayMockServer::new().await;
        let uploads = tempfile::tempdir()?;
        let settings = Self::create_test_settings(&twilio, &razorpay, &uploads);
        settings.validate()?;

        let database = DatabaseService::new();
        let services = ServiceFactory::new(&settings, database.clone())?;

        Ok(Self {
            twilio,
            razorpay,
            settings,
            database,
            services,
            uploads,
        })
    }

    fn create_test_settings(twilio: &TwilioMockServer, razorpay: &RazorpayMockServer, uploads: &TempDir) -> Settings {
        let mut settings = Settings::default();

        settings.whatsapp.api_base_url = twilio.uri();
        settings.whatsapp.account_sid = TEST_ACCOUNT_SID.to_string();
        settings.whatsapp.auth_token = TEST_AUTH_TOKEN.to_string();
        settings.whatsapp.from_number = TEST_FROM_NUMBER.to_string();
        settings.whatsapp.timeout_seconds = 5;

        settings.payment.api_base_url = razorpay.uri();
        settings.payment.key_id = TEST_KEY_ID.to_string();
        settings.payment.key_secret = TEST_KEY_SECRET.to_string();
        settings.payment.timeout_seconds = 5;

        settings.uploads.directory = uploads.path().to_string_lossy().into_owned();
        settings.uploads.max_file_bytes = 1024;

        settings.features.seed_demo_data = false;
        settings
    }

    /// The HTTP app as served by the binary, minus rate limiting
    pub fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let features = self.settings.features.clone();
        App::new()
            .app_data(web::Data::new(self.services.clone()))
            .app_data(handlers::json_config())
            .wrap(RequestLogging::default())
            .configure(move |cfg| handlers::configure(cfg, &features))
    }
}
