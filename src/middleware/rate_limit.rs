//! Rate limiting middleware
//!
//! Sliding-window limiter keyed by client address, wired into actix-web as a
//! `Transform` that answers 429 once a client runs out of requests.
//!
//! The key is the TCP peer address. Forwarding headers are only honoured
//! when `trust_proxy_headers` is set, since any client can send them.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures::future::{ready, LocalBoxFuture, Ready};
use serde_json::json;
use tracing::{debug, info, warn};
use crate::config::settings::RateLimitSettings;
use crate::utils::errors::{HackPortalError, Result};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Sliding window length
    pub window_duration: Duration,
    /// Extra requests tolerated once per window
    pub burst_allowance: u32,
    /// Key on `Forwarded`/`X-Forwarded-For` instead of the peer address
    pub trust_proxy_headers: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_duration: Duration::from_secs(15 * 60),
            burst_allowance: 0,
            trust_proxy_headers: false,
        }
    }
}

impl From<&RateLimitSettings> for RateLimitConfig {
    fn from(settings: &RateLimitSettings) -> Self {
        Self {
            max_requests: settings.max_requests,
            window_duration: Duration::from_secs(settings.window_seconds),
            burst_allowance: settings.burst_allowance,
            trust_proxy_headers: settings.trust_proxy_headers,
        }
    }
}

#[derive(Debug, Clone)]
struct RateLimitEntry {
    requests: Vec<Instant>,
    burst_used: u32,
    last_reset: Instant,
}

impl RateLimitEntry {
    fn new(now: Instant) -> Self {
        Self {
            requests: Vec::new(),
            burst_used: 0,
            last_reset: now,
        }
    }

    /// Drop requests that fell out of the window
    fn cleanup(&mut self, window: Duration, now: Instant) {
        self.requests.retain(|&time| now.duration_since(time) < window);

        if now.duration_since(self.last_reset) >= window {
            self.burst_used = 0;
            self.last_reset = now;
        }
    }

    fn is_allowed(&mut self, config: &RateLimitConfig, now: Instant) -> bool {
        self.cleanup(config.window_duration, now);

        if (self.requests.len() as u32) < config.max_requests {
            return true;
        }

        if self.burst_used < config.burst_allowance {
            self.burst_used += 1;
            return true;
        }

        false
    }
}

/// Shared per-client request ledger
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, RateLimitEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Count one request for `client`, failing once the window is used up
    pub fn check(&self, client: &str) -> Result<()> {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: &str, now: Instant) -> Result<()> {
        let mut entries = self.entries();
        let entry = entries
            .entry(client.to_string())
            .or_insert_with(|| RateLimitEntry::new(now));

        if entry.is_allowed(&self.config, now) {
            entry.requests.push(now);
            debug!(client = %client, requests = entry.requests.len(), "Rate limit check passed");
            Ok(())
        } else {
            warn!(client = %client, "Rate limit exceeded");
            Err(HackPortalError::RateLimitExceeded)
        }
    }

    /// Drop clients with no request in the last two windows
    pub fn cleanup_old_entries(&self, now: Instant) -> usize {
        let horizon = self.config.window_duration * 2;
        let mut entries = self.entries();
        entries.retain(|_, entry| entry.requests.iter().any(|&time| now.duration_since(time) < horizon));
        debug!(remaining_entries = entries.len(), "Cleaned up old rate limit entries");
        entries.len()
    }
}

impl RateLimiter {
    /// Prune idle clients once per window for as long as the runtime lives
    pub fn spawn_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let limiter = self.clone();
        let period = self.config.window_duration;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let remaining = limiter.cleanup_old_entries(tokio::time::Instant::now().into_std());
                debug!(remaining_entries = remaining, "Rate limit cleanup tick");
            }
        });

        info!("Started rate limit cleanup task with interval {:?}", period);
        handle
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

/// Actix middleware enforcing a [`RateLimiter`]
///
/// ```ignore
/// App::new().wrap(RateLimit::new(RateLimiter::default()))
/// ```
#[derive(Clone)]
pub struct RateLimit {
    limiter: RateLimiter,
}

impl RateLimit {
    pub fn new(limiter: RateLimiter) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`]
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: RateLimiter,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = client_key(&req, self.limiter.config().trust_proxy_headers);

        if self.limiter.check(&client).is_err() {
            let response = HttpResponse::TooManyRequests().json(json!({
                "success": false,
                "error": "Too many requests, please try again later.",
            }));
            return Box::pin(ready(Ok(req.into_response(response))));
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let res = service.call(req).await?;
            Ok(res.map_into_boxed_body())
        })
    }
}

/// Identify the caller; forwarding headers count only behind a trusted proxy
fn client_key(req: &ServiceRequest, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(addr) = req.connection_info().realip_remote_addr() {
            return addr.to_string();
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    fn limiter(max_requests: u32, burst_allowance: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests,
            window_duration: Duration::from_secs(60),
            burst_allowance,
            trust_proxy_headers: false,
        })
    }

    #[::core::prelude::v1::test]
    fn test_rate_limit_basic() {
        let limiter = limiter(3, 1);
        let now = Instant::now();

        assert!(limiter.check_at("10.0.0.1", now).is_ok());
        assert!(limiter.check_at("10.0.0.1", now).is_ok());
        assert!(limiter.check_at("10.0.0.1", now).is_ok());
        // burst
        assert!(limiter.check_at("10.0.0.1", now).is_ok());
        assert!(limiter.check_at("10.0.0.1", now).is_err());

        // other clients have their own window
        assert!(limiter.check_at("10.0.0.2", now).is_ok());
    }

    #[::core::prelude::v1::test]
    fn test_window_slides() {
        let limiter = limiter(2, 0);
        let start = Instant::now();

        limiter.check_at("client", start).unwrap();
        limiter.check_at("client", start + Duration::from_secs(30)).unwrap();
        assert!(limiter.check_at("client", start + Duration::from_secs(45)).is_err());

        // the first request has left the window
        assert!(limiter.check_at("client", start + Duration::from_secs(61)).is_ok());
    }

    #[::core::prelude::v1::test]
    fn test_cleanup_drops_idle_clients() {
        let limiter = limiter(5, 0);
        let now = Instant::now();

        limiter.check_at("idle", now).unwrap();
        limiter.check_at("busy", now + Duration::from_secs(100)).unwrap();

        assert_eq!(limiter.cleanup_old_entries(now + Duration::from_secs(60)), 2);
        assert_eq!(limiter.cleanup_old_entries(now + Duration::from_secs(121)), 1);
        assert_eq!(limiter.cleanup_old_entries(now + Duration::from_secs(221)), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_prunes_each_window() {
        let limiter = limiter(5, 0);
        limiter.check_at("idle", tokio::time::Instant::now().into_std()).unwrap();
        let handle = limiter.spawn_cleanup();

        // within two windows the client is still tracked
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(limiter.entries().len(), 1);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(limiter.entries().len(), 0);
        handle.abort();
    }

    #[actix_web::test]
    async fn test_middleware_rejects_with_429() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimit::new(limiter(1, 0)))
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let first = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        assert_eq!(first.status(), 200);

        let second = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        assert_eq!(second.status(), 429);
        let body: serde_json::Value = test::read_body_json(second).await;
        assert_eq!(body["success"], false);
    }

    fn ping(peer: &str, forwarded_for: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri("/ping")
            .peer_addr(peer.parse().unwrap())
            .insert_header(("x-forwarded-for", forwarded_for))
    }

    #[actix_web::test]
    async fn test_forwarded_header_ignored_by_default() {
        let app = test::init_service(
            App::new()
                .wrap(RateLimit::new(limiter(1, 0)))
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let first = test::call_service(&app, ping("203.0.113.7:5000", "1.1.1.1").to_request()).await;
        assert_eq!(first.status(), 200);

        // a fresh header value does not buy a fresh window
        let second = test::call_service(&app, ping("203.0.113.7:5001", "2.2.2.2").to_request()).await;
        assert_eq!(second.status(), 429);

        let other_peer = test::call_service(&app, ping("198.51.100.9:5000", "1.1.1.1").to_request()).await;
        assert_eq!(other_peer.status(), 200);
    }

    #[actix_web::test]
    async fn test_forwarded_header_used_behind_trusted_proxy() {
        let mut config = limiter(1, 0).config().clone();
        config.trust_proxy_headers = true;
        let app = test::init_service(
            App::new()
                .wrap(RateLimit::new(RateLimiter::new(config)))
                .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let first = test::call_service(&app, ping("10.0.0.1:5000", "1.1.1.1").to_request()).await;
        assert_eq!(first.status(), 200);
        let second = test::call_service(&app, ping("10.0.0.1:5000", "2.2.2.2").to_request()).await;
        assert_eq!(second.status(), 200);
        let repeat = test::call_service(&app, ping("10.0.0.1:5000", "1.1.1.1").to_request()).await;
        assert_eq!(repeat.status(), 429);
    }
}
