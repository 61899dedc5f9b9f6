//! Logging middleware
//!
//! Records one structured line per HTTP request with its outcome and
//! latency, and flags slow or failing requests.

use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures::future::{ready, LocalBoxFuture, Ready};
use tracing::{error, info, warn};

const SLOW_REQUEST: Duration = Duration::from_millis(1000);

/// Request logging middleware
#[derive(Clone)]
pub struct RequestLogging {
    log_performance: bool,
}

impl RequestLogging {
    pub fn new(log_performance: bool) -> Self {
        Self { log_performance }
    }
}

impl Default for RequestLogging {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggingMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggingMiddleware {
            service: Rc::new(service),
            log_performance: self.log_performance,
        }))
    }
}

/// Service wrapper produced by [`RequestLogging`]
pub struct RequestLoggingMiddleware<S> {
    service: Rc<S>,
    log_performance: bool,
}

impl<S, B> Service<ServiceRequest> for RequestLoggingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().to_string();
        let path = req.path().to_string();
        let started = Instant::now();
        let log_performance = self.log_performance;
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let result = service.call(req).await;
            let elapsed = started.elapsed();

            match &result {
                Ok(res) => log_request(&method, &path, res.status().as_u16(), elapsed, log_performance),
                Err(e) => error!(method = %method, path = %path, error = %e, "Request failed"),
            }

            result
        })
    }
}

fn log_request(method: &str, path: &str, status: u16, elapsed: Duration, log_performance: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if status >= 500 {
        warn!(method = method, path = path, status = status, duration_ms = duration_ms, "Request completed with server error");
    } else {
        info!(method = method, path = path, status = status, duration_ms = duration_ms, "Request completed");
    }

    if log_performance && elapsed >= SLOW_REQUEST {
        warn!(method = method, path = path, duration_ms = duration_ms, "Slow request detected");
    }
}
