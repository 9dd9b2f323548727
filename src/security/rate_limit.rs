//! Per-client rate limiting middleware.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::time::Instant;

use crate::config::RateLimitConfig;
use crate::observability::metrics;

/// A simple token bucket rate limiter.
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    /// Take one token, or return how long until one is available.
    fn try_acquire(&mut self, capacity: f64, refill_rate: f64) -> Result<(), Duration> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64((1.0 - self.tokens) / refill_rate))
        }
    }
}

struct Buckets {
    by_client: HashMap<String, TokenBucket>,
    last_sweep: Instant,
}

/// Buckets keyed by client identity.
///
/// A bucket idle for a full window has refilled to capacity and is
/// indistinguishable from a fresh one, so such buckets are swept at most
/// once per window.
pub struct RateLimiterState {
    buckets: Mutex<Buckets>,
    capacity: f64,
    refill_rate: f64,
    window: Duration,
}

impl RateLimiterState {
    /// `max_requests` per `window_secs`, refilled continuously.
    pub fn new(config: &RateLimitConfig) -> Self {
        let capacity = config.max_requests as f64;
        Self {
            buckets: Mutex::new(Buckets {
                by_client: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            capacity,
            refill_rate: capacity / config.window_secs as f64,
            window: Duration::from_secs(config.window_secs),
        }
    }

    pub fn check(&self, key: &str) -> Result<(), Duration> {
        // A panic mid-update leaves a bucket merely stale.
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);

        let now = Instant::now();
        if now.duration_since(buckets.last_sweep) >= self.window {
            let window = self.window;
            let before = buckets.by_client.len();
            buckets
                .by_client
                .retain(|_, bucket| now.duration_since(bucket.last_update) < window);
            buckets.last_sweep = now;
            tracing::debug!(
                removed = before - buckets.by_client.len(),
                remaining = buckets.by_client.len(),
                "Swept idle rate limit buckets"
            );
        }

        let bucket = buckets
            .by_client
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.capacity));

        bucket.try_acquire(self.capacity, self.refill_rate)
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_client
            .len()
    }
}

/// First `x-forwarded-for` entry, else the peer IP.
pub fn client_key(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitedBody {
    code: u16,
    error: &'static str,
    message: String,
    expires_in: u64,
}

fn rejection(retry_after: Duration) -> Response {
    let secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;
    let body = RateLimitedBody {
        code: StatusCode::TOO_MANY_REQUESTS.as_u16(),
        error: "Too Many Requests",
        message: format!("Rate limit exceeded, retry in {} seconds", secs),
        expires_in: secs,
    };

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(secs));
    response
}

/// Middleware function for per-client rate limiting.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(request.headers(), addr);

    match state.check(&key) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            tracing::warn!(
                client = %key,
                path = %request.uri().path(),
                retry_after_ms = retry_after.as_millis() as u64,
                "Rate limit exceeded"
            );
            metrics::record_rate_limited("client_limit");
            rejection(retry_after)
        }
    }
}
