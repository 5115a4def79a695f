use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use consigliere_models::RateLimitConfig;
use moka::future::Cache;
use tracing::warn;

use crate::error::ApiError;

/// Header naming the caller. Requests without it share one bucket.
pub const CLIENT_ID_HEADER: &str = "x-client-id";
pub const ANONYMOUS_CLIENT: &str = "anonymous";

/// Fixed-window request limiter keyed by caller identity.
///
/// A window opens on a caller's first request and lasts `window`; the
/// counter expires with it, so the next request after expiry starts fresh.
pub struct RateLimiter {
    windows: Cache<String, Arc<AtomicU32>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration, max_tracked_clients: u64) -> Self {
        Self {
            windows: Cache::builder()
                .max_capacity(max_tracked_clients)
                .time_to_live(window)
                .build(),
            max_requests,
            window,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.max_requests,
            Duration::from_secs(config.window_seconds),
            config.max_tracked_clients,
        )
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count a request against `client`'s window. False once the window is full.
    pub async fn try_acquire(&self, client: &str) -> bool {
        let counter = self
            .windows
            .get_with(client.to_string(), async { Arc::new(AtomicU32::new(0)) })
            .await;
        counter.fetch_add(1, Ordering::SeqCst) < self.max_requests
    }
}

pub fn client_id(headers: &HeaderMap) -> String {
    headers
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(ANONYMOUS_CLIENT)
        .to_string()
}

/// Middleware rejecting callers over their limit with 429.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = client_id(request.headers());
    if !limiter.try_acquire(&client).await {
        warn!(client = %client, path = %request.uri().path(), "Rate limit exceeded");
        return Err(ApiError::RateLimited(limiter.window().as_secs()));
    }
    Ok(next.run(request).await)
}
