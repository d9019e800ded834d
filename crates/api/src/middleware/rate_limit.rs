//! Fixed-window request limiting keyed by client IP.
//!
//! Applied per route group with `axum::middleware::from_fn_with_state`.
//! Clients are identified by the peer address from `ConnectInfo`; requests
//! without one (in-process tests) share the `"unknown"` bucket.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::Mutex;

use crate::config::RateLimitConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Tracked clients above which expired windows are pruned.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Allows `limit` requests per client per `window`. A limit of 0 disables it.
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    clients: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    /// Count a request from `key`. `Err` carries the time until the window
    /// resets.
    pub async fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now()).await
    }

    async fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        if self.limit == 0 {
            return Ok(());
        }

        let mut clients = self.clients.lock().await;
        if clients.len() > PRUNE_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = clients.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        let elapsed = now.duration_since(entry.started);
        if elapsed >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.limit {
            return Err(self.window.saturating_sub(now.duration_since(entry.started)));
        }
        entry.count += 1;
        Ok(())
    }
}

/// One limiter per rate-limited route group.
pub struct RateLimiters {
    pub auth: RateLimiter,
    pub upload: RateLimiter,
}

impl RateLimiters {
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self {
            auth: RateLimiter::per_minute(config.auth_per_min),
            upload: RateLimiter::per_minute(config.upload_per_min),
        }
    }
}

/// Middleware for `/api/auth/*`.
pub async fn limit_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request);
    enforce(&state.rate_limits.auth, key).await?;
    Ok(next.run(request).await)
}

/// Middleware for the upload endpoints.
pub async fn limit_uploads(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request);
    enforce(&state.rate_limits.upload, key).await?;
    Ok(next.run(request).await)
}

/// Takes an owned key: a `&Request` held across the await makes the
/// middleware future `!Send`.
async fn enforce(limiter: &RateLimiter, key: String) -> Result<(), AppError> {
    limiter.check(&key).await.map_err(|retry_after| {
        tracing::warn!(client = %key, "Rate limit exceeded");
        AppError::TooManyRequests {
            retry_after_secs: retry_after.as_secs().max(1),
        }
    })
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_up_to_limit_then_rejects() {
        let limiter = RateLimiter::per_minute(2);
        let now = Instant::now();
        assert!(limiter.check_at("a", now).await.is_ok());
        assert!(limiter.check_at("a", now).await.is_ok());
        let retry = limiter.check_at("a", now).await.unwrap_err();
        assert_eq!(retry, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn clients_are_counted_separately() {
        let limiter = RateLimiter::per_minute(1);
        let now = Instant::now();
        assert!(limiter.check_at("a", now).await.is_ok());
        assert!(limiter.check_at("b", now).await.is_ok());
        assert!(limiter.check_at("a", now).await.is_err());
    }

    #[tokio::test]
    async fn window_resets() {
        let limiter = RateLimiter::per_minute(1);
        let now = Instant::now();
        assert!(limiter.check_at("a", now).await.is_ok());
        assert!(limiter.check_at("a", now + Duration::from_secs(30)).await.is_err());
        assert!(limiter.check_at("a", now + Duration::from_secs(61)).await.is_ok());
    }

    fn assert_send<F: std::future::Future + Send>(future: F) -> F {
        future
    }

    #[tokio::test]
    async fn enforce_is_send_and_maps_to_too_many_requests() {
        let limiter = RateLimiter::per_minute(1);
        assert!(assert_send(enforce(&limiter, "10.0.0.1".to_string())).await.is_ok());

        let err = assert_send(enforce(&limiter, "10.0.0.1".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::TooManyRequests { retry_after_secs: 1..=60 }
        ));
    }

    #[tokio::test]
    async fn zero_disables_the_limit() {
        let limiter = RateLimiter::per_minute(0);
        for _ in 0..100 {
            assert!(limiter.check("a").await.is_ok());
        }
    }
}
