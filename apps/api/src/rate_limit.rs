//! Fixed-window request limiter keyed on client IP, backed by Redis.
//!
//! The first hit in a window creates the counter with a TTL of one window;
//! every hit increments it. When Redis cannot be reached the request is let
//! through and a warning is logged.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use redis::aio::ConnectionManager;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::state::AppState;

const KEY_PREFIX: &str = "resumeup:ratelimit";
/// Reconnect attempts per request while Redis is down.
const CONNECT_RETRIES: usize = 1;

#[derive(Clone)]
pub struct RateLimiter {
    client: redis::Client,
    max_requests: u64,
    window: Duration,
    conn: Arc<OnceCell<ConnectionManager>>,
}

impl RateLimiter {
    pub fn new(client: redis::Client, max_requests: u64, window: Duration) -> Self {
        Self {
            client,
            max_requests,
            window,
            conn: Arc::new(OnceCell::new()),
        }
    }

    async fn connection(&self) -> redis::RedisResult<ConnectionManager> {
        self.conn
            .get_or_try_init(|| {
                self.client
                    .get_connection_manager_with_backoff(2, 100, CONNECT_RETRIES)
            })
            .await
            .cloned()
    }

    /// Counts one request from `client_key` and returns the count for the
    /// current window.
    pub async fn hit(&self, client_key: &str) -> redis::RedisResult<u64> {
        let mut conn = self.connection().await?;
        let key = window_key(client_key);
        let (count,): (u64,) = redis::pipe()
            .cmd("SET")
            .arg(&key)
            .arg(0)
            .arg("EX")
            .arg(self.window.as_secs().max(1))
            .arg("NX")
            .ignore()
            .cmd("INCR")
            .arg(&key)
            .query_async(&mut conn)
            .await?;
        Ok(count)
    }

    pub fn exceeded(&self, count: u64) -> bool {
        count > self.max_requests
    }
}

pub fn window_key(client_key: &str) -> String {
    format!("{KEY_PREFIX}:{client_key}")
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware for the `/api` routes. A no-op when limiting is disabled.
pub async fn enforce(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return Ok(next.run(request).await);
    };

    let key = client_key(&request);
    match limiter.hit(&key).await {
        Ok(count) if limiter.exceeded(count) => {
            debug!("Rate limit exceeded for {key} ({count} requests)");
            return Err(AppError::RateLimited);
        }
        Ok(_) => {}
        Err(e) => warn!("Rate limiter unavailable, allowing request: {e}"),
    }

    Ok(next.run(request).await)
}
