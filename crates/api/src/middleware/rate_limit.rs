//! Fixed-window rate limiting keyed by `(client, route class)`.
//!
//! Counters live in a process-wide [`DashMap`]; the entry API gives the
//! atomic read-modify-write the contract requires under concurrent
//! increments. Windows reset on wall-clock elapse; nothing is persisted.
//! Keys are client-supplied, so stale counters must be reclaimed
//! ([`RateLimiter::evict_stale`]) or the map grows without bound.

use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use gatehouse_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Rate-limit bucket grouping endpoints by abuse sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    Default,
    Auth,
    Api,
}

/// A request budget: at most `max_requests` per `window`.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    pub max_requests: u32,
    pub window: Duration,
}

impl RouteClass {
    /// The configured budget for this class.
    pub fn quota(self) -> Quota {
        match self {
            RouteClass::Default => Quota {
                max_requests: 100,
                window: Duration::from_secs(15 * 60),
            },
            RouteClass::Auth => Quota {
                max_requests: 5,
                window: Duration::from_secs(60 * 60),
            },
            RouteClass::Api => Quota {
                max_requests: 50,
                window: Duration::from_secs(15 * 60),
            },
        }
    }
}

/// One counter window. Carries its own length so eviction works per entry
/// without consulting the class table.
#[derive(Debug)]
struct Window {
    count: u32,
    started: Instant,
    window: Duration,
}

/// Process-wide fixed-window counters.
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: DashMap<(String, RouteClass), Window>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit or deny one request for `key` under `class`'s configured quota.
    pub fn check(&self, key: &str, class: RouteClass) -> Result<(), CoreError> {
        self.check_quota(key, class, class.quota())
    }

    /// Admit or deny one request against an explicit quota.
    ///
    /// The map entry is held for the whole read-modify-write, so concurrent
    /// callers serialize per key and cannot overshoot the limit.
    pub fn check_quota(&self, key: &str, class: RouteClass, quota: Quota) -> Result<(), CoreError> {
        let mut entry = self
            .windows
            .entry((key.to_string(), class))
            .or_insert_with(|| Window {
                count: 0,
                started: Instant::now(),
                window: quota.window,
            });

        if entry.started.elapsed() >= quota.window {
            entry.count = 0;
            entry.started = Instant::now();
            entry.window = quota.window;
        }

        if entry.count >= quota.max_requests {
            return Err(CoreError::RateLimited);
        }

        entry.count += 1;
        Ok(())
    }

    /// Drop every counter whose window has fully elapsed, returning the
    /// number removed.
    ///
    /// The map is keyed by client-supplied input, so without reclamation an
    /// attacker minting distinct `X-Forwarded-For` values grows it without
    /// bound. An elapsed window carries no state worth keeping (the next
    /// check would reset it anyway), so eviction never changes an admit/deny
    /// decision. Scheduled from the binary's background sweep.
    pub fn evict_stale(&self) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, window| window.started.elapsed() < window.window);
        before.saturating_sub(self.windows.len())
    }
}

/// Identify the client for rate-limiting purposes.
///
/// The first `X-Forwarded-For` hop when present (the service is expected to
/// sit behind a proxy), otherwise a shared fallback key.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Axum middleware: deny with 429 before the handler runs when the client's
/// window is exhausted.
pub async fn rate_limit(
    State((state, class)): State<(AppState, RouteClass)>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(request.headers());
    match state.rate_limiter.check(&key, class) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::warn!(client = %key, ?class, "rate limit exceeded");
            AppError::Core(err).into_response()
        }
    }
}
