use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    used: u32,
}

/// Per-second request budget shared by every caller of the wrapped routes.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    budget: u32,
    window: Arc<Mutex<Window>>,
}

impl RateLimiter {
    pub fn new(requests_per_second: u32) -> Self {
        Self {
            budget: requests_per_second.max(1),
            window: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                used: 0,
            })),
        }
    }

    /// Spends one request from the budget, or returns how long until it refills.
    fn acquire_at(&self, now: Instant) -> Result<(), Duration> {
        let mut window = self.window.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let age = now.saturating_duration_since(window.opened_at);
        if age >= WINDOW {
            *window = Window {
                opened_at: now,
                used: 0,
            };
        }

        if window.used >= self.budget {
            return Err(WINDOW.saturating_sub(age.min(WINDOW)));
        }
        window.used += 1;
        Ok(())
    }
}

pub async fn rps_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match limiter.acquire_at(Instant::now()) {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            tracing::warn!(path = %req.uri().path(), wait_ms = wait.as_millis() as u64, "Rate limit exceeded");
            // Retry-After is whole seconds; a partial window rounds up to 1.
            let retry_after = HeaderValue::from(wait.as_secs().max(1));
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after)],
                Json(json!({ "error": "rate_limit_exceeded" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_spent_then_refilled_after_a_window() {
        let limiter = RateLimiter::new(2);
        let start = Instant::now();

        assert!(limiter.acquire_at(start).is_ok());
        assert!(limiter.acquire_at(start).is_ok());
        let wait = limiter
            .acquire_at(start + Duration::from_millis(400))
            .unwrap_err();
        assert!(wait <= Duration::from_millis(600));

        assert!(limiter.acquire_at(start + Duration::from_secs(2)).is_ok());
    }

    #[test]
    fn zero_budget_still_admits_one_request() {
        let limiter = RateLimiter::new(0);
        let now = Instant::now();
        assert!(limiter.acquire_at(now).is_ok());
        assert!(limiter.acquire_at(now).is_err());
    }
}
