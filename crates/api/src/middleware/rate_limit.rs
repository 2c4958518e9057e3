//! Rate limiting middleware.
//!
//! Limits requests per authenticated user with a keyed GCRA limiter.
//! Anonymous requests are not limited here; they fail authentication anyway
//! unless the route is public.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use serde_json::json;
use std::num::NonZeroU32;

use crate::app::AppState;
use crate::extractors::caller::bearer_token;

/// Stale per-user entries are pruned once the map grows past this size.
const PRUNE_THRESHOLD: usize = 10_000;

const FALLBACK_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(300) {
    Some(n) => n,
    None => unreachable!(),
};

/// Rate limiter state shared across all requests, keyed by user id.
pub struct RateLimiterState {
    limiter: DefaultKeyedRateLimiter<i64>,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// A limit of 0 falls back to the default of 300 per minute.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(rate_limit_per_minute).unwrap_or(FALLBACK_PER_MINUTE);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute: per_minute.get(),
        }
    }

    pub fn limit(&self) -> u32 {
        self.rate_limit_per_minute
    }

    /// `Err` carries the number of seconds to wait, at least 1.
    pub fn check(&self, user_id: i64) -> Result<(), u64> {
        if self.limiter.len() > PRUNE_THRESHOLD {
            self.limiter.retain_recent();
        }

        self.limiter.check_key(&user_id).map_err(|not_until| {
            not_until
                .wait_time_from(self.clock.now())
                .as_secs()
                .max(1)
        })
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_users", &self.limiter.len())
            .finish()
    }
}

/// Applies the per-user limit when the request carries a valid token.
///
/// The token is only decoded here; whether the user exists and is active is
/// decided by the `Caller` extractor.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(rate_limiter) = state.rate_limiter.as_ref() else {
        return next.run(req).await;
    };

    let user_id = bearer_token(req.headers())
        .and_then(|token| state.jwt.validate_token(token).ok())
        .and_then(|claims| shared::jwt::extract_user_id(&claims).ok());

    if let Some(user_id) = user_id {
        if let Err(retry_after) = rate_limiter.check(user_id) {
            tracing::debug!(user_id, retry_after, "Rate limit exceeded");
            return rate_limited_response(rate_limiter.limit(), retry_after);
        }
    }

    next.run(req).await
}

fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limited",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retryAfter": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}
