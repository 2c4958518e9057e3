//! Security headers middleware.
//!
//! Adds security-related HTTP headers to all responses.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;

pub const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
pub const X_FRAME_OPTIONS: &str = "x-frame-options";
pub const REFERRER_POLICY: &str = "referrer-policy";

const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";

/// Adds `nosniff`, `DENY` framing and a strict referrer policy to every
/// response. `Strict-Transport-Security` is only sent when
/// `security.hsts_enabled` is set, i.e. behind TLS termination.
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    apply_security_headers(&mut response, state.config.security.hsts_enabled);
    response
}

fn apply_security_headers(response: &mut Response, hsts_enabled: bool) {
    let headers = response.headers_mut();

    headers.insert(
        header::HeaderName::from_static(X_CONTENT_TYPE_OPTIONS),
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::HeaderName::from_static(X_FRAME_OPTIONS),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        header::HeaderName::from_static(REFERRER_POLICY),
        HeaderValue::from_static("no-referrer"),
    );

    if hsts_enabled {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_VALUE),
        );
    }
}
