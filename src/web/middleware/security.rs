//! Response hardening headers.

use axum::{
    body::Body,
    http::{
        header::{self, HeaderName, HeaderValue},
        Request,
    },
    middleware::Next,
    response::Response,
};

/// Headers forced onto every response, overriding whatever a handler set.
const FORCED: [(HeaderName, &str); 3] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
];

/// Cache policy used when the handler did not choose one.
const DEFAULT_CACHE_CONTROL: &str = "no-store, max-age=0";

/// Stamp hardening headers on the outgoing response.
///
/// Stored files and stats are private to key holders, so nothing is
/// cacheable unless a handler opts in with its own `Cache-Control`.
pub async fn security_headers(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in FORCED {
        headers.insert(name, HeaderValue::from_static(value));
    }

    headers
        .entry(header::CACHE_CONTROL)
        .or_insert_with(|| HeaderValue::from_static(DEFAULT_CACHE_CONTROL));

    response
}
