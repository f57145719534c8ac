use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, header};
use super::PendingHeaders;
use axum::middleware::Next;
use axum::response::Response;

pub const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com";

const SECURITY_HEADERS: [(HeaderName, &str); 5] = [
    (header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY),
    (header::REFERRER_POLICY, "origin-when-cross-origin"),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "deny"),
    (header::X_XSS_PROTECTION, "0"),
];

/// Set the fixed security headers on every response. They are recorded
/// before delegating so a recovered panic answers with them too. A value
/// already set by the handler wins.
pub async fn secure_headers(req: Request, next: Next) -> Response {
    if let Some(pending) = req.extensions().get::<PendingHeaders>() {
        for (name, value) in SECURITY_HEADERS {
            pending.insert(name, HeaderValue::from_static(value));
        }
    }

    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers
            .entry(name)
            .or_insert(HeaderValue::from_static(value));
    }
    resp
}
