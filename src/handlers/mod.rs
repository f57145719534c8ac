//! One handler per route. Handlers classify errors through `BossError` and
//! render pages through the shared template cache.

pub mod pages;
pub mod players;

use crate::error::client_error;
use axum::http::StatusCode;
use axum::response::Response;

/// Fallback for every unmatched path.
pub async fn not_found() -> Response {
    client_error(StatusCode::NOT_FOUND)
}

/// Fallback for a known path requested with the wrong method.
pub async fn method_not_allowed() -> Response {
    client_error(StatusCode::METHOD_NOT_ALLOWED)
}
