use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::backtrace::Backtrace;
use thiserror::Error as ThisError;
use tracing::error;

/// Prefix carried by every error body so clients can recognize our errors.
pub const ERROR_PREFIX: &str = "BOSS: ";

#[derive(Debug, ThisError)]
pub enum BossError {
    /// Well-formed lookup, zero matching rows.
    #[error("no matching record found")]
    NoRecord,

    #[error("invalid player id: {0:?}")]
    InvalidId(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("template {0} doesn't exist")]
    TemplateMissing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("panic: {0}")]
    Panic(String),
}

impl BossError {
    /// Whether this error is shown to the client as a plain 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BossError::NoRecord | BossError::InvalidId(_))
    }
}

impl IntoResponse for BossError {
    fn into_response(self) -> Response {
        if self.is_not_found() {
            return client_error(StatusCode::NOT_FOUND);
        }
        server_error(&self)
    }
}

/// Plain-text error response: `BOSS: <reason phrase>`.
pub fn client_error(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    let mut resp = (status, format!("{ERROR_PREFIX}{reason}")).into_response();
    let headers = resp.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    resp
}

/// Log the error with a backtrace and send a generic 500; the detail never
/// reaches the client.
pub fn server_error(err: &BossError) -> Response {
    let trace = stack_trace();
    error!(error = %err, backtrace = %trace, "internal server error");
    client_error(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Captured regardless of `RUST_BACKTRACE`.
fn stack_trace() -> Backtrace {
    Backtrace::force_capture()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::backtrace::BacktraceStatus;

    #[test]
    fn stack_trace_is_captured_without_backtrace_env() {
        assert_eq!(stack_trace().status(), BacktraceStatus::Captured);
    }

    #[tokio::test]
    async fn not_found_variants_map_to_404() {
        for err in [BossError::NoRecord, BossError::InvalidId("abc".into())] {
            let resp = err.into_response();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], b"BOSS: Not Found");
        }
    }

    #[tokio::test]
    async fn server_errors_hide_their_detail() {
        let resp = BossError::TemplateMissing("secret.html".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = std::str::from_utf8(&body).unwrap();
        assert_eq!(body, "BOSS: Internal Server Error");
        assert!(!body.contains("secret"));
    }
}
