use axum::extract::{ConnectInfo, Request};
use super::PendingHeaders;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use tracing::info;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Emits "Request finished" when dropped, so the event is also logged for a
/// handler that panicked or a request that was cancelled.
struct FinishGuard {
    rid: Uuid,
    completed: bool,
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        info!(rid = %self.rid, aborted = !self.completed, "Request finished");
    }
}

/// Log start and finish of every non-static request under a fresh
/// correlation id.
pub async fn log_request(req: Request, next: Next) -> Response {
    if is_static_asset(req.uri().path()) {
        return next.run(req).await;
    }

    let rid = Uuid::new_v4();
    let raddr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    info!(
        rid = %rid,
        raddr = %raddr,
        proto = ?req.version(),
        method = %req.method(),
        url = %target,
        "Request started"
    );

    let rid_value = HeaderValue::from_str(&rid.to_string()).ok();
    if let Some(pending) = req.extensions().get::<PendingHeaders>() {
        if let Some(value) = &rid_value {
            pending.insert(HeaderName::from_static(REQUEST_ID_HEADER), value.clone());
        }
    }

    let mut guard = FinishGuard {
        rid,
        completed: false,
    };
    let mut resp = next.run(req).await;
    guard.completed = true;
    if let Some(value) = rid_value {
        resp.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    drop(guard);
    resp
}

fn is_static_asset(path: &str) -> bool {
    path.starts_with("/static/") || path == "/static"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_static_prefix_is_skipped() {
        assert!(is_static_asset("/static/main.js"));
        assert!(is_static_asset("/static"));
        assert!(!is_static_asset("/players"));
        assert!(!is_static_asset("/staticky"));
    }
}
