//! Request interceptors wrapped around the router.
//!
//! The chain is applied by [`apply`] in the order given by
//! [`MIDDLEWARE_ORDER`], outermost first.

pub mod recover;
pub mod request_log;
pub mod secure_headers;

use axum::Router;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::from_fn;
use std::sync::{Arc, Mutex, PoisonError};

/// One interceptor in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RecoverPanic,
    LogRequest,
    SecureHeaders,
}

/// Outer to inner: a request passes the stages left to right before reaching
/// the router, the response passes them right to left.
pub const MIDDLEWARE_ORDER: [Stage; 3] = [
    Stage::RecoverPanic,
    Stage::LogRequest,
    Stage::SecureHeaders,
];

impl Stage {
    fn wrap(self, router: Router) -> Router {
        match self {
            Stage::RecoverPanic => router.layer(from_fn(recover::recover_panic)),
            Stage::LogRequest => router.layer(from_fn(request_log::log_request)),
            Stage::SecureHeaders => router.layer(from_fn(secure_headers::secure_headers)),
        }
    }
}

/// Headers a stage commits to before delegating. Recovery puts an empty set
/// into the request extensions; inner stages record into it, and a 500 built
/// after a panic still carries everything recorded so far.
#[derive(Debug, Clone, Default)]
pub struct PendingHeaders(Arc<Mutex<HeaderMap>>);

impl PendingHeaders {
    pub fn insert(&self, name: HeaderName, value: HeaderValue) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, value);
    }

    /// Copy every recorded header onto `headers`, replacing existing values.
    pub fn apply_to(&self, headers: &mut HeaderMap) {
        let pending = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        for (name, value) in pending.iter() {
            headers.insert(name.clone(), value.clone());
        }
    }
}

/// Wrap `router` in every stage of [`MIDDLEWARE_ORDER`].
pub fn apply(router: Router) -> Router {
    // the last layer added is the outermost one
    MIDDLEWARE_ORDER
        .iter()
        .rev()
        .fold(router, |router, stage| stage.wrap(router))
}
