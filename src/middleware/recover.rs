use super::PendingHeaders;
use crate::error::{BossError, server_error};
use axum::extract::Request;
use axum::http::{HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// Turn a panic anywhere below this stage into a 500 that closes the
/// connection. The 500 keeps the headers inner stages set before the panic.
/// The process keeps serving other requests.
pub async fn recover_panic(mut req: Request, next: Next) -> Response {
    let pending = PendingHeaders::default();
    req.extensions_mut().insert(pending.clone());

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(resp) => resp,
        Err(payload) => {
            let err = BossError::Panic(panic_message(payload.as_ref()));
            let mut resp = server_error(&err);
            let headers = resp.headers_mut();
            pending.apply_to(headers);
            headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
            resp
        }
    }
}

/// Panic payloads are usually `&str` or `String`; anything else is opaque.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads_become_messages() {
        let boxed: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(panic_message(boxed.as_ref()), "static str");

        let boxed: Box<dyn Any + Send> = Box::new(format!("id {}", 7));
        assert_eq!(panic_message(boxed.as_ref()), "id 7");

        let boxed: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic payload");
    }
}
