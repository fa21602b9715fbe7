//! Response scripts: functions from a captured request to a raw response.
//!
//! A script is invoked exactly once per request, on the background worker.
//! It receives an immutable [`Request`] and returns a [`ScriptedResponse`];
//! classification of that response is left to the resolver.

use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;

use crate::error::TransportError;
use crate::models::{Request, ScriptedResponse};

/// A shared, thread-safe response script.
pub type ResponseScript = Arc<dyn Fn(&Request) -> ScriptedResponse + Send + Sync>;

/// Status paired with transport errors by [`transport_error`].
///
/// Never observed by a callback, since a transport error always wins over
/// the status. Kept as a named value so a future change to that precedence
/// shows up here instead of silently exposing an arbitrary 404.
pub const TRANSPORT_ERROR_PLACEHOLDER_STATUS: i64 = 404;

/// Transport code delivered when a script panics instead of returning.
pub const SCRIPT_PANIC_CODE: i64 = -1;

/// Wrap a closure as a [`ResponseScript`].
pub fn from_fn<F>(f: F) -> ResponseScript
where
    F: Fn(&Request) -> ScriptedResponse + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A script that returns the same tuple for every request.
pub fn fixed(status: i64, data: Bytes, error: Option<TransportError>) -> ResponseScript {
    let response = ScriptedResponse::new(data, status, error);
    from_fn(move |_| response.clone())
}

/// A script that fails every request at the transport level.
pub fn transport_error(code: i64) -> ResponseScript {
    let response =
        ScriptedResponse::transport(TRANSPORT_ERROR_PLACEHOLDER_STATUS, TransportError::new(code));
    from_fn(move |_| response.clone())
}

/// A script that answers every request with `value` serialized as JSON.
pub fn json<T: Serialize>(status: i64, value: &T) -> Result<ResponseScript, serde_json::Error> {
    let body = serde_json::to_vec(value)?;
    Ok(fixed(status, Bytes::from(body), None))
}

/// The response delivered in place of a script that panicked.
pub fn panicked(message: &str) -> ScriptedResponse {
    let error = TransportError::new(SCRIPT_PANIC_CODE)
        .with_description(format!("response script panicked: {}", message))
        .with_metadata("panic", message);
    ScriptedResponse::transport(TRANSPORT_ERROR_PLACEHOLDER_STATUS, error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Request {
        Request::new("GET", "http://x/1", None).unwrap()
    }

    #[test]
    fn test_fixed_ignores_request() {
        let script = fixed(201, Bytes::from("created"), None);

        let a = script(&request());
        let b = script(&Request::new("POST", "http://y/2", Some(Bytes::from("x"))).unwrap());

        assert_eq!(a, b);
        assert_eq!(a.status, 201);
        assert_eq!(a.data, Bytes::from("created"));
    }

    #[test]
    fn test_transport_error_uses_placeholder_status() {
        let response = transport_error(-1009)(&request());

        assert_eq!(response.status, TRANSPORT_ERROR_PLACEHOLDER_STATUS);
        assert!(response.data.is_empty());
        assert_eq!(response.error.map(|e| e.code), Some(-1009));
    }

    #[test]
    fn test_json_script() {
        let script = json(200, &serde_json::json!({"id": 3})).unwrap();
        let response = script(&request());
        assert_eq!(response.data, Bytes::from(r#"{"id":3}"#));
    }

    #[test]
    fn test_panicked_is_transport_failure() {
        let response = panicked("boom");

        assert!(response.data.is_empty());
        let error = response.error.unwrap();
        assert_eq!(error.code, SCRIPT_PANIC_CODE);
        assert_eq!(error.description, "response script panicked: boom");
        assert_eq!(error.metadata.unwrap()["panic"], "boom");
    }

    #[test]
    fn test_from_fn_sees_request() {
        let script = from_fn(|request| {
            if request.method == "DELETE" {
                ScriptedResponse::status(204)
            } else {
                ScriptedResponse::status(405)
            }
        });

        let delete = Request::new("DELETE", "http://x/1", None).unwrap();
        assert_eq!(script(&delete).status, 204);
        assert_eq!(script(&request()).status, 405);
    }
}
