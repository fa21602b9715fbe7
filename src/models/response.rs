//! Scripted responses and collected deliveries.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, TransportError};

/// What a response script produces for a request.
///
/// Mirrors the raw result a real transport hands back: body bytes, a status
/// code, and an optional low-level error. Classification happens later.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedResponse {
    /// Response body
    pub data: Bytes,
    /// HTTP status code. Any integer is accepted; only 200..=299 is success
    pub status: i64,
    /// Transport failure, takes precedence over the status when present
    pub error: Option<TransportError>,
}

impl ScriptedResponse {
    /// Create a response from its raw parts.
    pub fn new(data: Bytes, status: i64, error: Option<TransportError>) -> Self {
        Self {
            data,
            status,
            error,
        }
    }

    /// A 200 response with the given body.
    pub fn ok(data: impl Into<Bytes>) -> Self {
        Self::new(data.into(), 200, None)
    }

    /// A response with the given status and an empty body.
    pub fn status(status: i64) -> Self {
        Self::new(Bytes::new(), status, None)
    }

    /// A transport failure with the given placeholder status.
    pub fn transport(status: i64, error: TransportError) -> Self {
        Self::new(Bytes::new(), status, Some(error))
    }
}

/// Callback arguments collected into a single value.
///
/// This is what [`NetworkClient::fetch`](crate::traits::NetworkClient::fetch)
/// resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// True only for 2xx responses without a transport error
    pub success: bool,
    /// Response body, unchanged from the script
    pub data: Bytes,
    /// Classified error for failed deliveries
    pub error: Option<ClientError>,
}

impl Delivery {
    pub fn new(success: bool, data: Bytes, error: Option<ClientError>) -> Self {
        Self {
            success,
            data,
            error,
        }
    }

    /// Get the data as a UTF-8 string.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.data.to_vec())
    }

    /// Parse the data as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_constructors() {
        let ok = ScriptedResponse::ok("{}");
        assert_eq!(ok.status, 200);
        assert_eq!(ok.data, Bytes::from("{}"));
        assert!(ok.error.is_none());

        let not_found = ScriptedResponse::status(404);
        assert_eq!(not_found.status, 404);
        assert!(not_found.data.is_empty());

        let offline = ScriptedResponse::transport(404, TransportError::new(-1009));
        assert_eq!(offline.error.unwrap().code, -1009);
    }

    #[test]
    fn test_delivery_text_and_json() {
        let delivery = Delivery::new(true, Bytes::from(r#"{"id":7}"#), None);
        assert_eq!(delivery.text().unwrap(), r#"{"id":7}"#);

        let value: serde_json::Value = delivery.json().unwrap();
        assert_eq!(value["id"], 7);
    }
}
