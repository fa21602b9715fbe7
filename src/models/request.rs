//! Captured request records.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::fmt;
use url::Url;
use uuid::Uuid;

use crate::error::{DispatchError, DispatchResult};

/// Unique identifier assigned to every submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A captured request, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Identifier used to correlate log lines
    pub id: RequestId,
    /// HTTP method, e.g. "GET"
    pub method: String,
    /// Target URL
    pub url: Url,
    /// Raw request body
    pub body: Option<Bytes>,
}

impl Request {
    /// Build a request, validating the method and URL.
    pub fn new(method: &str, url: &str, body: Option<Bytes>) -> DispatchResult<Self> {
        if method.trim().is_empty() {
            return Err(DispatchError::EmptyMethod);
        }

        let url = Url::parse(url).map_err(|e| DispatchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            id: RequestId::new(),
            method: method.to_string(),
            url,
            body,
        })
    }

    /// Get the body as UTF-8 text, if there is a body.
    pub fn body_text(&self) -> Option<Result<String, std::string::FromUtf8Error>> {
        self.body
            .as_ref()
            .map(|body| String::from_utf8(body.to_vec()))
    }

    /// Parse the body as JSON.
    ///
    /// A missing body parses as an empty document, which is an error for
    /// every type that needs content.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let body = self.body.as_deref().unwrap_or_default();
        serde_json::from_slice(body)
    }
}
