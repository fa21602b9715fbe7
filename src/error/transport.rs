//! Transport-level errors produced by a response script.
//!
//! A `TransportError` stands in for the low-level failure a real client
//! would see before any HTTP status exists: no connectivity, DNS failure,
//! TLS handshake problems and so on. Codes are free-form integers so tests
//! can mirror whatever numbering the library under test expects
//! (e.g. `-1009` for "offline").

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Metadata;

/// Domain label attached to transport errors built by the scripting helpers.
pub const MOCK_TRANSPORT_DOMAIN: &str = "mock";

/// A scripted transport failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{description}")]
pub struct TransportError {
    /// Originating domain of the low-level error.
    pub domain: String,
    /// Error code, preserved verbatim when the error is delivered.
    pub code: i64,
    /// Human-readable description, used in the error log line.
    pub description: String,
    /// Contextual metadata, preserved verbatim when the error is delivered.
    pub metadata: Option<Metadata>,
}

impl TransportError {
    /// Create a transport error in the mock domain with a generic description.
    pub fn new(code: i64) -> Self {
        Self {
            domain: MOCK_TRANSPORT_DOMAIN.to_string(),
            code,
            description: format!("The operation couldn't be completed. (error {})", code),
            metadata: None,
        }
    }

    /// Set the originating domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_mock_domain() {
        let err = TransportError::new(-1009);
        assert_eq!(err.domain, "mock");
        assert_eq!(err.code, -1009);
        assert!(err.metadata.is_none());
        assert!(err.description.contains("-1009"));
    }

    #[test]
    fn test_builders() {
        let err = TransportError::new(-1001)
            .with_domain("NSURLErrorDomain")
            .with_description("The request timed out.")
            .with_metadata("host", "x")
            .with_metadata("attempt", "1");

        assert_eq!(err.domain, "NSURLErrorDomain");
        assert_eq!(err.to_string(), "The request timed out.");
        let metadata = err.metadata.unwrap();
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("host"), Some(&"x".to_string()));
    }
}
