//! The error handed to a network callback.
//!
//! Every failed delivery carries exactly one `ClientError`. Its
//! [`ErrorDomain`] discriminates the layer that failed; its code is either
//! the transport error's own code (client domain) or the HTTP status
//! (server domain).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::domain::ErrorDomain;
use super::transport::TransportError;
use super::Metadata;

/// Error delivered to the callback of a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{domain} error {code}: {message}")]
pub struct ClientError {
    /// Layer that produced the error.
    pub domain: ErrorDomain,
    /// Transport code or HTTP status, depending on the domain.
    pub code: i64,
    /// Short description of the failure.
    pub message: String,
    /// Metadata carried over from the transport error, if any.
    pub metadata: Option<Metadata>,
}

impl ClientError {
    /// Re-wrap a transport error under the client domain.
    ///
    /// Code and metadata are preserved as-is.
    pub fn from_transport(err: &TransportError) -> Self {
        Self {
            domain: ErrorDomain::Client,
            code: err.code,
            message: err.description.clone(),
            metadata: err.metadata.clone(),
        }
    }

    /// Build a server-domain error for a non-2xx status.
    pub fn from_status(status: i64) -> Self {
        Self {
            domain: ErrorDomain::Server,
            code: status,
            message: format!("HTTP {}", status),
            metadata: None,
        }
    }

    /// True if the client framework produced this error.
    pub fn is_client(&self) -> bool {
        self.domain == ErrorDomain::Client
    }

    /// True if the server produced this error.
    pub fn is_server(&self) -> bool {
        self.domain == ErrorDomain::Server
    }

    /// Get the error description.
    pub fn description(&self) -> &str {
        &self.message
    }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        ClientError::from_transport(&err)
    }
}
