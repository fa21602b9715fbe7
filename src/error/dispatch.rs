//! Configuration faults detected when a request is submitted.
//!
//! These indicate a bug in the test setup rather than a runtime condition,
//! so they are reported synchronously and the request is never enqueued.

use thiserror::Error;

/// Errors returned by `submit` before anything is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No response script has been configured on the client.
    #[error("no response script configured; call respond_with or set_script first")]
    NoScript,

    /// The HTTP method was empty.
    #[error("request method must not be empty")]
    EmptyMethod,

    /// The URL could not be parsed as an absolute URL.
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// The background worker or main context has shut down.
    #[error("client pipeline is closed")]
    Closed,
}

impl DispatchError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            DispatchError::NoScript => "E_DISPATCH_NO_SCRIPT",
            DispatchError::EmptyMethod => "E_DISPATCH_METHOD",
            DispatchError::InvalidUrl { .. } => "E_DISPATCH_URL",
            DispatchError::Closed => "E_DISPATCH_CLOSED",
        }
    }
}

/// Type alias for Results using DispatchError.
pub type DispatchResult<T> = Result<T, DispatchError>;
