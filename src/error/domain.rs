//! Error domains for delivered errors.
//!
//! A domain tells the consuming library which layer produced a failure:
//! the client framework (transport problems) or the remote server
//! (non-2xx HTTP statuses).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The layer that produced a delivered error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDomain {
    /// Transport-level failure surfaced by the client framework.
    /// The code is the transport error's own code.
    Client,

    /// The server answered with a status outside 200..=299.
    /// The code is the HTTP status.
    Server,
}

impl ErrorDomain {
    /// Returns a short label for the domain suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorDomain::Client => "client",
            ErrorDomain::Server => "server",
        }
    }
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_as_str() {
        assert_eq!(ErrorDomain::Client.as_str(), "client");
        assert_eq!(ErrorDomain::Server.as_str(), "server");
    }

    #[test]
    fn test_domain_display() {
        assert_eq!(format!("{}", ErrorDomain::Client), "client");
        assert_eq!(format!("{}", ErrorDomain::Server), "server");
    }

    #[test]
    fn test_domains_are_distinct() {
        assert_ne!(ErrorDomain::Client, ErrorDomain::Server);
        assert_ne!(ErrorDomain::Client.as_str(), ErrorDomain::Server.as_str());
    }

    #[test]
    fn test_domain_serde() {
        let json = serde_json::to_string(&ErrorDomain::Server).unwrap();
        assert_eq!(json, "\"server\"");
        let parsed: ErrorDomain = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(parsed, ErrorDomain::Client);
    }
}
