//! Error types for the network client double.
//!
//! - **Error Domains**: which layer produced a delivered failure
//! - **Client Errors**: the error handed to a request callback
//! - **Transport Errors**: low-level failures a response script can inject
//! - **Dispatch Errors**: configuration faults reported by `submit`
//!
//! # Classification
//!
//! | Scripted input | Delivered domain | Delivered code |
//! |----------------|------------------|----------------|
//! | Transport error (any status) | `client` | transport code |
//! | Status 200..=299 | none | none |
//! | Any other status | `server` | HTTP status |

mod client_error;
mod dispatch;
mod domain;
mod transport;

use std::collections::BTreeMap;

pub use client_error::ClientError;
pub use dispatch::{DispatchError, DispatchResult};
pub use domain::ErrorDomain;
pub use transport::{TransportError, MOCK_TRANSPORT_DOMAIN};

/// Contextual key-value metadata attached to an error.
pub type Metadata = BTreeMap<String, String>;
