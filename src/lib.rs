//! callback-http - a programmable network client double
//!
//! Scripts the response to the next request a library issues, delivers it
//! asynchronously the way a real client would, and records the request for
//! later assertions.
//!
//! ```ignore
//! use callback_http::{CallbackHttpClient, NetworkClient};
//!
//! let client = CallbackHttpClient::new();
//! client.respond_with_status(404);
//!
//! let delivery = client.fetch("GET", "http://x/2", None).await?;
//! assert!(!delivery.success);
//! assert_eq!(delivery.error.unwrap().code, 404);
//! ```

pub mod adapters;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

pub use adapters::CallbackHttpClient;
pub use config::ClientConfig;
pub use error::{ClientError, DispatchError, DispatchResult, ErrorDomain, TransportError};
pub use models::{Delivery, Request, ScriptedResponse};
pub use traits::{NetworkCallback, NetworkClient};
