//! Mock implementations for testing.
//!
//! These doubles implement the trait abstractions without network access.
//!
//! # Available Mocks
//!
//! - [`CallbackHttpClient`] - Network client with scripted responses

pub mod http;

pub use http::CallbackHttpClient;
