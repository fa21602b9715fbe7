//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`NetworkClient`] - Callback-based request/response contract

pub mod network;

pub use network::{NetworkCallback, NetworkClient};
