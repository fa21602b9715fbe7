//! Concrete implementations of trait abstractions.
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::CallbackHttpClient`] - Scripted responses with asynchronous delivery

pub mod mock;

pub use mock::CallbackHttpClient;
