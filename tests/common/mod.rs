//! Common test utilities for integration tests.
//!
//! Fixtures, tracing setup, and a recording callback sink shared by the
//! integration tests.

pub mod mocks;

#[allow(unused_imports)]
pub use mocks::*;

use std::sync::Once;
use std::time::Duration;

use callback_http::{CallbackHttpClient, ClientConfig};

static INIT_TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
pub fn init_test_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_ansi(false)
            .try_init();
    });
}

/// Creates a client with no delay.
#[allow(dead_code)]
pub fn test_client() -> CallbackHttpClient {
    init_test_tracing();
    CallbackHttpClient::with_config(ClientConfig::new().with_label("test"))
}

/// Creates a client that delays every delivery by `delay`.
#[allow(dead_code)]
pub fn delayed_client(delay: Duration) -> CallbackHttpClient {
    init_test_tracing();
    CallbackHttpClient::with_config(ClientConfig::new().with_label("test").with_delay(delay))
}
