//! Client configuration.

use std::time::Duration;
use tracing::warn;

/// Environment variable holding a default delivery delay in milliseconds.
pub const DELAY_ENV_VAR: &str = "CALLBACK_HTTP_DELAY_MS";

/// Default label used for the pipeline's tracing spans.
pub const DEFAULT_LABEL: &str = "callback-http";

/// Configuration for a [`CallbackHttpClient`](crate::adapters::CallbackHttpClient).
///
/// # Example
///
/// ```ignore
/// use callback_http::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_delay_ms(250)
///     .with_label("people-api");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Delay between script completion and callback delivery (default: zero)
    pub delay: Duration,
    /// Label attached to the pipeline's tracing spans
    pub label: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            label: DEFAULT_LABEL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delivery delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the delivery delay in milliseconds.
    pub fn with_delay_ms(self, millis: u64) -> Self {
        self.with_delay(Duration::from_millis(millis))
    }

    /// Set the tracing label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Create config from the environment.
    ///
    /// Reads `CALLBACK_HTTP_DELAY_MS`; a missing or unparsable value keeps
    /// the default delay.
    pub fn from_env() -> Self {
        let config = Self::default();

        match std::env::var(DELAY_ENV_VAR) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(millis) => config.with_delay_ms(millis),
                Err(e) => {
                    warn!("Ignoring {}={:?}: {}", DELAY_ENV_VAR, raw, e);
                    config
                }
            },
            Err(_) => config,
        }
    }
}
