//! Programmable callback HTTP client for testing.
//!
//! Scripts the response to the next request, records the last request, and
//! delivers outcomes asynchronously on the client's main context.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::dispatch::{script, spawn_pipeline, ClientState, Dispatcher, ResponseScript};
use crate::error::{DispatchResult, TransportError};
use crate::models::{Request, ScriptedResponse};
use crate::traits::{NetworkCallback, NetworkClient};

/// Callback HTTP client double.
///
/// No network I/O is performed. Every request is answered by the active
/// response script on a background worker, classified, and delivered to the
/// callback on the main context after the configured delay.
///
/// Clones share the same script, delay, last request, and pipeline.
///
/// # Example
///
/// ```ignore
/// use callback_http::adapters::CallbackHttpClient;
/// use callback_http::traits::NetworkClient;
///
/// let client = CallbackHttpClient::new();
/// client.respond_with(200, "{}", None);
///
/// let delivery = client.fetch("GET", "http://x/1", None).await?;
/// assert!(delivery.success);
///
/// let request = client.last_request().unwrap();
/// assert_eq!(request.method, "GET");
/// ```
#[derive(Debug, Clone)]
pub struct CallbackHttpClient {
    state: Arc<ClientState>,
    dispatcher: Dispatcher,
}

impl CallbackHttpClient {
    /// Create a client with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with a custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn with_config(config: ClientConfig) -> Self {
        let state = Arc::new(ClientState::new(config.delay));
        let dispatcher = spawn_pipeline(&config.label, state.clone());
        Self { state, dispatcher }
    }

    /// Install an arbitrary response script, replacing the current one.
    pub fn set_script<F>(&self, f: F)
    where
        F: Fn(&Request) -> ScriptedResponse + Send + Sync + 'static,
    {
        self.install(script::from_fn(f));
    }

    /// Answer every request with the same status, body, and transport error.
    pub fn respond_with(
        &self,
        status: i64,
        data: impl Into<Bytes>,
        error: Option<TransportError>,
    ) {
        self.install(script::fixed(status, data.into(), error));
    }

    /// Answer every request with `status` and an empty body.
    pub fn respond_with_status(&self, status: i64) {
        self.respond_with(status, Bytes::new(), None);
    }

    /// Answer every request with `value` serialized as JSON.
    pub fn respond_with_json<T: Serialize>(
        &self,
        status: i64,
        value: &T,
    ) -> Result<(), serde_json::Error> {
        self.install(script::json(status, value)?);
        Ok(())
    }

    /// Fail every request at the transport level with `code`.
    ///
    /// The script pairs the error with
    /// [`TRANSPORT_ERROR_PLACEHOLDER_STATUS`](crate::dispatch::TRANSPORT_ERROR_PLACEHOLDER_STATUS),
    /// which callbacks never observe.
    pub fn simulate_transport_error(&self, code: i64) {
        self.install(script::transport_error(code));
    }

    /// Remove the active script. Subsequent requests are rejected.
    pub fn clear_script(&self) {
        self.state.set_script(None);
    }

    /// True if a script is installed.
    pub fn has_script(&self) -> bool {
        self.state.script().is_some()
    }

    /// The most recent accepted request.
    pub fn last_request(&self) -> Option<Request> {
        self.state.last_request()
    }

    pub fn delay(&self) -> Duration {
        self.state.delay()
    }

    /// Change the delivery delay for requests whose script has not yet returned.
    pub fn set_delay(&self, delay: Duration) {
        self.state.set_delay(delay);
    }

    /// Number of accepted requests whose callback has not yet returned.
    pub fn in_flight(&self) -> usize {
        self.state.in_flight()
    }

    /// Wait until every accepted request has been delivered.
    pub async fn wait_idle(&self) {
        self.state.wait_idle().await;
    }

    fn install(&self, script: ResponseScript) {
        self.state.set_script(Some(script));
    }
}

impl Default for CallbackHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkClient for CallbackHttpClient {
    fn request(
        &self,
        method: &str,
        url: &str,
        payload: Option<Bytes>,
        callback: NetworkCallback,
    ) -> DispatchResult<()> {
        self.dispatcher.submit(method, url, payload, callback)
    }
}
