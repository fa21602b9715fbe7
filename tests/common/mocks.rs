//! Recording callback sink for test assertions.

#![allow(dead_code)]

use bytes::Bytes;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

use callback_http::dispatch::is_main_context;
use callback_http::{ClientError, NetworkCallback};

/// One observed callback invocation.
#[derive(Debug, Clone)]
pub struct RecordedDelivery {
    /// Caller-chosen tag identifying the request
    pub tag: String,
    pub success: bool,
    pub data: Bytes,
    pub error: Option<ClientError>,
    /// When the callback ran
    pub at: Instant,
    /// Whether the callback ran on the client's main context
    pub on_main: bool,
}

/// Collects callback invocations in the order they happen.
#[derive(Debug, Clone, Default)]
pub struct DeliveryRecorder {
    deliveries: Arc<Mutex<Vec<RecordedDelivery>>>,
}

impl DeliveryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that records its arguments under `tag`.
    pub fn callback(&self, tag: impl Into<String>) -> NetworkCallback {
        let deliveries = self.deliveries.clone();
        let tag = tag.into();
        Box::new(move |success, data, error| {
            deliveries.lock().unwrap().push(RecordedDelivery {
                tag,
                success,
                data,
                error,
                at: Instant::now(),
                on_main: is_main_context(),
            });
        })
    }

    pub fn deliveries(&self) -> Vec<RecordedDelivery> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Tags in delivery order.
    pub fn tags(&self) -> Vec<String> {
        self.deliveries().into_iter().map(|d| d.tag).collect()
    }
}
