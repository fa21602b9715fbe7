//! Per-client mutable state shared between the test and the pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Notify;

use super::script::ResponseScript;
use crate::models::Request;

/// State owned by one client instance.
///
/// The test writes the script and delay; the dispatcher writes the last
/// request; the pipeline tracks how many requests are still in flight.
pub struct ClientState {
    script: RwLock<Option<ResponseScript>>,
    last_request: Mutex<Option<Request>>,
    delay: RwLock<Duration>,
    in_flight: AtomicUsize,
    idle: Notify,
}

impl ClientState {
    pub fn new(delay: Duration) -> Self {
        Self {
            script: RwLock::new(None),
            last_request: Mutex::new(None),
            delay: RwLock::new(delay),
            in_flight: AtomicUsize::new(0),
            idle: Notify::new(),
        }
    }

    pub fn script(&self) -> Option<ResponseScript> {
        self.script
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_script(&self, script: Option<ResponseScript>) {
        *self.script.write().unwrap_or_else(PoisonError::into_inner) = script;
    }

    pub fn last_request(&self) -> Option<Request> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn record_request(&self, request: Request) {
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request);
    }

    pub fn delay(&self) -> Duration {
        *self.delay.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write().unwrap_or_else(PoisonError::into_inner) = delay;
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Count a request as in flight until the returned guard is dropped.
    ///
    /// The guard travels with the request through every stage, so a job that
    /// is dropped or unwinds still releases its slot.
    pub fn begin_request(self: &Arc<Self>) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            state: Arc::clone(self),
        }
    }

    fn finish_request(&self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }

    /// Wait until every accepted request has been delivered.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl std::fmt::Debug for ClientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientState")
            .field("has_script", &self.script().is_some())
            .field("last_request", &self.last_request())
            .field("delay", &self.delay())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

/// One in-flight request. Dropping it marks the request finished.
#[must_use = "dropping the guard finishes the request immediately"]
pub struct InFlightGuard {
    state: Arc<ClientState>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.state.finish_request();
    }
}

impl std::fmt::Debug for InFlightGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlightGuard").finish_non_exhaustive()
    }
}
