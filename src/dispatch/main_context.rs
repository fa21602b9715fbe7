//! The foreground context every callback runs on.
//!
//! A single task drains a FIFO of boxed jobs and runs them one at a time.
//! Code running inside a job can detect that it is on the main context with
//! [`is_main_context`]. A job that panics is logged and the loop moves on
//! to the next one.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::logging::NETWORKING;

/// A unit of work for the main context.
pub type MainJob = Box<dyn FnOnce() + Send + 'static>;

tokio::task_local! {
    static MAIN_CONTEXT: ();
}

/// True when called from a job running on a [`MainContext`].
pub fn is_main_context() -> bool {
    MAIN_CONTEXT.try_with(|_| ()).is_ok()
}

/// Handle used to post jobs to the main context.
#[derive(Debug, Clone)]
pub struct MainContext {
    tx: mpsc::UnboundedSender<MainJob>,
}

impl MainContext {
    /// Spawn the main context loop on the current Tokio runtime.
    ///
    /// The loop ends once every handle has been dropped and the queue is
    /// empty.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(label: &str) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<MainJob>();
        let label = label.to_string();

        tokio::spawn(MAIN_CONTEXT.scope((), async move {
            debug!(label = %label, "main context started");
            while let Some(job) = rx.recv().await {
                if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
                    error!(
                        target: NETWORKING,
                        label = %label,
                        "callback panicked: {}",
                        panic_message(payload.as_ref())
                    );
                }
            }
            debug!(label = %label, "main context stopped");
        }));

        Self { tx }
    }

    /// Queue a job. Returns false if the loop has already stopped.
    pub fn post(&self, job: MainJob) -> bool {
        self.tx.send(job).is_ok()
    }
}

/// Extract a human-readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
