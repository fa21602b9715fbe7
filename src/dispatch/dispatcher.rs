//! First stage of the pipeline: capture the request and run the script on a
//! serial background worker.

use bytes::Bytes;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn, Instrument};

use super::main_context::panic_message;
use super::resolver::Resolver;
use super::script::{panicked, ResponseScript};
use super::state::{ClientState, InFlightGuard};
use crate::error::{DispatchError, DispatchResult};
use crate::logging::NETWORKING;
use crate::models::Request;
use crate::traits::NetworkCallback;

tokio::task_local! {
    static BACKGROUND_CONTEXT: ();
}

/// True when called from inside a response script run by a [`Dispatcher`].
pub fn is_background_context() -> bool {
    BACKGROUND_CONTEXT.try_with(|_| ()).is_ok()
}

/// A request waiting for the background worker.
struct Job {
    request: Request,
    script: ResponseScript,
    callback: NetworkCallback,
    guard: InFlightGuard,
}

/// Accepts requests and feeds them, in order, to one background worker.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Job>,
    state: Arc<ClientState>,
}

impl Dispatcher {
    /// Spawn the background worker.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(label: &str, state: Arc<ClientState>, resolver: Resolver) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let span = tracing::debug_span!("background", label = %label);
        let worker = BACKGROUND_CONTEXT.scope((), run_worker(rx, resolver));
        tokio::spawn(worker.instrument(span));
        Self { tx, state }
    }

    /// Capture a request and queue it for the background worker.
    ///
    /// Returns as soon as the request is queued. The script active at this
    /// moment is the one that will answer the request.
    pub fn submit(
        &self,
        method: &str,
        url: &str,
        body: Option<Bytes>,
        callback: NetworkCallback,
    ) -> DispatchResult<()> {
        self.enqueue(method, url, body, callback).map_err(|err| {
            warn!(
                target: NETWORKING,
                code = err.error_code(),
                "{} {} rejected: {}",
                method,
                url,
                err
            );
            err
        })
    }

    fn enqueue(
        &self,
        method: &str,
        url: &str,
        body: Option<Bytes>,
        callback: NetworkCallback,
    ) -> DispatchResult<()> {
        let script = self.state.script().ok_or(DispatchError::NoScript)?;
        let request = Request::new(method, url, body)?;

        self.state.record_request(request.clone());
        info!(target: NETWORKING, "{}: {}", request.method, request.url);

        let job = Job {
            request,
            script,
            callback,
            guard: self.state.begin_request(),
        };
        // A rejected job is dropped here, which releases its guard.
        self.tx.send(job).map_err(|_| DispatchError::Closed)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("closed", &self.tx.is_closed())
            .field("state", &self.state)
            .finish()
    }
}

async fn run_worker(mut rx: mpsc::UnboundedReceiver<Job>, resolver: Resolver) {
    debug!("background worker started");

    while let Some(Job {
        request,
        script,
        callback,
        guard,
    }) = rx.recv().await
    {
        let span = tracing::debug_span!("request", id = %request.id);
        span.in_scope(|| {
            let response = match catch_unwind(AssertUnwindSafe(|| script(&request))) {
                Ok(response) => response,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(
                        target: NETWORKING,
                        "{} - response script panicked: {}",
                        request.url,
                        message
                    );
                    panicked(&message)
                }
            };
            debug!(
                status = response.status,
                transport_error = response.error.is_some(),
                "script returned"
            );

            if !resolver.deliver(&request, response, callback, guard) {
                error!(target: NETWORKING, "{} - delivery pipeline closed", request.url);
            }
        });
    }

    debug!("background worker stopped");
}
