//! Classification of scripted responses into delivery outcomes.
//!
//! Precedence, highest first:
//! 1. a transport error yields [`DeliveryOutcome::TransportFailure`]
//! 2. a status in 200..=299 yields [`DeliveryOutcome::HttpSuccess`]
//! 3. anything else yields [`DeliveryOutcome::HttpError`]

use bytes::Bytes;
use std::sync::Arc;
use tokio::time::Instant;
use url::Url;

use super::main_context::MainJob;
use super::scheduler::DeliveryScheduler;
use super::state::{ClientState, InFlightGuard};
use crate::error::ClientError;
use crate::logging::NETWORKING;
use crate::models::{Delivery, Request, ScriptedResponse};
use crate::traits::NetworkCallback;

/// The classified result of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    /// The transport failed; the error is already in the client domain.
    TransportFailure { error: ClientError, data: Bytes },
    /// The server answered with a 2xx status.
    HttpSuccess { status: i64, data: Bytes },
    /// The server answered with any other status.
    HttpError { status: i64, data: Bytes },
}

impl DeliveryOutcome {
    /// True only for [`DeliveryOutcome::HttpSuccess`].
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::HttpSuccess { .. })
    }

    /// The HTTP status, if the request got that far.
    pub fn status(&self) -> Option<i64> {
        match self {
            DeliveryOutcome::TransportFailure { .. } => None,
            DeliveryOutcome::HttpSuccess { status, .. }
            | DeliveryOutcome::HttpError { status, .. } => Some(*status),
        }
    }

    pub fn data(&self) -> &Bytes {
        match self {
            DeliveryOutcome::TransportFailure { data, .. }
            | DeliveryOutcome::HttpSuccess { data, .. }
            | DeliveryOutcome::HttpError { data, .. } => data,
        }
    }

    /// The error a callback would receive.
    pub fn error(&self) -> Option<ClientError> {
        match self {
            DeliveryOutcome::TransportFailure { error, .. } => Some(error.clone()),
            DeliveryOutcome::HttpSuccess { .. } => None,
            DeliveryOutcome::HttpError { status, .. } => Some(ClientError::from_status(*status)),
        }
    }

    /// Flatten into the `(success, data, error)` callback shape.
    pub fn into_callback_args(self) -> (bool, Bytes, Option<ClientError>) {
        match self {
            DeliveryOutcome::TransportFailure { error, data } => (false, data, Some(error)),
            DeliveryOutcome::HttpSuccess { data, .. } => (true, data, None),
            DeliveryOutcome::HttpError { status, data } => {
                (false, data, Some(ClientError::from_status(status)))
            }
        }
    }

    pub fn into_delivery(self) -> Delivery {
        let (success, data, error) = self.into_callback_args();
        Delivery::new(success, data, error)
    }
}

/// Classify a scripted response.
pub fn resolve(response: ScriptedResponse) -> DeliveryOutcome {
    let ScriptedResponse {
        data,
        status,
        error,
    } = response;

    if let Some(error) = error {
        DeliveryOutcome::TransportFailure {
            error: ClientError::from_transport(&error),
            data,
        }
    } else if (200..=299).contains(&status) {
        DeliveryOutcome::HttpSuccess { status, data }
    } else {
        DeliveryOutcome::HttpError { status, data }
    }
}

/// Emit the trace line for an outcome.
pub fn log_outcome(outcome: &DeliveryOutcome, url: &Url) {
    match outcome {
        DeliveryOutcome::TransportFailure { error, .. } => {
            tracing::error!(target: NETWORKING, "{} - {}", url, error.description());
        }
        DeliveryOutcome::HttpSuccess { status, .. } => {
            tracing::info!(target: NETWORKING, "{}: {}", status, url);
        }
        DeliveryOutcome::HttpError { status, .. } => {
            tracing::warn!(target: NETWORKING, "{}: {}", status, url);
        }
    }
}

/// Second stage of the pipeline: classify, wait, deliver.
#[derive(Debug, Clone)]
pub struct Resolver {
    scheduler: DeliveryScheduler,
    state: Arc<ClientState>,
}

impl Resolver {
    pub fn new(scheduler: DeliveryScheduler, state: Arc<ClientState>) -> Self {
        Self { scheduler, state }
    }

    /// Classify `response` and schedule `callback` on the main context.
    ///
    /// The delay is read now and counted from now, i.e. from the moment the
    /// script returned. `guard` is released once the callback has returned
    /// or unwound, or when the job is dropped undelivered. Returns false if
    /// the pipeline has shut down.
    pub fn deliver(
        &self,
        request: &Request,
        response: ScriptedResponse,
        callback: NetworkCallback,
        guard: InFlightGuard,
    ) -> bool {
        let outcome = resolve(response);
        let deadline = Instant::now() + self.state.delay();
        let url = request.url.clone();

        let job: MainJob = Box::new(move || {
            let _guard = guard;
            log_outcome(&outcome, &url);
            let (success, data, error) = outcome.into_callback_args();
            callback(success, data, error);
        });

        self.scheduler.schedule_at(deadline, job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorDomain, TransportError};
    use crate::logging::capture_logs;

    fn logged(response: ScriptedResponse) -> String {
        let url = Url::parse("http://x/items/1").unwrap();
        let outcome = resolve(response);
        capture_logs(|| log_outcome(&outcome, &url)).1
    }

    #[test]
    fn test_every_2xx_is_success() {
        for status in 200..=299i64 {
            let data = Bytes::from(format!("body-{}", status));
            let outcome = resolve(ScriptedResponse::new(data.clone(), status, None));

            assert!(outcome.is_success(), "status {}", status);
            let (success, delivered, error) = outcome.into_callback_args();
            assert!(success);
            assert_eq!(delivered, data);
            assert!(error.is_none());
        }
    }

    #[test]
    fn test_non_2xx_is_server_error() {
        for status in [-1i64, 0, 100, 199, 300, 304, 404, 418, 500, 999, 65_535, 70_000] {
            let (success, _, error) =
                resolve(ScriptedResponse::status(status)).into_callback_args();

            assert!(!success, "status {}", status);
            let error = error.unwrap();
            assert_eq!(error.domain, ErrorDomain::Server);
            assert_eq!(error.code, status);
            assert!(error.metadata.is_none());
        }
    }

    #[test]
    fn test_transport_error_wins_over_success_status() {
        for status in [200i64, 204, 404, 500] {
            let transport = TransportError::new(-1001).with_metadata("k", "v");
            let outcome = resolve(ScriptedResponse::new(
                Bytes::new(),
                status,
                Some(transport.clone()),
            ));

            assert!(!outcome.is_success());
            assert_eq!(outcome.status(), None);
            let error = outcome.error().unwrap();
            assert_eq!(error.domain, ErrorDomain::Client);
            assert_eq!(error.code, -1001);
            assert_eq!(error.metadata, transport.metadata);
        }
    }

    #[test]
    fn test_error_payload_is_kept() {
        let outcome = resolve(ScriptedResponse::new(
            Bytes::from(r#"{"errors":[]}"#),
            422,
            None,
        ));
        assert_eq!(outcome.data(), &Bytes::from(r#"{"errors":[]}"#));
        assert_eq!(outcome.status(), Some(422));
    }

    #[test]
    fn test_success_logged_at_info() {
        let logs = logged(ScriptedResponse::status(201));
        assert!(logs.contains(" INFO networking: 201: http://x/items/1"), "{}", logs);
        assert_eq!(logs.lines().count(), 1);
    }

    #[test]
    fn test_http_error_logged_at_warn() {
        let logs = logged(ScriptedResponse::status(404));
        assert!(logs.contains(" WARN networking: 404: http://x/items/1"), "{}", logs);
        assert!(!logs.contains("INFO"));
    }

    #[test]
    fn test_transport_failure_logged_at_error_with_description() {
        let transport = TransportError::new(-1001).with_description("The request timed out.");
        let logs = logged(ScriptedResponse::new(Bytes::new(), 200, Some(transport)));
        assert!(
            logs.contains("ERROR networking: http://x/items/1 - The request timed out."),
            "{}",
            logs
        );
        assert!(!logs.contains("200"));
    }

    #[test]
    fn test_into_delivery() {
        let delivery = resolve(ScriptedResponse::ok("{}")).into_delivery();
        assert_eq!(delivery, Delivery::new(true, Bytes::from("{}"), None));
    }
}
