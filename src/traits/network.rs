//! Network client trait abstraction.
//!
//! The callback-based contract the library under test consumes. The
//! callback receives `(success, data, error)` exactly once per accepted
//! request, on the client's main context.

use async_trait::async_trait;
use bytes::Bytes;
use futures::channel::oneshot;

use crate::error::{ClientError, DispatchError, DispatchResult};
use crate::models::Delivery;

/// Completion callback for a network request.
///
/// Arguments are `success`, response `data`, and the classified `error`
/// (present whenever `success` is false).
pub type NetworkCallback = Box<dyn FnOnce(bool, Bytes, Option<ClientError>) + Send + 'static>;

/// Trait for callback-based network clients.
///
/// # Example
///
/// ```ignore
/// use callback_http::traits::NetworkClient;
///
/// fn load_people<C: NetworkClient>(client: &C) {
///     let callback = Box::new(|success, data, error| {
///         // interpret the response
///     });
///     client
///         .request("GET", "https://api.example.com/people", None, callback)
///         .expect("client is configured");
/// }
/// ```
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Issue a request.
    ///
    /// # Arguments
    /// * `method` - HTTP method, must not be empty
    /// * `url` - Absolute URL
    /// * `payload` - Optional request body
    /// * `callback` - Invoked once with the outcome
    ///
    /// # Returns
    /// `Ok(())` once the request is queued; the outcome arrives through the
    /// callback. An error means the request was rejected and the callback
    /// will never run.
    fn request(
        &self,
        method: &str,
        url: &str,
        payload: Option<Bytes>,
        callback: NetworkCallback,
    ) -> DispatchResult<()>;

    /// Issue a request and wait for its delivery.
    async fn fetch(
        &self,
        method: &str,
        url: &str,
        payload: Option<Bytes>,
    ) -> DispatchResult<Delivery> {
        let (tx, rx) = oneshot::channel();
        self.request(
            method,
            url,
            payload,
            Box::new(move |success, data, error| {
                let _ = tx.send(Delivery::new(success, data, error));
            }),
        )?;

        rx.await.map_err(|_| DispatchError::Closed)
    }
}
