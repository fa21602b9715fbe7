//! The request/response pipeline behind the callback client.
//!
//! ```text
//! submit ──▶ [background worker] ──▶ [delivery scheduler] ──▶ [main context] ──▶ callback
//!            runs the script          waits the delay           runs callbacks
//!            (serial, FIFO)           (deadline order)          (serial, FIFO)
//! ```
//!
//! - [`Dispatcher`] captures the request and owns the background worker
//! - [`Resolver`] classifies the scripted response and schedules delivery
//! - [`DeliveryScheduler`] releases callbacks once their delay has elapsed
//! - [`MainContext`] is the single foreground context callbacks run on
//!
//! Script invocations happen strictly in submission order. Deliveries
//! follow deadline order, so a long delay on an early request may let a
//! later request deliver first.
//!
//! A panicking script is answered with a client-domain failure carrying
//! [`SCRIPT_PANIC_CODE`]. A panicking callback is logged and the main
//! context keeps running. Each accepted request holds an [`InFlightGuard`]
//! until its callback has run, so neither case leaves `wait_idle` hanging.

mod dispatcher;
mod main_context;
mod resolver;
mod scheduler;
pub mod script;
mod state;

pub use dispatcher::{is_background_context, Dispatcher};
pub use main_context::{is_main_context, MainContext, MainJob};
pub use resolver::{log_outcome, resolve, DeliveryOutcome, Resolver};
pub use scheduler::DeliveryScheduler;
pub use script::{ResponseScript, SCRIPT_PANIC_CODE, TRANSPORT_ERROR_PLACEHOLDER_STATUS};
pub use state::{ClientState, InFlightGuard};

use std::sync::Arc;

/// Spawn a complete pipeline for `state` and return its entry point.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn spawn_pipeline(label: &str, state: Arc<ClientState>) -> Dispatcher {
    let main = MainContext::spawn(label);
    let scheduler = DeliveryScheduler::spawn(main);
    let resolver = Resolver::new(scheduler, state.clone());
    Dispatcher::spawn(label, state, resolver)
}
