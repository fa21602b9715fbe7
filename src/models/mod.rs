//! Data carried through the client: captured requests, scripted responses,
//! and the values handed to callbacks.

mod request;
mod response;

pub use request::{Request, RequestId};
pub use response::{Delivery, ScriptedResponse};
