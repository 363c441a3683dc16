// Redfish REST client
//
// `RedfishClient` plus its per-resource endpoint files. Decoded verbs turn
// non-2xx replies into `Error::Request`; the `*_raw` variants hand the
// outcome back untouched for task monitoring.

pub mod certificates;
pub mod client;
pub mod manager;
pub mod models;
pub mod network;
pub mod response;
pub mod session;
pub mod system;
pub mod tasks;

pub use client::{DEFAULT_MAX_RETRY, RedfishClient};
pub use response::RedfishResponse;
