// rsctl-api: Async Rust client for Redfish management controllers

pub mod auth;
pub mod error;
pub mod messages;
pub mod redfish;
pub mod task;
pub mod transport;

pub use auth::{Credentials, SessionState, SessionToken};
pub use error::Error;
pub use messages::{MessageId, MessageRegistry, extract_error_message};
pub use redfish::{RedfishClient, RedfishResponse};
pub use task::{
    MonitorOutcome, NoProgress, ProgressEvent, ProgressSink, Task, TaskMonitor, TaskPoller,
    TaskState, TerminalState,
};
pub use transport::{TlsMode, TransportConfig};
