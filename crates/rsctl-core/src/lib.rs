//! Operations layer between `rsctl-api` and the `rsctl` binary.
//!
//! - **[`Controller`]**: one authenticated session plus the shared
//!   message-registry resolver and the task monitor. Every operation is a
//!   method on it.
//!
//! - **Validators**: [`plan_network_update`] and [`plan_time_update`] turn
//!   an operator delta into minimal PATCH payloads, rejecting unsafe
//!   combinations before any write.
//!
//! - **[`CoreError`]**: the six-way error taxonomy the CLI reports.

pub mod certificates;
pub mod config;
pub mod controller;
pub mod error;
pub mod manager;
pub mod network;
pub mod system;
pub mod tasks;
pub mod time;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ControllerConfig, TlsVerification};
pub use controller::Controller;
pub use error::{CoreError, ValidationRule};
pub use network::{NetworkDelta, NetworkPlan, NetworkSettings, plan_network_update};
pub use system::{PowerAction, SystemInfo};
pub use time::{TimeDelta, TimePlan, TimeSettings, plan_time_update};

pub use rsctl_api::redfish::models::{Certificate, ComputerSystem, Manager};
pub use rsctl_api::{
    MessageRegistry, MonitorOutcome, NoProgress, ProgressEvent, ProgressSink, Task, TaskState,
    TerminalState,
};
