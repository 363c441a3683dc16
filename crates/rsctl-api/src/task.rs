// Asynchronous task monitoring
//
// A long-running operation answers 202 Accepted with a `Location` pointing
// at its task monitor. `TaskMonitor::run` polls that URI until the reply
// leaves 202, emitting progress events to a `ProgressSink` and sleeping for
// the server's `Retry-After` hint between polls.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::Error;
use crate::redfish::client::RedfishClient;
use crate::redfish::response::RedfishResponse;

/// Poll interval used when the server sends no (or a zero) `Retry-After`.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

// ── Task resource ────────────────────────────────────────────────────

/// Redfish `TaskState` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    New,
    Starting,
    Running,
    Suspended,
    Interrupted,
    Pending,
    Stopping,
    Completed,
    Killed,
    Exception,
    Service,
    Cancelling,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl TaskState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Starting => "Starting",
            Self::Running => "Running",
            Self::Suspended => "Suspended",
            Self::Interrupted => "Interrupted",
            Self::Pending => "Pending",
            Self::Stopping => "Stopping",
            Self::Completed => "Completed",
            Self::Killed => "Killed",
            Self::Exception => "Exception",
            Self::Service => "Service",
            Self::Cancelling => "Cancelling",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `/redfish/v1/TaskService/Tasks/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub task_state: Option<TaskState>,
    #[serde(default)]
    pub task_status: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub task_monitor: Option<String>,
    #[serde(default)]
    pub percent_complete: Option<u32>,
    #[serde(default)]
    pub messages: Vec<TaskMessage>,
}

impl Task {
    pub fn is_running(&self) -> bool {
        self.task_state == Some(TaskState::Running)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
}

// ── Progress events ──────────────────────────────────────────────────

/// One observation of a running task, in poll order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Liveness only: the body carried no message list.
    Tick,
    /// First message of the list, with the completion percentage if sent.
    Message { text: String, percent: Option<u64> },
    /// The task left the processing state.
    Finished,
}

impl ProgressEvent {
    /// Derive the event for one 202 reply.
    pub fn from_response(resp: &RedfishResponse) -> Self {
        let Some(body) = resp.json() else {
            return Self::Tick;
        };
        let Some(messages) = body.get("Messages") else {
            return Self::Tick;
        };

        let text = messages
            .as_array()
            .and_then(|list| list.first())
            .and_then(|first| {
                first
                    .get("Message")
                    .or_else(|| first.get("MessageId"))
                    .and_then(Value::as_str)
            })
            .unwrap_or_default()
            .to_owned();
        let percent = body.get("PercentComplete").and_then(Value::as_u64);

        Self::Message { text, percent }
    }
}

/// Receiver for progress events (terminal renderer, log, test recorder).
pub trait ProgressSink {
    fn event(&mut self, event: &ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn event(&mut self, _event: &ProgressEvent) {}
}

impl ProgressSink for Vec<ProgressEvent> {
    fn event(&mut self, event: &ProgressEvent) {
        self.push(event.clone());
    }
}

// ── Polling ──────────────────────────────────────────────────────────

/// Source of task monitor replies.
pub trait TaskPoller {
    /// Fetch the monitor URI without error decoding.
    fn poll(&self, monitor_uri: &str) -> impl Future<Output = Result<RedfishResponse, Error>>;
}

impl TaskPoller for RedfishClient {
    fn poll(&self, monitor_uri: &str) -> impl Future<Output = Result<RedfishResponse, Error>> {
        self.fetch(monitor_uri)
    }
}

/// How a monitored task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    Succeeded,
    Failed,
    Cancelled,
}

/// Final reply of a monitored task plus its classification.
#[derive(Debug, Clone)]
pub struct MonitorOutcome {
    pub response: RedfishResponse,
    pub state: TerminalState,
    /// Number of monitor fetches performed.
    pub polls: u32,
}

impl MonitorOutcome {
    fn new(response: RedfishResponse, polls: u32) -> Self {
        let state = classify(&response);
        Self {
            response,
            state,
            polls,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.state == TerminalState::Succeeded
    }

    /// Resolved failure text; `None` when the task succeeded.
    pub fn error_message(&self) -> Option<String> {
        self.response.error_message()
    }
}

fn classify(resp: &RedfishResponse) -> TerminalState {
    if resp.is_success() {
        return TerminalState::Succeeded;
    }
    let cancelled = resp
        .json()
        .and_then(|body| body.get("TaskState").cloned())
        .and_then(|state| serde_json::from_value::<TaskState>(state).ok())
        .is_some_and(|state| matches!(state, TaskState::Cancelled | TaskState::Killed));
    if cancelled {
        TerminalState::Cancelled
    } else {
        TerminalState::Failed
    }
}

/// Drives a task from 202 Accepted to a terminal reply.
///
/// No deadline of its own: wrap `run` in `tokio::time::timeout` for a
/// bounded wait. A failed task is an outcome, not an error; only transport
/// faults (and a 202 without a monitor URI) are returned as `Err`.
#[derive(Debug, Clone)]
pub struct TaskMonitor {
    default_interval: Duration,
}

impl Default for TaskMonitor {
    fn default() -> Self {
        Self {
            default_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl TaskMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the fallback poll interval.
    pub fn with_default_interval(mut self, interval: Duration) -> Self {
        self.default_interval = interval;
        self
    }

    /// Poll until the reply is no longer 202. Returns immediately for a
    /// reply that was never processing.
    pub async fn run<P, S>(
        &self,
        poller: &P,
        initial: RedfishResponse,
        sink: &mut S,
    ) -> Result<MonitorOutcome, Error>
    where
        P: TaskPoller + ?Sized,
        S: ProgressSink + ?Sized,
    {
        let mut response = initial;
        let mut monitor_uri: Option<String> = None;
        let mut polls = 0;

        while response.is_processing() {
            if let Some(location) = response.location() {
                monitor_uri = Some(location.to_owned());
            }
            let Some(uri) = monitor_uri.as_deref() else {
                return Err(Error::Request {
                    verb: "GET".into(),
                    path: "<task monitor>".into(),
                    status: response.status().as_u16(),
                    message: "task accepted without a Location header".into(),
                });
            };

            sink.event(&ProgressEvent::from_response(&response));

            let wait = response
                .retry_after()
                .filter(|d| !d.is_zero())
                .unwrap_or(self.default_interval);
            trace!(?wait, uri, "task processing");
            tokio::time::sleep(wait).await;

            response = poller.poll(uri).await?;
            polls += 1;
        }

        sink.event(&ProgressEvent::Finished);
        let outcome = MonitorOutcome::new(response, polls);
        debug!(state = ?outcome.state, polls, "task finished");
        Ok(outcome)
    }
}
