// ── Controller abstraction ──
//
// One authenticated session against one management controller, plus the
// shared message-registry resolver and the task monitor. Operations live
// in sibling modules as `impl Controller` blocks.

use std::sync::Arc;

use tracing::{debug, info, warn};

use rsctl_api::error::SESSION_LOST_ADVISORY;
use rsctl_api::{
    MessageRegistry, MonitorOutcome, ProgressSink, RedfishClient, RedfishResponse, SessionState,
    TaskMonitor,
};

use crate::config::ControllerConfig;
use crate::error::CoreError;

/// Entry point for every operation.
///
/// Not shareable between independent operations: build one controller per
/// logical sequence of calls. The registry resolver is the only piece meant
/// to be shared (pass the same `Arc` to each controller).
pub struct Controller {
    config: ControllerConfig,
    client: RedfishClient,
    registry: Arc<MessageRegistry>,
    monitor: TaskMonitor,
}

impl Controller {
    /// Build a controller with its own registry resolver. Does NOT connect.
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let registry = Arc::new(MessageRegistry::new(&config.transport())?);
        Self::with_registry(config, registry)
    }

    /// Build a controller that shares an existing registry resolver.
    pub fn with_registry(
        config: ControllerConfig,
        registry: Arc<MessageRegistry>,
    ) -> Result<Self, CoreError> {
        let client = RedfishClient::new(
            config.url.clone(),
            config.credentials(),
            &config.transport(),
            config.max_retry,
        )?;
        let monitor = TaskMonitor::new().with_default_interval(config.poll_interval);
        Ok(Self {
            config,
            client,
            registry,
            monitor,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn client(&self) -> &RedfishClient {
        &self.client
    }

    pub fn registry(&self) -> &Arc<MessageRegistry> {
        &self.registry
    }

    pub fn session_state(&self) -> SessionState {
        self.client.state()
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Log in. Fails with `Connect` when the retry budget runs out and
    /// `Auth` when the controller rejects the credentials.
    pub async fn connect(&self) -> Result<(), CoreError> {
        debug!(url = %self.config.url, "connecting");
        self.client.login().await?;
        info!(url = %self.config.url, "connected");
        Ok(())
    }

    /// Log out. A no-op when not connected.
    pub async fn disconnect(&self) -> Result<(), CoreError> {
        self.client.logout().await?;
        Ok(())
    }

    // ── Shared helpers ───────────────────────────────────────────

    /// Drive a started operation to its terminal reply.
    pub async fn monitor(
        &self,
        started: RedfishResponse,
        sink: &mut (dyn ProgressSink + Send),
    ) -> Result<MonitorOutcome, CoreError> {
        Ok(self.monitor.run(&self.client, started, sink).await?)
    }

    /// Monitor, then turn a non-success terminal reply into an error
    /// prefixed with `context`.
    pub(crate) async fn monitor_checked(
        &self,
        started: RedfishResponse,
        sink: &mut (dyn ProgressSink + Send),
        context: &str,
    ) -> Result<MonitorOutcome, CoreError> {
        let outcome = self.monitor(started, sink).await?;
        ensure_succeeded(outcome, context)
    }

    /// Resolve a registry message ID.
    pub async fn resolve_message(
        &self,
        message_id: &str,
        args: &[&str],
    ) -> Result<String, CoreError> {
        Ok(self
            .registry
            .resolve(self.client.base_url(), message_id, args)
            .await?)
    }

    /// Resolve a registry message ID, falling back to the raw ID.
    pub async fn resolve_or_raw(&self, message_id: &str) -> String {
        match self.resolve_message(message_id, &[]).await {
            Ok(text) => text,
            Err(e) => {
                warn!(message_id, error = %e, "message not resolved, showing raw ID");
                message_id.to_owned()
            }
        }
    }
}

/// Success passes through; a 401 is a lost session; anything else is a
/// `Request` error carrying the resolved message.
pub(crate) fn ensure_succeeded(
    outcome: MonitorOutcome,
    context: &str,
) -> Result<MonitorOutcome, CoreError> {
    if outcome.succeeded() {
        return Ok(outcome);
    }
    let status = outcome.response.status().as_u16();
    if status == 401 {
        return Err(CoreError::Auth {
            message: format!("{context}: session lost; {SESSION_LOST_ADVISORY}"),
            session_lost: true,
        });
    }
    let message = outcome
        .error_message()
        .unwrap_or_else(|| format!("task ended as {:?}", outcome.state));
    Err(CoreError::request(context, Some(status), message))
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("url", &self.config.url.as_str())
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
