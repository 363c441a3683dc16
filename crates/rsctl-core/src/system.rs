// ── Computer system operations ──

use serde::Serialize;
use tracing::info;

use rsctl_api::redfish::models::ComputerSystem;
use rsctl_api::{MonitorOutcome, ProgressSink};

use crate::controller::Controller;
use crate::error::CoreError;

/// `ResetType` values accepted by `ComputerSystem.Reset`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum PowerAction {
    On,
    GracefulShutdown,
    ForceOff,
    GracefulRestart,
    ForceRestart,
}

/// System resource plus the resolved blink-code text.
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub system: ComputerSystem,
    /// Registry text for the OEM blink code, or the raw message ID when it
    /// could not be resolved.
    pub blink_message: Option<String>,
}

impl Controller {
    pub async fn system_info(&self) -> Result<SystemInfo, CoreError> {
        let system = self.client().get_system().await?;
        let blink_message = match system.blink_code().and_then(|b| b.message_id.as_deref()) {
            Some(id) => Some(self.resolve_or_raw(id).await),
            None => None,
        };
        Ok(SystemInfo {
            system,
            blink_message,
        })
    }

    /// Send a power command and monitor it to completion.
    pub async fn set_power(
        &self,
        action: PowerAction,
        sink: &mut (dyn ProgressSink + Send),
    ) -> Result<MonitorOutcome, CoreError> {
        let started = self.client().reset_system(action.as_ref()).await?;
        let outcome = self.monitor(started, sink).await?;

        if !outcome.succeeded() {
            let status = outcome.response.status().as_u16();
            let message = outcome
                .error_message()
                .unwrap_or_else(|| "No error message".to_owned());
            return Err(CoreError::request(
                format!("Power command '{action}' failed"),
                Some(status),
                message,
            ));
        }

        info!(%action, "power command completed");
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn power_actions_use_redfish_names() {
        assert_eq!(PowerAction::GracefulShutdown.as_ref(), "GracefulShutdown");
        assert_eq!(PowerAction::from_str("ForceOff").unwrap(), PowerAction::ForceOff);
        assert_eq!(PowerAction::iter().count(), 5);
    }
}
