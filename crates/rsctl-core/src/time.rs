// ── Time settings ──
//
// NTP lives on NetworkProtocol, the manual clock on the manager. A manual
// date-time or offset is only accepted while NTP is (and stays) disabled.

use serde::Serialize;
use tracing::info;

use rsctl_api::ProgressSink;
use rsctl_api::redfish::models::{
    ManagerClockPatch, ManagerNetworkProtocol, NetworkProtocolPatch, NtpSettings,
};

use crate::controller::Controller;
use crate::error::{CoreError, ValidationRule};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeDelta {
    pub ntp: Option<bool>,
    pub ntp_servers: Option<Vec<String>>,
    /// ISO 8601, e.g. `2024-06-07T12:29:01-03:00`.
    pub date_time: Option<String>,
    /// `[+-]HH:MM`
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimePlan {
    pub ntp: Option<NetworkProtocolPatch>,
    pub clock: Option<ManagerClockPatch>,
}

impl TimePlan {
    pub fn is_empty(&self) -> bool {
        self.ntp.is_none() && self.clock.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeSettings {
    pub date_time: Option<String>,
    pub offset: Option<String>,
    pub ntp_enabled: bool,
    pub ntp_servers: Vec<String>,
}

fn is_offset(value: &str) -> bool {
    let bytes = value.as_bytes();
    matches!(bytes, [sign, h1, h2, b':', m1, m2]
        if (*sign == b'+' || *sign == b'-')
            && [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit()))
}

/// Validate `delta` against the current NTP state and build the payloads.
pub fn plan_time_update(
    protocol: &ManagerNetworkProtocol,
    delta: &TimeDelta,
) -> Result<TimePlan, CoreError> {
    if let Some(offset) = &delta.offset {
        if !is_offset(offset) {
            return Err(CoreError::Format {
                message: format!("time offset must look like +HH:MM or -HH:MM, got {offset:?}"),
            });
        }
    }

    let ntp_resolved = delta.ntp.unwrap_or_else(|| protocol.ntp_enabled());
    let manual = delta.date_time.is_some() || delta.offset.is_some();
    if manual && ntp_resolved {
        return Err(CoreError::validation(
            ValidationRule::ManualTime,
            "Can't manually set time when NTP is or will be enabled",
        ));
    }

    let ntp = (delta.ntp.is_some() || delta.ntp_servers.is_some()).then(|| NetworkProtocolPatch {
        ntp: Some(NtpSettings {
            protocol_enabled: delta.ntp,
            ntp_servers: delta.ntp_servers.clone(),
        }),
        ..NetworkProtocolPatch::default()
    });

    let clock = ManagerClockPatch {
        date_time: delta.date_time.clone(),
        date_time_local_offset: delta.offset.clone(),
    };

    Ok(TimePlan {
        ntp,
        clock: (!clock.is_empty()).then_some(clock),
    })
}

impl Controller {
    pub async fn time_settings(&self) -> Result<TimeSettings, CoreError> {
        let manager = self.client().get_manager().await?;
        let protocol = self.client().get_network_protocol().await?;
        Ok(TimeSettings {
            date_time: manager.date_time,
            offset: manager.date_time_local_offset,
            ntp_enabled: protocol.ntp_enabled(),
            ntp_servers: protocol.ntp_servers().to_vec(),
        })
    }

    /// Validate and apply a time delta: NTP first, then the clock.
    pub async fn update_time(
        &self,
        delta: &TimeDelta,
        sink: &mut (dyn ProgressSink + Send),
    ) -> Result<TimePlan, CoreError> {
        let protocol = self.client().get_network_protocol().await?;
        let plan = plan_time_update(&protocol, delta)?;

        if let Some(patch) = &plan.ntp {
            let started = self.client().patch_network_protocol(patch).await?;
            self.monitor_checked(started, sink, "Failed to update NTP settings")
                .await?;
        }
        if let Some(patch) = &plan.clock {
            let started = self.client().patch_manager_clock(patch).await?;
            self.monitor_checked(started, sink, "Failed to update time settings")
                .await?;
        }

        if !plan.is_empty() {
            info!("time settings updated");
        }
        Ok(plan)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn protocol(ntp: bool) -> ManagerNetworkProtocol {
        serde_json::from_value(json!({
            "NTP": {"ProtocolEnabled": ntp, "NTPServers": ["pool.ntp.org"]}
        }))
        .unwrap()
    }

    #[test]
    fn manual_time_rejected_while_ntp_enabled() {
        let delta = TimeDelta {
            date_time: Some("2024-06-07T12:29:01-03:00".into()),
            ..TimeDelta::default()
        };
        let err = plan_time_update(&protocol(true), &delta).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation {
                rule: ValidationRule::ManualTime,
                ..
            }
        ));
    }

    #[test]
    fn manual_time_rejected_when_ntp_will_be_enabled() {
        let delta = TimeDelta {
            ntp: Some(true),
            offset: Some("+02:00".into()),
            ..TimeDelta::default()
        };
        assert!(plan_time_update(&protocol(false), &delta).is_err());
    }

    #[test]
    fn disabling_ntp_allows_manual_time() {
        let delta = TimeDelta {
            ntp: Some(false),
            date_time: Some("2024-06-07T12:29:01Z".into()),
            offset: Some("-03:00".into()),
            ..TimeDelta::default()
        };
        let plan = plan_time_update(&protocol(true), &delta).unwrap();

        assert_eq!(
            serde_json::to_value(plan.ntp.unwrap()).unwrap(),
            json!({"NTP": {"ProtocolEnabled": false}})
        );
        assert_eq!(
            serde_json::to_value(plan.clock.unwrap()).unwrap(),
            json!({"DateTime": "2024-06-07T12:29:01Z", "DateTimeLocalOffset": "-03:00"})
        );
    }

    #[test]
    fn ntp_servers_alone_keep_current_state() {
        let delta = TimeDelta {
            ntp_servers: Some(vec!["time.example.com".into()]),
            ..TimeDelta::default()
        };
        let plan = plan_time_update(&protocol(true), &delta).unwrap();
        assert_eq!(
            serde_json::to_value(plan.ntp.unwrap()).unwrap(),
            json!({"NTP": {"NTPServers": ["time.example.com"]}})
        );
        assert!(plan.clock.is_none());
    }

    #[test]
    fn malformed_offset_is_a_format_error() {
        let delta = TimeDelta {
            offset: Some("3".into()),
            ..TimeDelta::default()
        };
        assert!(matches!(
            plan_time_update(&protocol(false), &delta),
            Err(CoreError::Format { .. })
        ));
        assert!(is_offset("+05:30"));
        assert!(!is_offset("05:30"));
    }
}
