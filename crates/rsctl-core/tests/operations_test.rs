#![allow(clippy::unwrap_used)]
// Integration tests for `Controller` operations against a wiremock
// controller: validation ordering, monitored writes, password
// verification and message-registry fallback.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rsctl_core::{
    Controller, ControllerConfig, CoreError, NetworkDelta, NoProgress, PowerAction, ProgressEvent,
    TimeDelta, ValidationRule,
};

const SESSIONS: &str = "/redfish/v1/SessionService/Sessions";
const ETH0: &str = "/redfish/v1/Managers/1/EthernetInterfaces/eth0";
const PROTOCOL: &str = "/redfish/v1/Managers/1/NetworkProtocol";
const MANAGER: &str = "/redfish/v1/Managers/1";

// ── Helpers ─────────────────────────────────────────────────────────

fn config(server: &MockServer, password: &str) -> ControllerConfig {
    let mut config = ControllerConfig::new(
        Url::parse(&server.uri()).unwrap(),
        "admin",
        SecretString::from(password.to_owned()),
    );
    config.poll_interval = Duration::from_millis(10);
    config.max_retry = 1;
    config
}

async fn mount_login(server: &MockServer, password: &str, token: &str) {
    Mock::given(method("POST"))
        .and(path(SESSIONS))
        .and(body_json(json!({"UserName": "admin", "Password": password})))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Auth-Token", token)
                .insert_header("Location", format!("{SESSIONS}/{token}"))
                .set_body_json(json!({"Id": token})),
        )
        .mount(server)
        .await;
}

async fn connected() -> (MockServer, Controller) {
    let server = MockServer::start().await;
    mount_login(&server, "secret", "s1").await;
    let controller = Controller::new(config(&server, "secret")).unwrap();
    controller.connect().await.unwrap();
    (server, controller)
}

async fn mount_network_state(server: &MockServer, dhcp: bool) {
    Mock::given(method("GET"))
        .and(path(ETH0))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "DHCPv4": {"DHCPEnabled": dhcp, "UseDNSServers": dhcp},
            "IPv4Addresses": [{"Address": "10.0.0.5", "SubnetMask": "255.255.255.0"}]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(PROTOCOL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "HostName": "bmc",
            "NTP": {"ProtocolEnabled": false, "NTPServers": []},
            "Proxy": {"Enabled": false, "ProxyServerURI": ""}
        })))
        .mount(server)
        .await;
}

fn extended_info(message: &str) -> serde_json::Value {
    json!({"error": {"@Message.ExtendedInfo": [{"Message": message}]}})
}

// ── Network ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_network_update_submits_interface_before_mdns() {
    let (server, controller) = connected().await;
    mount_network_state(&server, true).await;

    Mock::given(method("PATCH"))
        .and(path(ETH0))
        .and(body_json(json!({
            "DHCPv4": {"DHCPEnabled": false},
            "IPv4StaticAddresses": [{"Address": "10.0.0.9", "SubnetMask": "255.255.255.0"}]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(PROTOCOL))
        .and(body_json(json!({
            "Oem": {"HP": {"mDNSDiscoveryProtocol": {"ProtocolEnabled": true}}}
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let delta = NetworkDelta {
        dhcp: Some(false),
        static_address: Some("10.0.0.9".into()),
        subnet_mask: Some("255.255.255.0".into()),
        mdns: Some(true),
        ..NetworkDelta::default()
    };
    let plan = controller.update_network(&delta, &mut NoProgress).await.unwrap();
    assert!(plan.interface.is_some());
    assert!(plan.proxy.is_none());

    let patched: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "PATCH")
        .map(|r| r.url.path().to_owned())
        .collect();
    assert_eq!(patched, vec![ETH0.to_owned(), PROTOCOL.to_owned()]);
}

#[tokio::test]
async fn test_network_validation_rejects_before_any_write() {
    let (server, controller) = connected().await;
    mount_network_state(&server, true).await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let delta = NetworkDelta {
        static_address: Some("10.0.0.9".into()),
        subnet_mask: Some("255.255.255.0".into()),
        mdns: Some(false),
        ..NetworkDelta::default()
    };
    let err = controller
        .update_network(&delta, &mut NoProgress)
        .await
        .unwrap_err();

    match err {
        CoreError::Validation { rule, message } => {
            assert_eq!(rule, ValidationRule::StaticAddress);
            assert_eq!(message, "Cannot set a static address when DHCP is enabled");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_network_task_failure_carries_context_and_message() {
    let (server, controller) = connected().await;
    mount_network_state(&server, false).await;
    let monitor = "/redfish/v1/TaskService/Tasks/7/Monitor";

    Mock::given(method("PATCH"))
        .and(path(ETH0))
        .respond_with(ResponseTemplate::new(202).insert_header("Location", monitor))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(monitor))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(extended_info("Invalid subnet mask.")),
        )
        .mount(&server)
        .await;

    let delta = NetworkDelta {
        static_address: Some("10.0.0.9".into()),
        subnet_mask: Some("255.0.255.0".into()),
        ..NetworkDelta::default()
    };
    let err = controller
        .update_network(&delta, &mut NoProgress)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to update network settings: Invalid subnet mask."
    );
    assert!(matches!(err, CoreError::Request { status: Some(400), .. }));
}

// ── Time ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_manual_time_rejected_while_ntp_enabled() {
    let (server, controller) = connected().await;
    Mock::given(method("GET"))
        .and(path(PROTOCOL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "NTP": {"ProtocolEnabled": true, "NTPServers": ["pool.ntp.org"]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let delta = TimeDelta {
        date_time: Some("2024-06-07T12:29:01-03:00".into()),
        ..TimeDelta::default()
    };
    let err = controller
        .update_time(&delta, &mut NoProgress)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::Validation {
            rule: ValidationRule::ManualTime,
            ..
        }
    ));
}

// ── Manager ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_password_change_verified_after_session_loss() {
    let (server, controller) = connected().await;
    mount_login(&server, "n3w-pass", "s2").await;

    Mock::given(method("PATCH"))
        .and(path("/redfish/v1/AccountService/Accounts/1"))
        .and(body_json(json!({"Password": "n3w-pass"})))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(MANAGER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Model": "iLO 5", "FirmwareVersion": "2.78"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{SESSIONS}/s2")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    controller
        .change_password(&SecretString::from("n3w-pass".to_owned()))
        .await
        .unwrap();
    assert!(!controller.session_state().is_authenticated());
}

#[tokio::test]
async fn test_password_change_reports_failed_verification() {
    let (server, controller) = connected().await;

    Mock::given(method("PATCH"))
        .and(path("/redfish/v1/AccountService/Accounts/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SESSIONS))
        .and(body_json(json!({"UserName": "admin", "Password": "typo"})))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = controller
        .change_password(&SecretString::from("typo".to_owned()))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Auth { session_lost: false, .. }));
    assert!(
        err.to_string()
            .starts_with("Failed to login with the new password: Login failed")
    );
}

#[tokio::test]
async fn test_firmware_session_loss_is_reported_as_uncertain() {
    let (server, controller) = connected().await;
    let monitor = "/redfish/v1/TaskService/Tasks/9/Monitor";

    Mock::given(method("POST"))
        .and(path("/redfish/v1/UpdateService/MultipartUpdate"))
        .respond_with(ResponseTemplate::new(202).insert_header("Location", monitor))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(monitor))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut events = Vec::new();
    let err = controller
        .update_firmware("ilo5_278.fwpkg", b"image".to_vec(), &mut events)
        .await
        .unwrap_err();

    assert!(err.is_session_lost());
    assert!(err.to_string().contains("Please use 'manager get'"));
    assert_eq!(events.last(), Some(&ProgressEvent::Finished));
}

// ── System ──────────────────────────────────────────────────────────

async fn mount_system_with_blink(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Model": "ProLiant DL360 Gen10",
            "PowerState": "On",
            "Oem": {"HP": {"BlinkCodeState": {
                "Type": "None",
                "MessageId": "HPBlinkCode.1.1.0.NoFault"
            }}}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_blink_code_resolved_from_registry() {
    let (server, controller) = connected().await;
    mount_system_with_blink(&server).await;
    Mock::given(method("GET"))
        .and(path("/registries/en/HPBlinkCode.1.1.0.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Messages": {"NoFault": {"Message": "No fault detected."}}
        })))
        .mount(&server)
        .await;

    let info = controller.system_info().await.unwrap();
    assert_eq!(info.blink_message.as_deref(), Some("No fault detected."));
    assert_eq!(info.system.power_state.as_deref(), Some("On"));
}

#[tokio::test]
async fn test_blink_code_falls_back_to_raw_id() {
    let (server, controller) = connected().await;
    mount_system_with_blink(&server).await;

    let info = controller.system_info().await.unwrap();
    assert_eq!(
        info.blink_message.as_deref(),
        Some("HPBlinkCode.1.1.0.NoFault")
    );
}

#[tokio::test]
async fn test_power_failure_names_the_command() {
    let (server, controller) = connected().await;
    Mock::given(method("POST"))
        .and(path("/redfish/v1/Systems/1/Actions/ComputerSystem.Reset"))
        .and(body_json(json!({"ResetType": "ForceOff"})))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = controller
        .set_power(PowerAction::ForceOff, &mut NoProgress)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Power command 'ForceOff' failed: No error message"
    );
}

// ── Tasks & certificates ────────────────────────────────────────────

#[tokio::test]
async fn test_running_filter_skips_finished_tasks() {
    let (server, controller) = connected().await;
    Mock::given(method("GET"))
        .and(path("/redfish/v1/TaskService/Tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Members": [
                {"@odata.id": "/redfish/v1/TaskService/Tasks/1"},
                {"@odata.id": "/redfish/v1/TaskService/Tasks/2"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/redfish/v1/TaskService/Tasks/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "1", "TaskState": "Completed"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/redfish/v1/TaskService/Tasks/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "2", "TaskState": "Running"
        })))
        .mount(&server)
        .await;

    assert_eq!(controller.list_tasks(false).await.unwrap().len(), 2);
    let running = controller.list_tasks(true).await.unwrap();
    assert_eq!(running.len(), 1);
    assert_eq!(running[0].id.as_deref(), Some("2"));
}

#[tokio::test]
async fn test_empty_certificate_is_rejected_locally() {
    let (server, controller) = connected().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = controller.add_trusted_certificate("  \n").await.unwrap_err();
    assert!(matches!(err, CoreError::Format { .. }));
}
