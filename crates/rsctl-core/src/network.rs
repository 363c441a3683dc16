// ── Network configuration ──
//
// Turns an operator's partial network delta into minimal PATCH payloads.
// Every rule is checked against current device state before the first
// write; the DHCP state the rules see is resolved once (delta value, else
// current value).

use serde::Serialize;
use tracing::{debug, info};

use rsctl_api::ProgressSink;
use rsctl_api::redfish::models::{
    Dhcpv4, EthernetInterface, EthernetInterfacePatch, Ipv4Address, ManagerNetworkProtocol,
    NetworkProtocolPatch, ProxySettings,
};

use crate::controller::Controller;
use crate::error::{CoreError, ValidationRule};

/// Fields an operator wants changed. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkDelta {
    pub dhcp: Option<bool>,
    pub static_address: Option<String>,
    pub subnet_mask: Option<String>,
    pub gateway: Option<String>,
    pub name_servers: Option<Vec<String>>,
    pub use_dhcp_dns: Option<bool>,
    pub proxy: Option<bool>,
    pub proxy_server: Option<String>,
    pub proxy_exclude: Option<Vec<String>>,
    pub mdns: Option<bool>,
}

/// Payloads to submit, in submission order: interface, mDNS, proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkPlan {
    pub interface: Option<EthernetInterfacePatch>,
    pub mdns: Option<NetworkProtocolPatch>,
    pub proxy: Option<NetworkProtocolPatch>,
}

impl NetworkPlan {
    pub fn is_empty(&self) -> bool {
        self.interface.is_none() && self.mdns.is_none() && self.proxy.is_none()
    }
}

/// Current interface and protocol state, for display.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkSettings {
    pub interface: EthernetInterface,
    pub protocol: ManagerNetworkProtocol,
}

fn supplied(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Validate `delta` against current state and build the payloads.
///
/// Rules, first violation wins:
/// 1. disabling DHCP while enabled needs a static address and mask
/// 2. a static address must be non-blank and needs DHCP resolved off and a mask
/// 3. choosing the DNS source needs DHCP resolved on
/// 4. a supplied proxy server must be non-blank; enabling the proxy needs a
///    server URI, supplied or configured
pub fn plan_network_update(
    interface: &EthernetInterface,
    protocol: &ManagerNetworkProtocol,
    delta: &NetworkDelta,
) -> Result<NetworkPlan, CoreError> {
    let address = supplied(delta.static_address.as_ref());
    let mask = supplied(delta.subnet_mask.as_ref());

    if delta.dhcp == Some(false)
        && interface.dhcp_enabled()
        && (address.is_none() || mask.is_none())
    {
        return Err(CoreError::validation(
            ValidationRule::DhcpTransition,
            "Cannot disable DHCP without setting a static address and subnet mask",
        ));
    }

    let dhcp_resolved = delta.dhcp.unwrap_or_else(|| interface.dhcp_enabled());

    if delta.static_address.is_some() {
        if address.is_none() {
            return Err(CoreError::validation(
                ValidationRule::StaticAddress,
                "Static address must not be empty",
            ));
        }
        if dhcp_resolved {
            return Err(CoreError::validation(
                ValidationRule::StaticAddress,
                "Cannot set a static address when DHCP is enabled",
            ));
        }
        if mask.is_none() {
            return Err(CoreError::validation(
                ValidationRule::StaticAddress,
                "Static address requires a subnet mask",
            ));
        }
    }

    if delta.use_dhcp_dns.is_some() && !dhcp_resolved {
        return Err(CoreError::validation(
            ValidationRule::DnsSource,
            "Cannot use DHCP DNS servers when DHCP is disabled",
        ));
    }

    let proxy_server = supplied(delta.proxy_server.as_ref());
    if delta.proxy_server.is_some() && proxy_server.is_none() {
        return Err(CoreError::validation(
            ValidationRule::Proxy,
            "Proxy server must not be empty",
        ));
    }
    if delta.proxy == Some(true) && proxy_server.is_none() && protocol.proxy_uri().is_none() {
        return Err(CoreError::validation(
            ValidationRule::Proxy,
            "Cannot enable proxy without specifying a proxy server",
        ));
    }

    Ok(NetworkPlan {
        interface: interface_patch(delta, address, mask),
        mdns: delta.mdns.map(NetworkProtocolPatch::mdns),
        proxy: proxy_patch(delta, proxy_server),
    })
}

fn interface_patch(
    delta: &NetworkDelta,
    address: Option<&str>,
    mask: Option<&str>,
) -> Option<EthernetInterfacePatch> {
    let dhcpv4 = (delta.dhcp.is_some() || delta.use_dhcp_dns.is_some()).then(|| Dhcpv4 {
        dhcp_enabled: delta.dhcp,
        use_dns_servers: delta.use_dhcp_dns,
    });

    let ipv4_static_addresses = address.map(|address| {
        vec![Ipv4Address {
            address: Some(address.to_owned()),
            subnet_mask: mask.map(str::to_owned),
            gateway: supplied(delta.gateway.as_ref()).map(str::to_owned),
            address_origin: None,
        }]
    });

    let patch = EthernetInterfacePatch {
        dhcpv4,
        ipv4_static_addresses,
        static_name_servers: delta.name_servers.clone(),
    };
    (!patch.is_empty()).then_some(patch)
}

fn proxy_patch(delta: &NetworkDelta, server: Option<&str>) -> Option<NetworkProtocolPatch> {
    if delta.proxy.is_none() && server.is_none() && delta.proxy_exclude.is_none() {
        return None;
    }
    Some(NetworkProtocolPatch {
        proxy: Some(ProxySettings {
            enabled: delta.proxy,
            proxy_server_uri: server.map(str::to_owned),
            exclude_addresses: delta.proxy_exclude.clone(),
        }),
        ..NetworkProtocolPatch::default()
    })
}

impl Controller {
    /// Current interface and protocol settings.
    pub async fn network_settings(&self) -> Result<NetworkSettings, CoreError> {
        let interface = self.client().get_ethernet_interface().await?;
        let protocol = self.client().get_network_protocol().await?;
        Ok(NetworkSettings {
            interface,
            protocol,
        })
    }

    /// Validate and apply a network delta.
    ///
    /// Validation completes before any write. Each payload is monitored to
    /// completion before the next is sent. Returns the applied plan.
    pub async fn update_network(
        &self,
        delta: &NetworkDelta,
        sink: &mut (dyn ProgressSink + Send),
    ) -> Result<NetworkPlan, CoreError> {
        let interface = self.client().get_ethernet_interface().await?;
        let protocol = self.client().get_network_protocol().await?;
        let plan = plan_network_update(&interface, &protocol, delta)?;

        if plan.is_empty() {
            debug!("network delta is empty, nothing to submit");
            return Ok(plan);
        }

        if let Some(patch) = &plan.interface {
            let started = self.client().patch_ethernet_interface(patch).await?;
            self.monitor_checked(started, sink, "Failed to update network settings")
                .await?;
        }
        if let Some(patch) = &plan.mdns {
            let started = self.client().patch_network_protocol(patch).await?;
            self.monitor_checked(started, sink, "Failed to update mDNS settings")
                .await?;
        }
        if let Some(patch) = &plan.proxy {
            let started = self.client().patch_network_protocol(patch).await?;
            self.monitor_checked(started, sink, "Failed to update proxy settings")
                .await?;
        }

        info!("network settings updated");
        Ok(plan)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn interface(dhcp: bool) -> EthernetInterface {
        serde_json::from_value(json!({"DHCPv4": {"DHCPEnabled": dhcp}})).unwrap()
    }

    fn protocol(proxy_uri: Option<&str>) -> ManagerNetworkProtocol {
        serde_json::from_value(json!({"Proxy": {"Enabled": false, "ProxyServerURI": proxy_uri}}))
            .unwrap()
    }

    fn rule_of(result: Result<NetworkPlan, CoreError>) -> ValidationRule {
        match result {
            Err(CoreError::Validation { rule, .. }) => rule,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn disabling_dhcp_without_static_address_is_rejected() {
        let delta = NetworkDelta {
            dhcp: Some(false),
            ..NetworkDelta::default()
        };
        let rule = rule_of(plan_network_update(&interface(true), &protocol(None), &delta));
        assert_eq!(rule, ValidationRule::DhcpTransition);
    }

    #[test]
    fn disabling_dhcp_with_static_address_builds_one_interface_payload() {
        let delta = NetworkDelta {
            dhcp: Some(false),
            static_address: Some("10.0.0.5".into()),
            subnet_mask: Some("255.255.255.0".into()),
            ..NetworkDelta::default()
        };
        let plan = plan_network_update(&interface(true), &protocol(None), &delta).unwrap();

        assert_eq!(
            serde_json::to_value(plan.interface.unwrap()).unwrap(),
            json!({
                "DHCPv4": {"DHCPEnabled": false},
                "IPv4StaticAddresses": [{"Address": "10.0.0.5", "SubnetMask": "255.255.255.0"}]
            })
        );
        assert!(plan.mdns.is_none());
        assert!(plan.proxy.is_none());
    }

    #[test]
    fn gateway_and_name_servers_ride_along() {
        let delta = NetworkDelta {
            static_address: Some("10.0.0.5".into()),
            subnet_mask: Some("255.255.255.0".into()),
            gateway: Some("10.0.0.1".into()),
            name_servers: Some(vec!["1.1.1.1".into(), "8.8.8.8".into()]),
            ..NetworkDelta::default()
        };
        let plan = plan_network_update(&interface(false), &protocol(None), &delta).unwrap();

        assert_eq!(
            serde_json::to_value(plan.interface.unwrap()).unwrap(),
            json!({
                "IPv4StaticAddresses": [{
                    "Address": "10.0.0.5", "SubnetMask": "255.255.255.0", "Gateway": "10.0.0.1"
                }],
                "StaticNameServers": ["1.1.1.1", "8.8.8.8"]
            })
        );
    }

    #[test]
    fn static_address_rules() {
        let with_dhcp = NetworkDelta {
            static_address: Some("10.0.0.5".into()),
            subnet_mask: Some("255.255.255.0".into()),
            ..NetworkDelta::default()
        };
        assert_eq!(
            rule_of(plan_network_update(&interface(true), &protocol(None), &with_dhcp)),
            ValidationRule::StaticAddress
        );

        let without_mask = NetworkDelta {
            static_address: Some("10.0.0.5".into()),
            ..NetworkDelta::default()
        };
        let err = plan_network_update(&interface(false), &protocol(None), &without_mask)
            .unwrap_err();
        assert_eq!(err.to_string(), "Static address requires a subnet mask");
    }

    #[test]
    fn dhcp_dns_while_disabling_dhcp_is_rejected() {
        let delta = NetworkDelta {
            dhcp: Some(false),
            static_address: Some("10.0.0.5".into()),
            subnet_mask: Some("255.255.255.0".into()),
            use_dhcp_dns: Some(true),
            ..NetworkDelta::default()
        };
        assert_eq!(
            rule_of(plan_network_update(&interface(true), &protocol(None), &delta)),
            ValidationRule::DnsSource
        );
    }

    #[test]
    fn dhcp_dns_uses_resolved_dhcp_state() {
        // Enabling DHCP in the same delta makes the DNS choice valid even
        // though DHCP is currently off.
        let delta = NetworkDelta {
            dhcp: Some(true),
            use_dhcp_dns: Some(false),
            ..NetworkDelta::default()
        };
        let plan = plan_network_update(&interface(false), &protocol(None), &delta).unwrap();
        assert_eq!(
            serde_json::to_value(plan.interface.unwrap()).unwrap(),
            json!({"DHCPv4": {"DHCPEnabled": true, "UseDNSServers": false}})
        );
    }

    #[test]
    fn enabling_proxy_needs_a_server() {
        let delta = NetworkDelta {
            proxy: Some(true),
            ..NetworkDelta::default()
        };
        let err = plan_network_update(&interface(true), &protocol(None), &delta).unwrap_err();
        assert_eq!(err.to_string(), "Cannot enable proxy without specifying a proxy server");

        // Blank configured URI counts as none.
        assert_eq!(
            rule_of(plan_network_update(&interface(true), &protocol(Some("")), &delta)),
            ValidationRule::Proxy
        );

        // Already configured is enough.
        let configured = protocol(Some("http://proxy:3128"));
        let plan = plan_network_update(&interface(true), &configured, &delta).unwrap();
        assert!(plan.proxy.is_some());
    }

    #[test]
    fn blank_proxy_server_never_clears_the_configured_one() {
        let delta = NetworkDelta {
            proxy: Some(true),
            proxy_server: Some(String::new()),
            ..NetworkDelta::default()
        };
        let configured = protocol(Some("http://proxy:3128"));
        let err = plan_network_update(&interface(true), &configured, &delta).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation {
                rule: ValidationRule::Proxy,
                ..
            }
        ));
        assert_eq!(err.to_string(), "Proxy server must not be empty");

        let padded = NetworkDelta {
            proxy: Some(true),
            proxy_server: Some("  http://proxy:3128 ".into()),
            ..NetworkDelta::default()
        };
        let plan = plan_network_update(&interface(true), &protocol(None), &padded).unwrap();
        assert_eq!(
            serde_json::to_value(plan.proxy.unwrap()).unwrap(),
            json!({"Proxy": {"Enabled": true, "ProxyServerURI": "http://proxy:3128"}})
        );
    }

    #[test]
    fn blank_static_address_is_rejected_not_dropped() {
        let delta = NetworkDelta {
            static_address: Some("  ".into()),
            subnet_mask: Some("255.255.255.0".into()),
            ..NetworkDelta::default()
        };
        let err = plan_network_update(&interface(false), &protocol(None), &delta).unwrap_err();
        assert_eq!(err.to_string(), "Static address must not be empty");
        assert_eq!(
            rule_of(plan_network_update(&interface(false), &protocol(None), &delta)),
            ValidationRule::StaticAddress
        );
    }

    #[test]
    fn enabling_proxy_with_server_builds_exactly_one_proxy_payload() {
        let delta = NetworkDelta {
            proxy: Some(true),
            proxy_server: Some("http://proxy:3128".into()),
            proxy_exclude: Some(vec!["10.0.0.0/8".into()]),
            ..NetworkDelta::default()
        };
        let plan = plan_network_update(&interface(true), &protocol(None), &delta).unwrap();

        assert!(plan.interface.is_none());
        assert!(plan.mdns.is_none());
        assert_eq!(
            serde_json::to_value(plan.proxy.unwrap()).unwrap(),
            json!({"Proxy": {
                "Enabled": true,
                "ProxyServerURI": "http://proxy:3128",
                "ExcludeAddresses": ["10.0.0.0/8"]
            }})
        );
    }

    #[test]
    fn mdns_is_its_own_payload() {
        let delta = NetworkDelta {
            mdns: Some(false),
            ..NetworkDelta::default()
        };
        let plan = plan_network_update(&interface(true), &protocol(None), &delta).unwrap();
        assert_eq!(plan.mdns, Some(NetworkProtocolPatch::mdns(false)));
        assert!(plan.interface.is_none());
        assert!(plan.proxy.is_none());
    }

    #[test]
    fn empty_delta_builds_nothing() {
        let plan =
            plan_network_update(&interface(true), &protocol(None), &NetworkDelta::default())
                .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn first_violation_wins() {
        // Breaks the DHCP transition and the proxy rule; only the first is reported.
        let delta = NetworkDelta {
            dhcp: Some(false),
            proxy: Some(true),
            ..NetworkDelta::default()
        };
        assert_eq!(
            rule_of(plan_network_update(&interface(true), &protocol(None), &delta)),
            ValidationRule::DhcpTransition
        );
    }
}
