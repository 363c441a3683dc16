// Redfish resource types
//
// Read models for the resources the CLI touches, plus the PATCH payload
// shapes. Redfish keys are PascalCase; acronym-heavy keys (`DHCPv4`,
// `MACAddress`, `NTPServers`, ...) carry explicit renames. Everything is
// optional because controller firmware omits fields freely.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Links & collections ──────────────────────────────────────────────

/// An `{"@odata.id": "..."}` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ODataLink {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

impl ODataLink {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            odata_id: path.into(),
        }
    }

    /// Last path segment, the member identifier.
    pub fn id(&self) -> &str {
        self.odata_id
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

/// Any resource collection; only member links are modeled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Collection {
    #[serde(default, rename = "Members")]
    pub members: Vec<ODataLink>,
}

// ── Manager ──────────────────────────────────────────────────────────

/// `/redfish/v1/Managers/1`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Manager {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub date_time_local_offset: Option<String>,
    #[serde(default)]
    pub oem: Option<ManagerOem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerOem {
    #[serde(default, rename = "HP")]
    pub hp: Option<ManagerOemHp>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerOemHp {
    #[serde(default, rename = "KVMSettings")]
    pub kvm_settings: Option<KvmSettings>,
    #[serde(default, rename = "HPRemoteSystemManagerBindingStatus")]
    pub rsm_binding: Option<RsmBinding>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KvmSettings {
    #[serde(default, rename = "DisableVideoOnKVMIdle")]
    pub disable_video_on_kvm_idle: Option<bool>,
    #[serde(default)]
    pub disable_collaboration: Option<bool>,
    #[serde(default)]
    pub disable_collaboration_authorization: Option<bool>,
    #[serde(default)]
    pub port_range_begin: Option<u32>,
    #[serde(default)]
    pub port_range_end: Option<u32>,
}

/// Remote System Manager binding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RsmBinding {
    #[serde(default)]
    pub binding_status: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
}

impl Manager {
    pub fn kvm_settings(&self) -> Option<&KvmSettings> {
        self.oem.as_ref()?.hp.as_ref()?.kvm_settings.as_ref()
    }

    pub fn rsm_binding(&self) -> Option<&RsmBinding> {
        self.oem.as_ref()?.hp.as_ref()?.rsm_binding.as_ref()
    }
}

/// PATCH body for the manager clock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManagerClockPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time_local_offset: Option<String>,
}

impl ManagerClockPatch {
    pub fn is_empty(&self) -> bool {
        self.date_time.is_none() && self.date_time_local_offset.is_none()
    }
}

// ── Ethernet interface ───────────────────────────────────────────────

/// `/redfish/v1/Managers/1/EthernetInterfaces/eth0`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EthernetInterface {
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default, rename = "FQDN")]
    pub fqdn: Option<String>,
    #[serde(default, rename = "MACAddress")]
    pub mac_address: Option<String>,
    #[serde(default, rename = "DHCPv4")]
    pub dhcpv4: Option<Dhcpv4>,
    #[serde(default, rename = "IPv4Addresses")]
    pub ipv4_addresses: Vec<Ipv4Address>,
    #[serde(default, rename = "IPv4StaticAddresses")]
    pub ipv4_static_addresses: Vec<Ipv4Address>,
    #[serde(default)]
    pub name_servers: Vec<String>,
    #[serde(default)]
    pub static_name_servers: Vec<String>,
}

impl EthernetInterface {
    /// Current DHCP state; controllers that omit it are treated as static.
    pub fn dhcp_enabled(&self) -> bool {
        self.dhcpv4
            .as_ref()
            .and_then(|d| d.dhcp_enabled)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dhcpv4 {
    #[serde(
        default,
        rename = "DHCPEnabled",
        skip_serializing_if = "Option::is_none"
    )]
    pub dhcp_enabled: Option<bool>,
    #[serde(
        default,
        rename = "UseDNSServers",
        skip_serializing_if = "Option::is_none"
    )]
    pub use_dns_servers: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ipv4Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_origin: Option<String>,
}

/// PATCH body for the ethernet interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EthernetInterfacePatch {
    #[serde(rename = "DHCPv4", skip_serializing_if = "Option::is_none")]
    pub dhcpv4: Option<Dhcpv4>,
    #[serde(rename = "IPv4StaticAddresses", skip_serializing_if = "Option::is_none")]
    pub ipv4_static_addresses: Option<Vec<Ipv4Address>>,
    #[serde(rename = "StaticNameServers", skip_serializing_if = "Option::is_none")]
    pub static_name_servers: Option<Vec<String>>,
}

impl EthernetInterfacePatch {
    pub fn is_empty(&self) -> bool {
        self.dhcpv4.is_none()
            && self.ipv4_static_addresses.is_none()
            && self.static_name_servers.is_none()
    }
}

// ── Network protocol ─────────────────────────────────────────────────

/// `/redfish/v1/Managers/1/NetworkProtocol`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerNetworkProtocol {
    #[serde(default, rename = "HostName")]
    pub host_name: Option<String>,
    #[serde(default, rename = "NTP")]
    pub ntp: Option<NtpSettings>,
    #[serde(default, rename = "Proxy")]
    pub proxy: Option<ProxySettings>,
    #[serde(default, rename = "Oem")]
    pub oem: Option<ProtocolOem>,
}

impl ManagerNetworkProtocol {
    pub fn ntp_enabled(&self) -> bool {
        self.ntp
            .as_ref()
            .and_then(|n| n.protocol_enabled)
            .unwrap_or(false)
    }

    pub fn ntp_servers(&self) -> &[String] {
        self.ntp
            .as_ref()
            .and_then(|n| n.ntp_servers.as_deref())
            .unwrap_or_default()
    }

    pub fn proxy_enabled(&self) -> bool {
        self.proxy
            .as_ref()
            .and_then(|p| p.enabled)
            .unwrap_or(false)
    }

    /// Configured proxy URI, treating an empty string as unset.
    pub fn proxy_uri(&self) -> Option<&str> {
        self.proxy
            .as_ref()
            .and_then(|p| p.proxy_server_uri.as_deref())
            .filter(|uri| !uri.trim().is_empty())
    }

    pub fn mdns_enabled(&self) -> Option<bool> {
        self.oem
            .as_ref()?
            .hp
            .as_ref()?
            .mdns
            .as_ref()?
            .protocol_enabled
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtpSettings {
    #[serde(
        default,
        rename = "ProtocolEnabled",
        skip_serializing_if = "Option::is_none"
    )]
    pub protocol_enabled: Option<bool>,
    #[serde(
        default,
        rename = "NTPServers",
        skip_serializing_if = "Option::is_none"
    )]
    pub ntp_servers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    #[serde(default, rename = "Enabled", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(
        default,
        rename = "ProxyServerURI",
        skip_serializing_if = "Option::is_none"
    )]
    pub proxy_server_uri: Option<String>,
    #[serde(
        default,
        rename = "ExcludeAddresses",
        skip_serializing_if = "Option::is_none"
    )]
    pub exclude_addresses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolOem {
    #[serde(default, rename = "HP", skip_serializing_if = "Option::is_none")]
    pub hp: Option<ProtocolOemHp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolOemHp {
    #[serde(
        default,
        rename = "mDNSDiscoveryProtocol",
        skip_serializing_if = "Option::is_none"
    )]
    pub mdns: Option<MdnsProtocol>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdnsProtocol {
    #[serde(
        default,
        rename = "ProtocolEnabled",
        skip_serializing_if = "Option::is_none"
    )]
    pub protocol_enabled: Option<bool>,
}

/// PATCH body for `NetworkProtocol` (proxy, mDNS, NTP).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkProtocolPatch {
    #[serde(rename = "NTP", skip_serializing_if = "Option::is_none")]
    pub ntp: Option<NtpSettings>,
    #[serde(rename = "Proxy", skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxySettings>,
    #[serde(rename = "Oem", skip_serializing_if = "Option::is_none")]
    pub oem: Option<ProtocolOem>,
}

impl NetworkProtocolPatch {
    /// `{"Oem":{"HP":{"mDNSDiscoveryProtocol":{"ProtocolEnabled":b}}}}`
    pub fn mdns(enabled: bool) -> Self {
        Self {
            oem: Some(ProtocolOem {
                hp: Some(ProtocolOemHp {
                    mdns: Some(MdnsProtocol {
                        protocol_enabled: Some(enabled),
                    }),
                }),
            }),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ntp.is_none() && self.proxy.is_none() && self.oem.is_none()
    }
}

// ── Computer system ──────────────────────────────────────────────────

/// `/redfish/v1/Systems/1`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComputerSystem {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub power_state: Option<String>,
    #[serde(default, rename = "IndicatorLED")]
    pub indicator_led: Option<String>,
    #[serde(default)]
    pub boot: Option<Boot>,
    #[serde(default)]
    pub status: Option<ResourceStatus>,
    #[serde(default)]
    pub oem: Option<SystemOem>,
    #[serde(default)]
    pub processor_summary: Option<ProcessorSummary>,
    #[serde(default)]
    pub memory_summary: Option<MemorySummary>,
}

impl ComputerSystem {
    pub fn oem_hp(&self) -> Option<&SystemOemHp> {
        self.oem.as_ref()?.hp.as_ref()
    }

    pub fn blink_code(&self) -> Option<&BlinkCodeState> {
        self.oem_hp()?.blink_code_state.as_ref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Boot {
    #[serde(default)]
    pub boot_source_override_target: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceStatus {
    #[serde(default)]
    pub health: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemOem {
    #[serde(default, rename = "HP")]
    pub hp: Option<SystemOemHp>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemOemHp {
    #[serde(default)]
    pub main_board_adapter_state: Option<String>,
    #[serde(default)]
    pub boot_state: Option<String>,
    #[serde(default)]
    pub blink_code_state: Option<BlinkCodeState>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlinkCodeState {
    #[serde(default, rename = "Type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub major: Option<Value>,
    #[serde(default)]
    pub minor: Option<Value>,
    #[serde(default)]
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessorSummary {
    #[serde(default)]
    pub core_count: Option<u32>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySummary {
    #[serde(default, rename = "TotalSystemMemoryGiB")]
    pub total_system_memory_gib: Option<f64>,
}

// ── Certificates ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Certificate {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub certificate_string: Option<String>,
    #[serde(default)]
    pub certificate_type: Option<String>,
    #[serde(default)]
    pub valid_not_after: Option<String>,
    #[serde(default)]
    pub fingerprint: Option<String>,
}

/// `/redfish/v1/CertificateService/CertificateLocations`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificateLocations {
    #[serde(default, rename = "Links")]
    pub links: CertificateLocationLinks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificateLocationLinks {
    #[serde(default, rename = "Certificates")]
    pub certificates: Vec<ODataLink>,
}
