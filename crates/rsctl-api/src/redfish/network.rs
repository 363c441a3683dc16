// Network endpoints
//
// The controller's own NIC (`EthernetInterfaces/eth0`) and the protocol
// settings that hang off `NetworkProtocol` (NTP, proxy, OEM mDNS).

use tracing::debug;

use crate::error::Error;
use crate::redfish::client::RedfishClient;
use crate::redfish::models::{
    EthernetInterface, EthernetInterfacePatch, ManagerNetworkProtocol, NetworkProtocolPatch,
};
use crate::redfish::response::RedfishResponse;

pub const ETHERNET_INTERFACE_PATH: &str = "/redfish/v1/Managers/1/EthernetInterfaces/eth0";
pub const NETWORK_PROTOCOL_PATH: &str = "/redfish/v1/Managers/1/NetworkProtocol";

impl RedfishClient {
    /// `GET /redfish/v1/Managers/1/EthernetInterfaces/eth0`
    pub async fn get_ethernet_interface(&self) -> Result<EthernetInterface, Error> {
        debug!("fetching ethernet interface");
        self.get_json(ETHERNET_INTERFACE_PATH).await
    }

    /// `GET /redfish/v1/Managers/1/NetworkProtocol`
    pub async fn get_network_protocol(&self) -> Result<ManagerNetworkProtocol, Error> {
        debug!("fetching network protocol");
        self.get_json(NETWORK_PROTOCOL_PATH).await
    }

    /// PATCH the interface; the outcome is returned undecoded for monitoring.
    pub async fn patch_ethernet_interface(
        &self,
        patch: &EthernetInterfacePatch,
    ) -> Result<RedfishResponse, Error> {
        debug!(?patch, "patching ethernet interface");
        self.patch_raw(ETHERNET_INTERFACE_PATH, patch).await
    }

    /// PATCH protocol settings; the outcome is returned undecoded for monitoring.
    pub async fn patch_network_protocol(
        &self,
        patch: &NetworkProtocolPatch,
    ) -> Result<RedfishResponse, Error> {
        debug!(?patch, "patching network protocol");
        self.patch_raw(NETWORK_PROTOCOL_PATH, patch).await
    }
}
