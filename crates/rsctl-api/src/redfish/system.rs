// Computer system endpoints

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::redfish::client::RedfishClient;
use crate::redfish::models::ComputerSystem;
use crate::redfish::response::RedfishResponse;

pub const SYSTEM_PATH: &str = "/redfish/v1/Systems/1";
const SYSTEM_RESET_PATH: &str = "/redfish/v1/Systems/1/Actions/ComputerSystem.Reset";

impl RedfishClient {
    /// `GET /redfish/v1/Systems/1`
    pub async fn get_system(&self) -> Result<ComputerSystem, Error> {
        debug!("fetching computer system");
        self.get_json(SYSTEM_PATH).await
    }

    /// `POST .../ComputerSystem.Reset` with `{"ResetType": reset_type}`.
    ///
    /// Returned undecoded; power actions usually answer 202 and are monitored.
    pub async fn reset_system(&self, reset_type: &str) -> Result<RedfishResponse, Error> {
        debug!(reset_type, "resetting computer system");
        self.post_raw(SYSTEM_RESET_PATH, &json!({ "ResetType": reset_type }))
            .await
    }
}
