// Manager endpoints
//
// The management controller itself: identity, clock, reset actions, the
// operator account password, and firmware upload.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::redfish::client::RedfishClient;
use crate::redfish::models::{Manager, ManagerClockPatch};
use crate::redfish::response::RedfishResponse;

pub const MANAGER_PATH: &str = "/redfish/v1/Managers/1";
const MANAGER_RESET_PATH: &str = "/redfish/v1/Managers/1/Actions/Manager.Reset";
const MANAGER_RESET_DEFAULTS_PATH: &str = "/redfish/v1/Managers/1/Actions/Manager.ResetToDefaults";
const ACCOUNT_PATH: &str = "/redfish/v1/AccountService/Accounts/1";
pub const MULTIPART_UPDATE_PATH: &str = "/redfish/v1/UpdateService/MultipartUpdate";
const UPDATE_FILE_FIELD: &str = "UpdateFile";

impl RedfishClient {
    /// `GET /redfish/v1/Managers/1`
    pub async fn get_manager(&self) -> Result<Manager, Error> {
        debug!("fetching manager");
        self.get_json(MANAGER_PATH).await
    }

    /// `PATCH /redfish/v1/Managers/1` with `DateTime` / `DateTimeLocalOffset`.
    pub async fn patch_manager_clock(
        &self,
        patch: &ManagerClockPatch,
    ) -> Result<RedfishResponse, Error> {
        debug!(?patch, "patching manager clock");
        self.patch_raw(MANAGER_PATH, patch).await
    }

    /// `POST .../Manager.Reset` with `{"ResetType":"ForceRestart"}`
    pub async fn restart_manager(&self) -> Result<RedfishResponse, Error> {
        debug!("restarting manager");
        self.post(MANAGER_RESET_PATH, &json!({ "ResetType": "ForceRestart" }))
            .await
    }

    /// `POST .../Manager.ResetToDefaults` with `{"ResetToDefaultsType":"ResetAll"}`
    pub async fn factory_reset_manager(&self) -> Result<RedfishResponse, Error> {
        debug!("resetting manager to factory defaults");
        self.post(
            MANAGER_RESET_DEFAULTS_PATH,
            &json!({ "ResetToDefaultsType": "ResetAll" }),
        )
        .await
    }

    /// `PATCH /redfish/v1/AccountService/Accounts/1` with `{"Password": ...}`
    pub async fn set_account_password(&self, password: &str) -> Result<RedfishResponse, Error> {
        debug!("changing account password");
        self.patch(ACCOUNT_PATH, &json!({ "Password": password }))
            .await
    }

    /// Raw multipart firmware upload; the outcome is returned undecoded
    /// for monitoring.
    pub async fn upload_firmware(
        &self,
        file_name: &str,
        image: Vec<u8>,
    ) -> Result<RedfishResponse, Error> {
        debug!(file_name, bytes = image.len(), "uploading firmware image");
        self.post_multipart_raw(MULTIPART_UPDATE_PATH, UPDATE_FILE_FIELD, file_name, image)
            .await
    }
}
