// ── Manager operations ──

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use rsctl_api::redfish::models::Manager;
use rsctl_api::{MonitorOutcome, ProgressSink};

use crate::controller::{Controller, ensure_succeeded};
use crate::error::CoreError;

/// Shown when a firmware upload outlives the session that started it.
pub const FIRMWARE_SESSION_LOST: &str =
    "The update might have succeeded, but the user session was lost.\n\
     Please use 'manager get' to confirm the version of the firmware.";

impl Controller {
    pub async fn manager_info(&self) -> Result<Manager, CoreError> {
        Ok(self.client().get_manager().await?)
    }

    /// Force-restart the management controller.
    pub async fn restart_manager(&self) -> Result<(), CoreError> {
        self.client().restart_manager().await?;
        info!("manager restart requested");
        Ok(())
    }

    /// Reset every manager setting to factory defaults.
    pub async fn factory_reset(&self) -> Result<(), CoreError> {
        self.client().factory_reset_manager().await?;
        info!("manager factory reset requested");
        Ok(())
    }

    /// Change the account password, then prove it by logging in again.
    ///
    /// A session lost right after the PATCH is not treated as failure:
    /// the change may have landed, and the verification login decides.
    pub async fn change_password(&self, new_password: &SecretString) -> Result<(), CoreError> {
        match self
            .client()
            .set_account_password(new_password.expose_secret())
            .await
        {
            Ok(_) => {}
            Err(e) if e.is_session_lost() => {
                warn!("session lost after password change, verifying with new password");
            }
            Err(e) => return Err(e.into()),
        }

        let verifier = Controller::with_registry(
            self.config().with_password(new_password.clone()),
            Arc::clone(self.registry()),
        )?;
        let verified = async {
            verifier.connect().await?;
            verifier.manager_info().await?;
            Ok::<(), CoreError>(())
        }
        .await;
        if let Err(e) = verifier.disconnect().await {
            warn!(error = %e, "verification session logout failed");
        }

        verified
            .map_err(|e| CoreError::auth(format!("Failed to login with the new password: {e}")))?;
        info!("password changed");
        Ok(())
    }

    /// Upload a firmware image and monitor the update to completion.
    pub async fn update_firmware(
        &self,
        file_name: &str,
        image: Vec<u8>,
        sink: &mut (dyn ProgressSink + Send),
    ) -> Result<MonitorOutcome, CoreError> {
        let started = self.client().upload_firmware(file_name, image).await?;
        let outcome = self.monitor(started, sink).await?;

        if outcome.response.status().as_u16() == 401 {
            return Err(CoreError::Auth {
                message: FIRMWARE_SESSION_LOST.to_owned(),
                session_lost: true,
            });
        }
        let outcome = ensure_succeeded(outcome, "Failed to update firmware")?;
        info!("firmware updated");
        Ok(outcome)
    }
}
