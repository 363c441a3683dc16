// ── Certificate operations ──

use tracing::info;

use rsctl_api::redfish::models::Certificate;

use crate::controller::Controller;
use crate::error::CoreError;

fn require_pem(what: &str, pem: &str) -> Result<(), CoreError> {
    if pem.trim().is_empty() {
        return Err(CoreError::Format {
            message: format!("{what} is empty"),
        });
    }
    Ok(())
}

impl Controller {
    pub async fn https_certificate(&self) -> Result<Certificate, CoreError> {
        Ok(self.client().get_https_certificate().await?)
    }

    /// Replace the HTTPS certificate. The controller takes certificate and
    /// private key as one concatenated PEM string.
    pub async fn replace_https_certificate(
        &self,
        certificate_pem: &str,
        key_pem: &str,
    ) -> Result<(), CoreError> {
        require_pem("certificate", certificate_pem)?;
        require_pem("private key", key_pem)?;
        let bundle = format!("{certificate_pem}{key_pem}");
        self.client().replace_https_certificate(&bundle).await?;
        info!("HTTPS certificate replaced");
        Ok(())
    }

    pub async fn trusted_certificates(&self) -> Result<Vec<Certificate>, CoreError> {
        let links = self.client().list_trusted_certificate_links().await?;
        let mut certificates = Vec::with_capacity(links.len());
        for link in links {
            certificates.push(self.client().get_certificate(&link).await?);
        }
        Ok(certificates)
    }

    pub async fn add_trusted_certificate(&self, pem: &str) -> Result<(), CoreError> {
        require_pem("certificate", pem)?;
        self.client().add_trusted_certificate(pem).await?;
        info!("trusted certificate added");
        Ok(())
    }

    pub async fn delete_trusted_certificate(&self, id: &str) -> Result<(), CoreError> {
        if id.trim().is_empty() {
            return Err(CoreError::Format {
                message: "certificate ID must not be empty".into(),
            });
        }
        self.client().delete_trusted_certificate(id).await?;
        info!(id, "trusted certificate deleted");
        Ok(())
    }
}
