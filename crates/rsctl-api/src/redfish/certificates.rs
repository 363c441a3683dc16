// Certificate endpoints
//
// The HTTPS server certificate (replaced through CertificateService) and
// the trusted-certificate collection under the manager.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::redfish::client::RedfishClient;
use crate::redfish::models::{Certificate, CertificateLocations};
use crate::redfish::response::RedfishResponse;

pub const HTTPS_CERTIFICATE_PATH: &str =
    "/redfish/v1/Managers/1/NetworkProtocol/HTTPS/Certificates/1";
const REPLACE_CERTIFICATE_PATH: &str =
    "/redfish/v1/CertificateService/Actions/CertificateService.ReplaceCertificate";
const CERTIFICATE_LOCATIONS_PATH: &str = "/redfish/v1/CertificateService/CertificateLocations";
pub const TRUSTED_CERTIFICATES_PATH: &str = "/redfish/v1/Managers/1/TrustedCertificates";
const PEM: &str = "PEM";

impl RedfishClient {
    /// `GET .../NetworkProtocol/HTTPS/Certificates/1`
    pub async fn get_https_certificate(&self) -> Result<Certificate, Error> {
        debug!("fetching HTTPS certificate");
        self.get_json(HTTPS_CERTIFICATE_PATH).await
    }

    /// Replace the HTTPS certificate with a PEM bundle (certificate + key).
    pub async fn replace_https_certificate(
        &self,
        pem_bundle: &str,
    ) -> Result<RedfishResponse, Error> {
        debug!(bytes = pem_bundle.len(), "replacing HTTPS certificate");
        self.post(
            REPLACE_CERTIFICATE_PATH,
            &json!({
                "CertificateUri": { "@odata.id": HTTPS_CERTIFICATE_PATH },
                "CertificateString": pem_bundle,
                "CertificateType": PEM,
            }),
        )
        .await
    }

    /// Certificate paths from `CertificateLocations` that live in the
    /// trusted-certificate collection.
    pub async fn list_trusted_certificate_links(&self) -> Result<Vec<String>, Error> {
        debug!("listing trusted certificates");
        let locations: CertificateLocations = self.get_json(CERTIFICATE_LOCATIONS_PATH).await?;
        Ok(locations
            .links
            .certificates
            .into_iter()
            .map(|link| link.odata_id)
            .filter(|path| path.contains("TrustedCertificates"))
            .collect())
    }

    /// GET one certificate by path.
    pub async fn get_certificate(&self, path: &str) -> Result<Certificate, Error> {
        self.get_json(path).await
    }

    /// `POST /redfish/v1/Managers/1/TrustedCertificates`
    pub async fn add_trusted_certificate(&self, pem: &str) -> Result<RedfishResponse, Error> {
        debug!(bytes = pem.len(), "adding trusted certificate");
        self.post(
            TRUSTED_CERTIFICATES_PATH,
            &json!({
                "CertificateString": pem,
                "CertificateType": PEM,
            }),
        )
        .await
    }

    /// `DELETE /redfish/v1/Managers/1/TrustedCertificates/{id}`
    pub async fn delete_trusted_certificate(&self, id: &str) -> Result<(), Error> {
        let path = format!("{TRUSTED_CERTIFICATES_PATH}/{id}");
        debug!(path, "deleting trusted certificate");
        self.delete(&path).await?;
        Ok(())
    }
}
