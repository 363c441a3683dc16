// Shared transport configuration for building reqwest::Client instances.
//
// The session client, the bulk-upload path and the message registry all
// build their HTTP clients here so TLS and timeout policy stay in one place.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// Timeout applied to bulk (multipart firmware) uploads.
pub const BULK_UPLOAD_TIMEOUT: Duration = Duration::from_secs(3600);

const USER_AGENT: &str = concat!("rsctl/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (management controllers ship self-signed).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Same TLS policy, different timeout.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            tls: self.tls.clone(),
            timeout,
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
