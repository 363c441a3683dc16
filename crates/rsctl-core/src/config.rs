// ── Runtime connection configuration ──
//
// Describes *how* to reach one management controller. Built by the CLI
// from profile + flags; core never reads config files.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use rsctl_api::transport::{TlsMode, TransportConfig};
use rsctl_api::Credentials;
use rsctl_api::task::DEFAULT_POLL_INTERVAL;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Controllers ship self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for one controller connection.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller base URL (e.g. `https://10.0.0.5`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Login attempts before giving up.
    pub max_retry: u32,
    /// Task poll interval when the controller sends no `Retry-After`.
    pub poll_interval: Duration,
}

impl ControllerConfig {
    /// Defaults for everything but address and credentials.
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            max_retry: rsctl_api::redfish::DEFAULT_MAX_RETRY,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Same controller, different password.
    pub fn with_password(&self, password: SecretString) -> Self {
        Self {
            password,
            ..self.clone()
        }
    }

    pub(crate) fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
