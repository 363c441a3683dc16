//! Shared configuration for rsctl.
//!
//! TOML profiles, layered loading (defaults, file, `RSCTL_*` environment),
//! address normalization and the TLS policy for a profile. The CLI layers
//! its flag overrides on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use rsctl_core::TlsVerification;

/// Environment prefix for every variable this tool reads.
pub const ENV_PREFIX: &str = "RSCTL_";

const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found in config")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Copy with every stored password masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for profile in copy.profiles.values_mut() {
            if profile.password.is_some() {
                profile.password = Some(REDACTED.into());
            }
        }
        copy
    }

    /// Pick the profile named on the command line, else the default one.
    ///
    /// An explicitly named profile must exist; a missing default profile
    /// just means "no profile".
    pub fn select_profile<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<Option<(&'a str, &'a Profile)>, ConfigError> {
        if let Some(name) = name {
            return self
                .profiles
                .get(name)
                .map(|p| Some((name, p)))
                .ok_or_else(|| ConfigError::UnknownProfile {
                    profile: name.into(),
                });
        }
        Ok(self
            .default_profile
            .as_deref()
            .and_then(|name| self.profiles.get(name).map(|p| (name, p))))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Login attempts before giving up.
    #[serde(default = "default_max_retry")]
    pub max_retry: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            max_retry: default_max_retry(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_max_retry() -> u32 {
    3
}

/// A named controller profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Controller host, IP, or full URL (e.g. "10.0.0.5").
    pub address: String,

    pub username: Option<String>,

    /// Password (plaintext; prefer `RSCTL_PASSWORD` or the prompt).
    pub password: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override the insecure TLS default.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override login retry budget.
    pub max_retry: Option<u32>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "rsctl", "rsctl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("rsctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// Nested keys come from the environment with a double underscore, e.g.
/// `RSCTL_DEFAULTS__TIMEOUT=60`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Render the config as TOML with passwords masked.
pub fn render_redacted(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(&cfg.redacted())?)
}

// ── Resolution ──────────────────────────────────────────────────────

/// Turn an operator-supplied address into the controller base URL.
///
/// A bare host or IP means HTTPS on the default port.
pub fn controller_url(address: &str) -> Result<Url, ConfigError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(ConfigError::Validation {
            field: "address".into(),
            reason: "must not be empty".into(),
        });
    }
    let candidate = if address.contains("://") {
        address.to_owned()
    } else {
        format!("https://{address}")
    };
    Url::parse(&candidate).map_err(|e| ConfigError::Validation {
        field: "address".into(),
        reason: format!("{address}: {e}"),
    })
}

/// TLS policy for a profile: explicit CA beats the insecure default.
pub fn tls_for(insecure: Option<bool>, ca_cert: Option<&Path>) -> TlsVerification {
    match (insecure, ca_cert) {
        (Some(true), _) => TlsVerification::DangerAcceptInvalid,
        (_, Some(path)) => TlsVerification::CustomCa(path.to_path_buf()),
        (Some(false), None) => TlsVerification::SystemDefaults,
        // Controllers ship self-signed certificates
        (None, None) => TlsVerification::DangerAcceptInvalid,
    }
}
