//! Profile + flag resolution into `rsctl_core::ControllerConfig`.
//!
//! Precedence for every setting: CLI flag (or its `RSCTL_*` env var) >
//! profile > `[defaults]`. Core never sees the TOML types.

use std::io::IsTerminal;
use std::time::Duration;

use secrecy::SecretString;

use rsctl_config::{Config, Profile};
use rsctl_core::{ControllerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a `ControllerConfig` from the config file, profile, and CLI overrides.
pub fn build_controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let cfg = rsctl_config::load_config()?;
    resolve(global, &cfg)
}

pub(crate) fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<ControllerConfig, CliError> {
    let selected = cfg.select_profile(global.profile.as_deref())?;
    let (profile_name, profile) = match selected {
        Some((name, profile)) => (name, Some(profile)),
        None => ("default", None),
    };

    // 1. Controller URL (flag > env > profile)
    let address = global
        .address
        .as_deref()
        .or_else(|| profile.map(|p| p.address.as_str()))
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| CliError::NoAddress {
            path: rsctl_config::config_path().display().to_string(),
        })?;
    let url = rsctl_config::controller_url(address)?;

    // 2. Credentials
    let username = global
        .username
        .clone()
        .or_else(|| profile.and_then(|p| p.username.clone()))
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let password = match global
        .password
        .clone()
        .or_else(|| profile.and_then(|p| p.password.clone()))
    {
        Some(pw) => SecretString::from(pw),
        None => prompt_password(profile_name)?,
    };

    // 3. TLS verification
    let tls = tls_policy(global, profile, cfg);

    let mut config = ControllerConfig::new(url, username, password);
    config.tls = tls;
    config.timeout = Duration::from_secs(
        global
            .timeout
            .or_else(|| profile.and_then(|p| p.timeout))
            .unwrap_or(cfg.defaults.timeout),
    );
    config.max_retry = global
        .max_retry
        .or_else(|| profile.and_then(|p| p.max_retry))
        .unwrap_or(cfg.defaults.max_retry);
    Ok(config)
}

fn tls_policy(global: &GlobalOpts, profile: Option<&Profile>, cfg: &Config) -> TlsVerification {
    if global.insecure {
        return TlsVerification::DangerAcceptInvalid;
    }
    if let Some(ca) = &global.ca_cert {
        return TlsVerification::CustomCa(ca.clone());
    }
    let insecure = profile
        .and_then(|p| p.insecure)
        .or(cfg.defaults.insecure.then_some(true));
    rsctl_config::tls_for(insecure, profile.and_then(|p| p.ca_cert.as_deref()))
}

fn prompt_password(profile_name: &str) -> Result<SecretString, CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NoCredentials {
            profile: profile_name.into(),
        });
    }
    rpassword::prompt_password("Password: ")
        .map(SecretString::from)
        .map_err(|e| CliError::Prompt {
            message: e.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["rsctl"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "path"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_lab() -> Config {
        let mut cfg = Config::default();
        cfg.default_profile = Some("lab".into());
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                address: "10.0.0.5".into(),
                username: Some("admin".into()),
                password: Some("hunter2".into()),
                timeout: Some(10),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn flags_override_profile() {
        let opts = global(&["-a", "10.0.0.9", "-u", "ops", "-p", "pw", "--timeout", "5"]);
        let config = resolve(&opts, &config_with_lab()).unwrap();
        assert_eq!(config.url.as_str(), "https://10.0.0.9/");
        assert_eq!(config.username, "ops");
        assert_eq!(config.password.expose_secret(), "pw");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn profile_fills_missing_flags() {
        let opts = global(&[]);
        let config = resolve(&opts, &config_with_lab()).unwrap();
        assert_eq!(config.url.as_str(), "https://10.0.0.5/");
        assert_eq!(config.username, "admin");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn missing_address_is_reported() {
        let opts = global(&["-u", "admin", "-p", "pw"]);
        let err = resolve(&opts, &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoAddress { .. }));
    }

    #[test]
    fn ca_flag_selects_custom_ca() {
        let opts = global(&["--ca-cert", "/etc/ca.pem"]);
        let config = resolve(&opts, &config_with_lab()).unwrap();
        assert_eq!(
            config.tls,
            TlsVerification::CustomCa("/etc/ca.pem".into())
        );
    }
}
