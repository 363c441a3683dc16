//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use rsctl_config::ConfigError;
use rsctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(rsctl::connection_failed),
        help(
            "Check that the controller is reachable on HTTPS.\n\
             Raise the retry budget with --max-retry, or use --insecure (-k)\n\
             if the controller presents a self-signed certificate."
        )
    )]
    ConnectionFailed { message: String },

    #[error("Transport error: {message}")]
    #[diagnostic(code(rsctl::transport))]
    Transport { message: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(rsctl::auth_failed),
        help("Verify the user name and password (--username / --password or your profile).")
    )]
    AuthFailed { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(rsctl::session_lost),
        help(
            "The controller may have applied the change before the session ended.\n\
             Check the current state before retrying."
        )
    )]
    SessionLost { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(rsctl::no_credentials),
        help("Pass --username and --password, or set RSCTL_USERNAME and RSCTL_PASSWORD.")
    )]
    NoCredentials { profile: String },

    #[error("No controller address configured")]
    #[diagnostic(
        code(rsctl::no_address),
        help(
            "Pass --address (-a), set RSCTL_ADDRESS, or add a profile to\n\
             {path}"
        )
    )]
    NoAddress { path: String },

    // ── Controller replies ───────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(rsctl::request_failed))]
    RequestFailed { message: String, status: Option<u16> },

    #[error("{message}")]
    #[diagnostic(code(rsctl::rejected_settings), help("Rule: {rule}"))]
    RejectedSettings { rule: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid format: {message}")]
    #[diagnostic(code(rsctl::format))]
    Format { message: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(rsctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(rsctl::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Prompt failed: {message}")]
    #[diagnostic(
        code(rsctl::prompt),
        help("Use --yes (-y) and pass secrets as flags in non-interactive contexts.")
    )]
    Prompt { message: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error("Failed to read {}", path.display())]
    #[diagnostic(code(rsctl::read_file))]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Transport { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::SessionLost { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::RequestFailed {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::RejectedSettings { .. }
            | Self::Format { .. }
            | Self::Validation { .. }
            | Self::NoAddress { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        tracing::debug!(kind = err.kind(), "operation failed");
        match err {
            CoreError::Format { message } => Self::Format { message },
            CoreError::Transport { message } => Self::Transport { message },
            CoreError::Auth {
                message,
                session_lost: true,
            } => Self::SessionLost { message },
            CoreError::Auth { message, .. } => Self::AuthFailed { message },
            CoreError::Connect { message } => Self::ConnectionFailed {
                message: format!("Failed to connect to the controller: {message}"),
            },
            CoreError::Request {
                context,
                status,
                message,
            } => Self::RequestFailed {
                message: format!("{context}: {message}"),
                status,
            },
            CoreError::Validation { rule, message } => Self::RejectedSettings {
                rule: rule.to_string(),
                message,
            },
        }
    }
}
