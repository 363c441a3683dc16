// ── Core error types ──
//
// The six-way operator taxonomy. Wire detail from `rsctl_api::Error` is
// folded in by the `From` impl; the CLI only ever sees `CoreError`.

use thiserror::Error;

/// Which validator rule rejected a desired-state delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ValidationRule {
    DhcpTransition,
    StaticAddress,
    DnsSource,
    Proxy,
    ManualTime,
    Input,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed identifier or argument shape.
    #[error("Invalid format: {message}")]
    Format { message: String },

    /// Network failure outside a session (registry fetches).
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Bad credentials, or the session died mid-operation.
    ///
    /// When `session_lost` is set the request that saw the 401 may already
    /// have been applied.
    #[error("{message}")]
    Auth { message: String, session_lost: bool },

    /// Login retry budget exhausted.
    #[error("Failed to connect to the controller: {message}")]
    Connect { message: String },

    /// A verb call or monitored task ended outside 2xx.
    #[error("{context}: {message}")]
    Request {
        context: String,
        status: Option<u16>,
        message: String,
    },

    /// Rejected before any write was attempted.
    #[error("{message}")]
    Validation {
        rule: ValidationRule,
        message: String,
    },
}

impl CoreError {
    pub(crate) fn validation(rule: ValidationRule, message: impl Into<String>) -> Self {
        Self::Validation {
            rule,
            message: message.into(),
        }
    }

    pub(crate) fn request(
        context: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Request {
            context: context.into(),
            status,
            message: message.into(),
        }
    }

    pub(crate) fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
            session_lost: false,
        }
    }

    /// `true` for an `Auth` error raised by a 401 on a live session.
    pub fn is_session_lost(&self) -> bool {
        matches!(
            self,
            Self::Auth {
                session_lost: true,
                ..
            }
        )
    }

    /// Short machine-readable kind for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Format { .. } => "format",
            Self::Transport { .. } => "transport",
            Self::Auth { .. } => "auth",
            Self::Connect { .. } => "connect",
            Self::Request { .. } => "request",
            Self::Validation { .. } => "validation",
        }
    }
}

// ── Conversion from wire-level errors ───────────────────────────────

impl From<rsctl_api::Error> for CoreError {
    fn from(err: rsctl_api::Error) -> Self {
        use rsctl_api::Error as Api;

        match err {
            Api::Format { message } => Self::Format { message },
            Api::InvalidUrl(e) => Self::Format {
                message: format!("invalid URL: {e}"),
            },
            Api::Transport(e) => Self::Transport {
                message: e.to_string(),
            },
            Api::Tls(message) => Self::Connect { message },
            Api::Authentication { message } => Self::auth(message),
            e @ Api::SessionExpired { .. } => Self::Auth {
                message: e.to_string(),
                session_lost: true,
            },
            Api::Connect {
                url,
                attempts,
                reason,
            } => Self::Connect {
                message: format!("{url} unreachable after {attempts} attempt(s): {reason}"),
            },
            Api::Request {
                verb,
                path,
                status,
                message,
            } => Self::request(format!("{verb} failed for {path}"), Some(status), message),
            Api::Deserialization { message, .. } => {
                Self::request("Unexpected response body", None, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_keep_verb_and_path() {
        let err = CoreError::from(rsctl_api::Error::Request {
            verb: "PATCH".into(),
            path: "/redfish/v1/Managers/1".into(),
            status: 400,
            message: "Bad value".into(),
        });
        assert_eq!(
            err.to_string(),
            "PATCH failed for /redfish/v1/Managers/1: Bad value"
        );
        assert_eq!(err.kind(), "request");
    }

    #[test]
    fn session_expiry_is_flagged() {
        let err = CoreError::from(rsctl_api::Error::SessionExpired {
            verb: "PATCH".into(),
            path: "/redfish/v1/AccountService/Accounts/1".into(),
        });
        assert!(err.is_session_lost());
        assert!(!CoreError::auth("Login failed: nope").is_session_lost());
    }

    #[test]
    fn validation_rule_names() {
        assert_eq!(ValidationRule::DhcpTransition.to_string(), "dhcp-transition");
        assert_eq!(ValidationRule::ManualTime.to_string(), "manual-time");
    }
}
