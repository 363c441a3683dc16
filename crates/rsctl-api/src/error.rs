use thiserror::Error;

/// Advisory attached to every session loss observed after a request was sent.
pub const SESSION_LOST_ADVISORY: &str =
    "the request may already have taken effect on the controller \
     before the session was lost; verify the result before retrying";

/// Top-level error type for the `rsctl-api` crate.
///
/// Covers every failure mode of the wire layer: identifier parsing,
/// transport, authentication, connection budget, and decoded HTTP errors.
/// `rsctl-core` folds these into its six-way operator taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Format ──────────────────────────────────────────────────────
    /// Malformed identifier or argument shape (caller bug, never retried).
    #[error("Invalid format: {message}")]
    Format { message: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected or request sent without a valid session.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A request got HTTP 401 while the session was authenticated.
    #[error("Session lost during {verb} {path}: {SESSION_LOST_ADVISORY}")]
    SessionExpired { verb: String, path: String },

    /// Login could not reach the controller within the retry budget.
    #[error("Failed to connect to {url} after {attempts} attempt(s): {reason}")]
    Connect {
        url: String,
        attempts: u32,
        reason: String,
    },

    // ── Request ─────────────────────────────────────────────────────
    /// Any non-2xx response, with the resolved human message.
    #[error("{verb} failed for {path}: {message}")]
    Request {
        verb: String,
        path: String,
        status: u16,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the session died underneath a request.
    pub fn is_session_lost(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
