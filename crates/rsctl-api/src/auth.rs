use secrecy::SecretString;

/// Username/password pair for Redfish session login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Authentication state of a single Redfish session.
///
/// `Unauthenticated -> Authenticated -> (Unauthenticated | Expired)`.
/// Only a successful login enters `Authenticated`; logout returns to
/// `Unauthenticated`; a 401 on an authenticated request moves to `Expired`.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(SessionToken),
    Expired,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Short label for logs and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated(_) => "authenticated",
            Self::Expired => "expired",
        }
    }
}

/// Token and session resource handed out by `SessionService`.
#[derive(Debug, Clone)]
pub struct SessionToken {
    /// Value for the `X-Auth-Token` header.
    pub token: SecretString,
    /// Session resource path (`Location` of the login reply), deleted on logout.
    pub location: Option<String>,
}
