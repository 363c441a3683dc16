// Session login / logout
//
// Redfish session auth: POST credentials to the SessionService collection,
// keep the `X-Auth-Token` reply header for subsequent requests, and DELETE
// the session resource (`Location`) on logout.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::auth::{SessionState, SessionToken};
use crate::error::Error;
use crate::redfish::client::{AUTH_TOKEN_HEADER, RedfishClient};
use crate::redfish::response::RedfishResponse;

const SESSIONS_PATH: &str = "/redfish/v1/SessionService/Sessions";
const LOGIN_RETRY_DELAY: Duration = Duration::from_millis(500);

impl RedfishClient {
    /// Open a session with the configured credentials.
    ///
    /// Connection failures are retried up to the retry budget; a non-2xx
    /// reply fails immediately with `Error::Authentication`.
    pub async fn login(&self) -> Result<(), Error> {
        let url = self.url(SESSIONS_PATH)?;
        let credentials = self.credentials();
        let body = json!({
            "UserName": credentials.username,
            "Password": credentials.password.expose_secret(),
        });

        let budget = self.max_retry();
        let mut attempt = 0;
        let resp = loop {
            attempt += 1;
            debug!(attempt, budget, "POST {url}");
            let err = match self.http().post(url.clone()).json(&body).send().await {
                Ok(resp) => break resp,
                Err(e) => Error::Transport(e),
            };
            if !err.is_transient() {
                return Err(err);
            }
            if attempt >= budget {
                return Err(Error::Connect {
                    url: self.base_url().to_string(),
                    attempts: attempt,
                    reason: err.to_string(),
                });
            }
            warn!(attempt, error = %err, "login attempt failed, retrying");
            tokio::time::sleep(LOGIN_RETRY_DELAY).await;
        };

        let token = resp
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let resp = RedfishResponse::read(resp).await?;

        if !resp.is_success() {
            return Err(Error::Authentication {
                message: format!("Login failed: {}", login_failure_reason(&resp)),
            });
        }

        let token = token.ok_or_else(|| Error::Authentication {
            message: "Login failed: response carried no X-Auth-Token header".into(),
        })?;

        self.set_state(SessionState::Authenticated(SessionToken {
            token: SecretString::from(token),
            location: resp.location().map(String::from),
        }));
        info!(username = %credentials.username, "logged in");
        Ok(())
    }

    /// Close the session. A no-op when not authenticated.
    ///
    /// The session returns to `Unauthenticated` even if the controller
    /// refuses the DELETE; the refusal is only logged.
    pub async fn logout(&self) -> Result<(), Error> {
        let location = match self.state() {
            SessionState::Authenticated(session) => session.location,
            SessionState::Unauthenticated | SessionState::Expired => {
                debug!("logout skipped: no active session");
                return Ok(());
            }
        };

        let result = match location.as_deref() {
            Some(location) => self.delete(location).await.map(|_| ()),
            None => {
                warn!("session has no resource location; dropping token locally");
                Ok(())
            }
        };
        self.set_state(SessionState::Unauthenticated);

        match result {
            Ok(()) => {
                info!("logged out");
                Ok(())
            }
            Err(Error::Transport(e)) => Err(Error::Transport(e)),
            Err(e) => {
                warn!(error = %e, "session delete refused");
                Ok(())
            }
        }
    }
}

/// Resolved message, else raw body, else status line.
fn login_failure_reason(resp: &RedfishResponse) -> String {
    if let Some(message) = resp
        .json()
        .as_ref()
        .and_then(crate::messages::extract_error_message)
    {
        return message;
    }
    let body = resp.body().trim();
    if body.is_empty() {
        format!("HTTP error: {}", resp.status().as_u16())
    } else {
        body.to_owned()
    }
}
