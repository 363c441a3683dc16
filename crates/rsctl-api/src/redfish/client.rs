// Redfish HTTP client
//
// Wraps `reqwest::Client` with session-token injection, the session state
// machine, and error decoding. Resource endpoints (manager, network, tasks,
// etc.) are implemented as inherent methods in sibling files to keep this
// module focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use reqwest::header::HeaderValue;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::{Credentials, SessionState};
use crate::error::Error;
use crate::redfish::response::RedfishResponse;
use crate::transport::{BULK_UPLOAD_TIMEOUT, TransportConfig};

pub(crate) const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Default number of login attempts before giving up with `Error::Connect`.
pub const DEFAULT_MAX_RETRY: u32 = 3;

/// Authenticated HTTP client for one Redfish session.
///
/// Holds the session state machine; one client serves one logical
/// sequence of operations. Independent operations against the same
/// controller should each build their own client (and log in).
pub struct RedfishClient {
    http: reqwest::Client,
    /// Same TLS policy as `http`, extended timeout for bulk uploads.
    bulk_http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    max_retry: u32,
    state: RwLock<SessionState>,
}

impl RedfishClient {
    /// Create a client from a `TransportConfig`. Does not log in.
    ///
    /// `base_url` is the controller root (e.g. `https://10.0.0.5`).
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
        max_retry: u32,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let bulk_http = transport
            .with_timeout(BULK_UPLOAD_TIMEOUT)
            .build_client()?;
        Ok(Self {
            http,
            bulk_http,
            base_url,
            credentials,
            max_retry,
            state: RwLock::new(SessionState::Unauthenticated),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The same client is used for bulk uploads.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        Self {
            bulk_http: http.clone(),
            http,
            base_url,
            credentials,
            max_retry: DEFAULT_MAX_RETRY,
            state: RwLock::new(SessionState::Unauthenticated),
        }
    }

    /// Override the login retry budget.
    pub fn with_max_retry(mut self, max_retry: u32) -> Self {
        self.max_retry = max_retry;
        self
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Credentials this client logs in with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn max_retry(&self) -> u32 {
        self.max_retry.max(1)
    }

    // ── Session state ────────────────────────────────────────────────

    /// Snapshot of the current session state.
    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated()
    }

    pub(crate) fn set_state(&self, state: SessionState) {
        debug!(state = state.label(), "session state change");
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Move an authenticated session to `Expired`.
    ///
    /// Returns `true` if the session was authenticated before the call.
    fn expire(&self) -> bool {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if guard.is_authenticated() {
            warn!("session expired (HTTP 401)");
            *guard = SessionState::Expired;
            true
        } else {
            false
        }
    }

    /// Attach the session token, if any.
    fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder, Error> {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        match &*guard {
            SessionState::Authenticated(session) => {
                let mut value = HeaderValue::from_str(session.token.expose_secret()).map_err(
                    |e| Error::Authentication {
                        message: format!("invalid session token: {e}"),
                    },
                )?;
                value.set_sensitive(true);
                Ok(builder.header(AUTH_TOKEN_HEADER, value))
            }
            SessionState::Unauthenticated | SessionState::Expired => Ok(builder),
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Resolve a resource path (or absolute URI) against the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Raw requests ─────────────────────────────────────────────────

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<RedfishResponse, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = self.authorize(builder)?.send().await?;
        let resp = RedfishResponse::read(resp).await?;
        trace!(status = resp.status().as_u16(), "response received");
        Ok(resp)
    }

    /// GET without error decoding.
    ///
    /// Used by the task monitor, which must observe failed terminal states
    /// as outcomes. The `*_raw` variants below share this contract: a 401
    /// still expires the session.
    pub async fn fetch(&self, path: &str) -> Result<RedfishResponse, Error> {
        let resp = self.send::<()>(Method::GET, path, None).await?;
        Ok(self.observe(resp))
    }

    /// PATCH without error decoding, for changes whose outcome is monitored.
    pub async fn patch_raw<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<RedfishResponse, Error> {
        let resp = self.send(Method::PATCH, path, Some(body)).await?;
        Ok(self.observe(resp))
    }

    /// POST without error decoding, for actions whose outcome is monitored.
    pub async fn post_raw<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<RedfishResponse, Error> {
        let resp = self.send(Method::POST, path, Some(body)).await?;
        Ok(self.observe(resp))
    }

    /// Expire the session on a 401, pass everything through.
    fn observe(&self, resp: RedfishResponse) -> RedfishResponse {
        if resp.status() == StatusCode::UNAUTHORIZED {
            self.expire();
        }
        resp
    }

    async fn send_multipart(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<RedfishResponse, Error> {
        let url = self.url(path)?;
        debug!(file_name, bytes = contents.len(), "POST (multipart) {url}");

        let part = Part::bytes(contents)
            .file_name(file_name.to_owned())
            .mime_str("application/octet-stream")?;
        let form = Form::new().part(field.to_owned(), part);

        let builder = self.bulk_http.post(url).multipart(form);
        let resp = self.authorize(builder)?.send().await?;
        RedfishResponse::read(resp).await
    }

    /// Raw authenticated multipart POST with the bulk-upload timeout.
    ///
    /// Returns the outcome without error decoding (a 401 still expires
    /// the session). The body is sent as `multipart/form-data`.
    pub async fn post_multipart_raw(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<RedfishResponse, Error> {
        let resp = self.send_multipart(path, field, file_name, contents).await?;
        Ok(self.observe(resp))
    }

    // ── Decoded verbs ────────────────────────────────────────────────

    /// GET a resource; non-2xx becomes an error.
    pub async fn get(&self, path: &str) -> Result<RedfishResponse, Error> {
        let resp = self.send::<()>(Method::GET, path, None).await?;
        self.check(&Method::GET, path, resp)
    }

    /// GET a resource and parse it into a typed model.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.get(path).await?.parse()
    }

    /// PATCH a resource with a JSON body.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<RedfishResponse, Error> {
        let resp = self.send(Method::PATCH, path, Some(body)).await?;
        self.check(&Method::PATCH, path, resp)
    }

    /// POST a JSON body (actions, collection inserts).
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<RedfishResponse, Error> {
        let resp = self.send(Method::POST, path, Some(body)).await?;
        self.check(&Method::POST, path, resp)
    }

    /// DELETE a resource.
    pub async fn delete(&self, path: &str) -> Result<RedfishResponse, Error> {
        let resp = self.send::<()>(Method::DELETE, path, None).await?;
        self.check(&Method::DELETE, path, resp)
    }

    /// Bulk-upload POST: the raw multipart primitive plus POST error decoding.
    pub async fn upload(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<RedfishResponse, Error> {
        let resp = self.send_multipart(path, field, file_name, contents).await?;
        self.check(&Method::POST, path, resp)
    }

    /// Turn a non-2xx outcome into a typed error.
    fn check(
        &self,
        verb: &Method,
        path: &str,
        resp: RedfishResponse,
    ) -> Result<RedfishResponse, Error> {
        if resp.is_success() {
            return Ok(resp);
        }

        let message = resp
            .error_message()
            .unwrap_or_else(|| format!("HTTP error: {}", resp.status().as_u16()));

        if resp.status() == StatusCode::UNAUTHORIZED {
            if self.expire() {
                return Err(Error::SessionExpired {
                    verb: verb.to_string(),
                    path: path.to_owned(),
                });
            }
            return Err(Error::Authentication { message });
        }

        Err(Error::Request {
            verb: verb.to_string(),
            path: path.to_owned(),
            status: resp.status().as_u16(),
            message,
        })
    }
}

impl std::fmt::Debug for RedfishClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedfishClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.credentials.username)
            .field("state", &self.state().label())
            .finish_non_exhaustive()
    }
}
