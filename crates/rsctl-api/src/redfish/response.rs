// Buffered outcome of one Redfish HTTP call.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, LOCATION, RETRY_AFTER};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;
use crate::messages;

/// Status, headers of interest, and raw body of a Redfish reply.
///
/// The body is read eagerly so the response can be inspected more than once
/// (error decoding, task monitoring, typed parsing).
#[derive(Debug, Clone)]
pub struct RedfishResponse {
    status: StatusCode,
    body: String,
    location: Option<String>,
    retry_after: Option<Duration>,
}

impl RedfishResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            location: None,
            retry_after: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    /// Consume a `reqwest::Response`, keeping the status, body and the
    /// `Location` / `Retry-After` headers.
    pub(crate) async fn read(resp: reqwest::Response) -> Result<Self, Error> {
        let status = resp.status();
        let (location, retry_after) = task_headers(resp.headers());
        let body = resp.text().await?;
        Ok(Self {
            status,
            body,
            location,
            retry_after,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// `Location` header (task monitor URI for 202 replies).
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// `Retry-After` hint in seconds, if the server sent one.
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// A task is still running while its monitor answers 202 Accepted.
    pub fn is_processing(&self) -> bool {
        self.status == StatusCode::ACCEPTED
    }

    /// Body parsed as loose JSON; `None` for empty or non-JSON bodies.
    pub fn json(&self) -> Option<Value> {
        if self.body.trim().is_empty() {
            return None;
        }
        serde_json::from_str(&self.body).ok()
    }

    /// Body parsed into a typed model.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.body).map_err(|e| {
            let preview: String = self.body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: self.body.clone(),
            }
        })
    }

    /// Human reason for a failed response; always `None` on 2xx.
    ///
    /// Uses the `@Message.ExtendedInfo` text when present, otherwise
    /// `HTTP error: <status>`.
    pub fn error_message(&self) -> Option<String> {
        if self.is_success() {
            return None;
        }
        Some(
            self.json()
                .as_ref()
                .and_then(messages::extract_error_message)
                .unwrap_or_else(|| format!("HTTP error: {}", self.status.as_u16())),
        )
    }
}

fn task_headers(headers: &HeaderMap) -> (Option<String>, Option<Duration>) {
    let location = headers
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let retry_after = headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs);
    (location, retry_after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_never_has_error_message() {
        let resp = RedfishResponse::new(
            StatusCode::OK,
            r#"{"error":{"@Message.ExtendedInfo":[{"Message":"x"}]}}"#,
        );
        assert_eq!(resp.error_message(), None);
    }

    #[test]
    fn failure_uses_extended_info() {
        let resp = RedfishResponse::new(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"@Message.ExtendedInfo":[{"Message":"Bad %1","MessageArgs":["value"]}]}}"#,
        );
        assert_eq!(resp.error_message().as_deref(), Some("Bad value"));
    }

    #[test]
    fn failure_without_body_falls_back_to_status() {
        let resp = RedfishResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(resp.error_message().as_deref(), Some("HTTP error: 500"));

        let resp = RedfishResponse::new(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(resp.error_message().as_deref(), Some("HTTP error: 502"));
    }

    #[test]
    fn accepted_is_processing() {
        assert!(RedfishResponse::new(StatusCode::ACCEPTED, "").is_processing());
        assert!(!RedfishResponse::new(StatusCode::OK, "").is_processing());
    }
}
