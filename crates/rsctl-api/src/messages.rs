// Redfish message registries
//
// Resolves `<Registry>.<x>.<y>.<z>.<MessageKey>` codes into human text using
// registry documents fetched from the controller, and pulls the error text
// out of `@Message.ExtendedInfo` blocks in failed response bodies.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

const REGISTRY_FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const EXTENDED_INFO_KEY: &str = "@Message.ExtendedInfo";

// ── Message identifiers ─────────────────────────────────────────────

/// A parsed compound message identifier, e.g. `Base.1.0.0.GeneralError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId {
    registry: String,
    key: String,
}

impl MessageId {
    /// Registry name including its version, e.g. `Base.1.0.0`.
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// Message key within the registry, e.g. `GeneralError`.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.registry, self.key)
    }
}

fn is_word(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_number(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}

impl FromStr for MessageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::Format {
            message: format!("invalid message ID: {s}"),
        };

        let segments: Vec<&str> = s.split('.').collect();
        let [name, major, minor, patch, key] = segments.as_slice() else {
            return Err(invalid());
        };
        if !is_word(name) || !is_word(key) {
            return Err(invalid());
        }
        if ![major, minor, patch].iter().all(|v| is_number(v)) {
            return Err(invalid());
        }

        Ok(Self {
            registry: format!("{name}.{major}.{minor}.{patch}"),
            key: (*key).to_owned(),
        })
    }
}

// ── Placeholder substitution ────────────────────────────────────────

/// Replace `%N` placeholders (1-indexed) with the matching argument.
///
/// Indices past the end of `args` (and `%0`) are left untouched.
pub fn substitute<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let digits = after
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after.len());

        let arg = after[..digits]
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| args.get(i));

        match arg {
            Some(arg) => out.push_str(arg.as_ref()),
            None => {
                out.push('%');
                out.push_str(&after[..digits]);
            }
        }
        rest = &after[digits..];
    }

    out.push_str(rest);
    out
}

// ── Error extraction ────────────────────────────────────────────────

/// Where a failed response may carry its extended info list.
type ExtractionStrategy = fn(&Value) -> Option<&Vec<Value>>;

fn nested_under_error(body: &Value) -> Option<&Vec<Value>> {
    body.get("error")?.get(EXTENDED_INFO_KEY)?.as_array()
}

fn top_level(body: &Value) -> Option<&Vec<Value>> {
    body.get(EXTENDED_INFO_KEY)?.as_array()
}

/// Tried in order; the first non-empty list wins.
const EXTRACTION_STRATEGIES: &[ExtractionStrategy] = &[nested_under_error, top_level];

/// Extract the resolved error message from a response body.
///
/// Returns `None` ("no message") when no strategy finds a non-empty
/// extended-info list or its first entry has no `Message`.
pub fn extract_error_message(body: &Value) -> Option<String> {
    let first = EXTRACTION_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(body).filter(|list| !list.is_empty()))?
        .first()?;

    let template = first.get("Message")?.as_str()?;
    let args: Vec<String> = first
        .get("MessageArgs")
        .and_then(Value::as_array)
        .map(|args| args.iter().map(arg_to_string).collect())
        .unwrap_or_default();

    Some(substitute(template, &args))
}

fn arg_to_string(arg: &Value) -> String {
    match arg {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Registry documents ──────────────────────────────────────────────

/// A published message registry (`/registries/en/<Registry>.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryDocument {
    #[serde(default, rename = "Id")]
    pub id: Option<String>,
    #[serde(default, rename = "RegistryVersion")]
    pub version: Option<String>,
    #[serde(default, rename = "Messages")]
    pub messages: HashMap<String, MessageTemplate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageTemplate {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(default, rename = "NumberOfArgs")]
    pub number_of_args: Option<u32>,
    #[serde(default, rename = "Severity")]
    pub severity: Option<String>,
    #[serde(default, rename = "Resolution")]
    pub resolution: Option<String>,
}

// ── Resolver ────────────────────────────────────────────────────────

/// Message registry resolver with an explicit, append-only cache.
///
/// Registries are versioned and immutable once published, so the cache is
/// keyed by registry name only and never invalidated. Construct once per
/// process and share (behind `Arc`) with whatever needs resolution.
pub struct MessageRegistry {
    http: reqwest::Client,
    cache: RwLock<HashMap<String, Arc<RegistryDocument>>>,
}

impl MessageRegistry {
    /// Build a resolver using the given transport's TLS policy.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport
            .with_timeout(REGISTRY_FETCH_TIMEOUT)
            .build_client()?;
        Ok(Self::with_client(http))
    }

    /// Build a resolver around an existing HTTP client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Number of registries currently cached.
    pub fn cached_registries(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Resolve a compound message identifier into text.
    ///
    /// Fetches the registry from `base_url` on first use; later calls for
    /// the same registry are served from the cache.
    pub async fn resolve<S: AsRef<str>>(
        &self,
        base_url: &Url,
        message_id: &str,
        args: &[S],
    ) -> Result<String, Error> {
        let id: MessageId = message_id.parse()?;
        let registry = self.registry(base_url, id.registry()).await?;

        let template = registry.messages.get(id.key()).ok_or_else(|| Error::Format {
            message: format!(
                "message ID {} not found in registry {}",
                id.key(),
                id.registry()
            ),
        })?;

        Ok(substitute(&template.message, args))
    }

    async fn registry(&self, base_url: &Url, name: &str) -> Result<Arc<RegistryDocument>, Error> {
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned();
        if let Some(doc) = cached {
            trace!(registry = name, "registry cache hit");
            return Ok(doc);
        }

        let url = base_url.join(&format!("/registries/en/{name}.json"))?;
        debug!(registry = name, %url, "fetching message registry");

        let doc: RegistryDocument = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let doc = Arc::new(doc);

        // Re-fetches store identical content, so last writer wins harmlessly.
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), Arc::clone(&doc));

        Ok(doc)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_versioned_identifier() {
        let id: MessageId = "Base.1.0.0.GeneralError".parse().unwrap();
        assert_eq!(id.registry(), "Base.1.0.0");
        assert_eq!(id.key(), "GeneralError");
        assert_eq!(id.to_string(), "Base.1.0.0.GeneralError");
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for bad in [
            "",
            "GeneralError",
            "Base.GeneralError",
            "Base.1.0.GeneralError",
            "Base.1.x.0.GeneralError",
            "Base.1.0.0.",
            "Base.1.0.0.General-Error",
            "Base.1.0.0.General.Error",
        ] {
            assert!(
                matches!(bad.parse::<MessageId>(), Err(Error::Format { .. })),
                "expected FormatError for {bad:?}"
            );
        }
    }

    #[test]
    fn substitutes_all_placeholders() {
        let out = substitute("%1 of %2 in %3", &["a", "b", "c"]);
        assert_eq!(out, "a of b in c");
        assert!(!out.contains('%'));
    }

    #[test]
    fn leaves_unmatched_placeholders() {
        assert_eq!(substitute("Error %1 at %2", &["X"]), "Error X at %2");
        assert_eq!(substitute("100% done", &["X"]), "100% done");
        assert_eq!(substitute("%0 and %1", &["X"]), "%0 and X");
    }

    #[test]
    fn multi_digit_placeholders_are_not_split() {
        let args: Vec<String> = (1..=10).map(|i| format!("a{i}")).collect();
        assert_eq!(substitute("%10/%1", &args), "a10/a1");
        assert_eq!(substitute("%11", &args), "%11");
    }

    #[test]
    fn extracts_nested_error_message() {
        let body = json!({
            "error": {
                "@Message.ExtendedInfo": [
                    {"Message": "Error %1 occurred.", "MessageArgs": ["123"]}
                ]
            }
        });
        assert_eq!(
            extract_error_message(&body).as_deref(),
            Some("Error 123 occurred.")
        );
    }

    #[test]
    fn extracts_top_level_message() {
        let body = json!({
            "@Message.ExtendedInfo": [
                {"MessageArgs": ["123"], "Message": "Error %1 occurred."}
            ]
        });
        assert_eq!(
            extract_error_message(&body).as_deref(),
            Some("Error 123 occurred.")
        );
    }

    #[test]
    fn missing_or_empty_info_is_no_message() {
        assert_eq!(extract_error_message(&Value::Null), None);
        assert_eq!(extract_error_message(&json!({"key": "value"})), None);
        assert_eq!(
            extract_error_message(&json!({"error": {"@Message.ExtendedInfo": []}})),
            None
        );
        assert_eq!(
            extract_error_message(&json!({"@Message.ExtendedInfo": [{"MessageId": "x"}]})),
            None
        );
    }

    #[test]
    fn non_string_args_are_rendered() {
        let body = json!({
            "@Message.ExtendedInfo": [{"Message": "Value %1 too big", "MessageArgs": [42]}]
        });
        assert_eq!(
            extract_error_message(&body).as_deref(),
            Some("Value 42 too big")
        );
    }
}
