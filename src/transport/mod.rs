//! Transport layer: how requests reach the cluster.
//!
//! Two implementations sit behind [`SearchTransport`]:
//!
//! ```text
//! OpenSearchConfig.use_cookies
//!   ├── false → ClientTransport  (opensearch crate, basic / cert auth)
//!   └── true  → SessionTransport (reqwest, Cookie + extra headers)
//! ```
//!
//! Both issue exactly one HTTP call per operation and hand back the raw
//! JSON body; shaping happens in [`crate::models`].

pub mod client;
pub mod session;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::{OpenSearchConfig, TransportKind};
use crate::error::SearchError;

pub use client::ClientTransport;
pub use session::SessionTransport;

/// Raw OpenSearch operations used by the service layer.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Returns which transport this is.
    fn kind(&self) -> TransportKind;

    /// `POST /{index}/_search?size={size}` with `body`.
    async fn search(&self, index: &str, body: &Value, size: u32) -> Result<Value, SearchError>;

    /// `GET /{index}/_doc/{id}`. Returns `None` when the document is absent.
    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>, SearchError>;

    /// `GET /_cat/indices?format=json&v=true`.
    async fn cat_indices(&self) -> Result<Value, SearchError>;

    /// `GET /_cluster/health`.
    async fn cluster_health(&self) -> Result<Value, SearchError>;

    /// `GET /{index}/_mapping`.
    async fn get_mapping(&self, index: &str) -> Result<Value, SearchError>;
}

/// Creates the transport selected by `config`.
///
/// # Errors
///
/// Returns an error if headers, certificates or the base URL are invalid.
pub fn create_transport(
    config: &OpenSearchConfig,
) -> crate::error::Result<Box<dyn SearchTransport>> {
    match config.transport_kind() {
        TransportKind::Client => Ok(Box::new(ClientTransport::new(config)?)),
        TransportKind::Session => Ok(Box::new(SessionTransport::new(config)?)),
    }
}

/// Decodes a response body, turning non-success statuses into
/// [`SearchError::Status`].
pub(crate) fn decode_body(status: u16, text: &str) -> Result<Value, SearchError> {
    if (200..300).contains(&status) {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(text)?);
    }
    Err(status_error(status, text))
}

/// Builds a [`SearchError::Status`] with the reason from the JSON `error`
/// field, or the status text when the body has none.
pub(crate) fn status_error(status: u16, text: &str) -> SearchError {
    let reason = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|body| error_reason(&body))
        .or_else(|| {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {status}"));
    SearchError::Status { status, reason }
}

/// Extracts `error.reason`, `error.root_cause[0].reason` or a string `error`.
fn error_reason(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    if let Some(s) = error.as_str() {
        return Some(s.to_string());
    }
    error
        .get("reason")
        .or_else(|| error.pointer("/root_cause/0/reason"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Interprets a `GET _doc` response: a 404 with `found: false` is an
/// absent document, any other 404 (missing index) is an error.
pub(crate) fn decode_document(status: u16, text: &str) -> Result<Option<Value>, SearchError> {
    if status == 404 {
        let body: Option<Value> = serde_json::from_str(text).ok();
        let found = body
            .as_ref()
            .and_then(|b| b.get("found"))
            .and_then(Value::as_bool);
        if found == Some(false) {
            return Ok(None);
        }
        return Err(status_error(status, text));
    }
    let body = decode_body(status, text)?;
    if body.get("found").and_then(Value::as_bool) == Some(false) {
        return Ok(None);
    }
    Ok(Some(body))
}
