//! Query DSL translation.
//!
//! Turns the typed parameters of each search tool into the request body
//! sent to `/{index}/_search`. Caller-provided DSL is forwarded verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::SearchError;

/// Bounds of a `range` query. Values are forwarded unchanged, so numbers,
/// strings and date math (`"now-1d/d"`) all work; `null` counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBounds {
    /// Greater than or equal to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<Value>,
    /// Less than or equal to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<Value>,
    /// Strictly greater than.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<Value>,
    /// Strictly less than.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<Value>,
}

impl RangeBounds {
    /// Sets the `gte` bound.
    #[must_use]
    pub fn gte(mut self, value: impl Into<Value>) -> Self {
        self.gte = Some(value.into());
        self
    }

    /// Sets the `lte` bound.
    #[must_use]
    pub fn lte(mut self, value: impl Into<Value>) -> Self {
        self.lte = Some(value.into());
        self
    }

    /// Sets the `gt` bound.
    #[must_use]
    pub fn gt(mut self, value: impl Into<Value>) -> Self {
        self.gt = Some(value.into());
        self
    }

    /// Sets the `lt` bound.
    #[must_use]
    pub fn lt(mut self, value: impl Into<Value>) -> Self {
        self.lt = Some(value.into());
        self
    }

    /// Returns the set bounds as a JSON object (empty if none are set).
    #[must_use]
    pub fn to_json(&self) -> Map<String, Value> {
        [
            ("gte", &self.gte),
            ("lte", &self.lte),
            ("gt", &self.gt),
            ("lt", &self.lt),
        ]
        .into_iter()
        .filter_map(|(key, value)| match value {
            Some(v) if !v.is_null() => Some((key.to_string(), v.clone())),
            _ => None,
        })
        .collect()
    }
}

/// A search request in one of the supported shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchQuery {
    /// Caller-provided Query DSL body.
    Raw(Value),
    /// `query_string` query over all fields.
    QueryString(String),
    /// `match` query on a single field.
    Match {
        /// Field to match against.
        field: String,
        /// Value to match.
        value: String,
    },
    /// `range` query on a single field.
    Range {
        /// Field to filter.
        field: String,
        /// Range bounds.
        bounds: RangeBounds,
    },
}

impl SearchQuery {
    /// Returns the short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Raw(_) => "raw",
            Self::QueryString(_) => "query_string",
            Self::Match { .. } => "match",
            Self::Range { .. } => "range",
        }
    }

    /// Validates the parameters and builds the request body.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Validation`] when a required parameter is
    /// missing or blank.
    pub fn into_body(self) -> Result<Value, SearchError> {
        match self {
            Self::Raw(body) => match body {
                Value::Object(map) if !map.is_empty() => Ok(Value::Object(map)),
                _ => Err(SearchError::validation("query is required")),
            },
            Self::QueryString(query) => {
                require(&query, "query_string")?;
                Ok(json!({ "query": { "query_string": { "query": query } } }))
            }
            Self::Match { field, value } => {
                require(&field, "field")?;
                require(&value, "value")?;
                let mut clause = Map::new();
                clause.insert(field, Value::String(value));
                Ok(json!({ "query": { "match": clause } }))
            }
            Self::Range { field, bounds } => {
                require(&field, "field")?;
                let bounds = bounds.to_json();
                if bounds.is_empty() {
                    return Err(SearchError::validation(
                        "At least one range parameter (gte, lte, gt, lt) is required",
                    ));
                }
                let mut clause = Map::new();
                clause.insert(field, Value::Object(bounds));
                Ok(json!({ "query": { "range": clause } }))
            }
        }
    }
}

/// Fails with `"{name} is required"` when `value` is blank.
pub(crate) fn require(value: &str, name: &str) -> Result<(), SearchError> {
    if value.trim().is_empty() {
        Err(SearchError::validation(format!("{name} is required")))
    } else {
        Ok(())
    }
}

/// Parses a range bound given on a command line or query string: JSON
/// when it parses (`50`, `true`, `"x"`), a plain string otherwise.
pub fn parse_bound(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
