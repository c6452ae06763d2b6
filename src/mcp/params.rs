//! MCP tool parameter types.
//!
//! Defines the input schemas for MCP tools using `schemars` for automatic
//! JSON Schema generation required by the MCP protocol.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::RangeBounds;

/// Parameters for the `search` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// The index name to search in.
    pub index: String,

    /// OpenSearch Query DSL request body, e.g. `{"query": {"match_all": {}}}`.
    pub query: Value,

    /// Number of results to return (default: 10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// Parameters for the `simple_search` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SimpleSearchParams {
    /// The index name to search in.
    pub index: String,

    /// Query string, e.g. `title:opensearch AND author:john`.
    pub query_string: String,

    /// Number of results to return (default: 10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// Parameters for the `match_search` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MatchSearchParams {
    /// The index name to search in.
    pub index: String,

    /// The field to search in.
    pub field: String,

    /// The value to match.
    pub value: String,

    /// Number of results to return (default: 10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// Parameters for the `range_search` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RangeSearchParams {
    /// The index name to search in.
    pub index: String,

    /// The field to apply the range filter on.
    pub field: String,

    /// Greater than or equal to (number, date or date math).
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

    /// Number of results to return (default: 10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl RangeSearchParams {
    /// Collects the bounds into [`RangeBounds`].
    pub fn bounds(&self) -> RangeBounds {
        RangeBounds {
            gte: self.gte.clone(),
            lte: self.lte.clone(),
            gt: self.gt.clone(),
            lt: self.lt.clone(),
        }
    }
}

/// Parameters for the `get_document` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetDocumentParams {
    /// The index name.
    pub index: String,

    /// The document ID.
    pub doc_id: String,
}

/// Parameters for the `get_index_mapping` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IndexParams {
    /// The index name.
    pub index: String,
}
