//! Result shapes returned to tool callers.
//!
//! Raw OpenSearch responses are reshaped into a few fixed structures so
//! agents get stable field names regardless of cluster version.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document ID.
    pub id: String,
    /// Index the hit came from.
    pub index: String,
    /// Relevance score (`null` when sorting by field).
    pub score: Option<f64>,
    /// Document `_source`.
    pub source: Value,
    /// Highlight fragments per field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Value>,
}

/// A search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total matching documents.
    pub total_hits: u64,
    /// Highest score among hits.
    pub max_score: Option<f64>,
    /// Server-side execution time in milliseconds.
    pub took: u64,
    /// Whether the search timed out.
    pub timed_out: bool,
    /// Returned hits.
    pub hits: Vec<SearchHit>,
    /// Aggregation results, if requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<Value>,
}

/// Raw `_search` response, only the parts we keep.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSearchResponse {
    took: u64,
    timed_out: bool,
    hits: RawHits,
    aggregations: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHits {
    total: Option<RawTotal>,
    max_score: Option<f64>,
    hits: Vec<RawHit>,
}

/// `hits.total` is an object since 7.x and a bare number before.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Object { value: u64 },
    Count(u64),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHit {
    #[serde(rename = "_index")]
    index: String,
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: Option<Value>,
    highlight: Option<Value>,
}

impl SearchResult {
    /// Reshapes a raw `_search` response.
    ///
    /// # Errors
    ///
    /// Returns an error if the response is not a JSON object of the
    /// expected shape.
    pub fn from_response(response: Value) -> Result<Self, serde_json::Error> {
        let raw: RawSearchResponse = serde_json::from_value(response)?;
        let total_hits = match raw.hits.total {
            Some(RawTotal::Object { value } | RawTotal::Count(value)) => value,
            None => 0,
        };

        Ok(Self {
            total_hits,
            max_score: raw.hits.max_score,
            took: raw.took,
            timed_out: raw.timed_out,
            hits: raw
                .hits
                .hits
                .into_iter()
                .map(|hit| SearchHit {
                    id: hit.id,
                    index: hit.index,
                    score: hit.score,
                    source: hit.source.unwrap_or_else(|| Value::Object(serde_json::Map::new())),
                    highlight: hit.highlight,
                })
                .collect(),
            aggregations: raw.aggregations,
        })
    }
}

/// One row of `_cat/indices`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
    /// Index name.
    #[serde(alias = "index", default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Health colour.
    #[serde(default, deserialize_with = "lenient_string")]
    pub health: String,
    /// `open` / `close`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    /// Index UUID.
    #[serde(default, deserialize_with = "lenient_string")]
    pub uuid: String,
    /// Primary shard count.
    #[serde(alias = "pri", default, deserialize_with = "lenient_u64")]
    pub primary_shards: u64,
    /// Replica count.
    #[serde(alias = "rep", default, deserialize_with = "lenient_u64")]
    pub replica_shards: u64,
    /// Live document count.
    #[serde(alias = "docs.count", default, deserialize_with = "lenient_u64")]
    pub docs_count: u64,
    /// Deleted document count.
    #[serde(alias = "docs.deleted", default, deserialize_with = "lenient_u64")]
    pub docs_deleted: u64,
    /// Total store size (human readable).
    #[serde(alias = "store.size", default, deserialize_with = "lenient_string")]
    pub store_size: String,
    /// Primary store size (human readable).
    #[serde(alias = "pri.store.size", default, deserialize_with = "lenient_string")]
    pub primary_store_size: String,
}

impl IndexInfo {
    /// Reshapes a `_cat/indices?format=json` response.
    ///
    /// # Errors
    ///
    /// Returns an error if the response is not an array of objects.
    pub fn from_cat_response(response: Value) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_value(response)
    }
}

/// Cluster health.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterHealth {
    /// Cluster name.
    pub cluster_name: String,
    /// `green` / `yellow` / `red`.
    pub status: String,
    /// Whether the health request timed out.
    pub timed_out: bool,
    /// Node count.
    pub number_of_nodes: u64,
    /// Data node count.
    pub number_of_data_nodes: u64,
    /// Active primary shards.
    pub active_primary_shards: u64,
    /// Active shards.
    pub active_shards: u64,
    /// Relocating shards.
    pub relocating_shards: u64,
    /// Initializing shards.
    pub initializing_shards: u64,
    /// Unassigned shards.
    pub unassigned_shards: u64,
    /// Delayed unassigned shards.
    pub delayed_unassigned_shards: u64,
    /// Pending cluster tasks.
    pub number_of_pending_tasks: u64,
    /// In-flight shard fetches.
    pub number_of_in_flight_fetch: u64,
    /// Longest task wait in milliseconds.
    pub task_max_waiting_in_queue_millis: u64,
    /// Percentage of active shards.
    #[serde(alias = "active_shards_percent_as_number")]
    pub active_shards_percent: f64,
}

impl ClusterHealth {
    /// Reshapes a `_cluster/health` response.
    ///
    /// # Errors
    ///
    /// Returns an error if the response is not a JSON object.
    pub fn from_response(response: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(response)
    }
}

/// Accepts `"12"`, `12` or `null` (closed indices report null counts).
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Accepts a string or `null`.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
