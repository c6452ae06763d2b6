//! Output formatting for CLI commands.
//!
//! Text output is meant for people at a terminal; JSON output is the same
//! shape the MCP tools return and is stable for scripting.

use std::fmt::Write as FmtWrite;

use serde::Serialize;
use serde_json::Value;

use crate::models::{ClusterHealth, IndexInfo, SearchResult};
use crate::service::ConnectionReport;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parses a format name; unknown names fall back to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Serializes `value` as pretty JSON followed by a newline.
    pub fn to_json<T: Serialize + ?Sized>(self, value: &T) -> String {
        let mut out = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
            serde_json::json!({ "error": format!("serialization failed: {e}") }).to_string()
        });
        out.push('\n');
        out
    }
}

/// Formats a search result.
pub fn format_search_result(result: &SearchResult, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return format.to_json(result);
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} hit(s), showing {} (took {} ms{})",
        result.total_hits,
        result.hits.len(),
        result.took,
        if result.timed_out { ", timed out" } else { "" }
    );
    for hit in &result.hits {
        let score = hit
            .score
            .map_or_else(|| "-".to_string(), |s| format!("{s:.3}"));
        let _ = writeln!(out, "\n[{score}] {}/{}", hit.index, hit.id);
        let _ = writeln!(out, "  {}", hit.source);
        if let Some(highlight) = &hit.highlight {
            let _ = writeln!(out, "  highlight: {highlight}");
        }
    }
    if let Some(aggs) = &result.aggregations {
        let _ = writeln!(out, "\naggregations: {aggs}");
    }
    out
}

/// Formats the index listing as a table.
pub fn format_indices(indices: &[IndexInfo], format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return format.to_json(indices);
    }
    if indices.is_empty() {
        return "No indices found.\n".to_string();
    }

    let width = indices.iter().map(|i| i.name.len()).max().unwrap_or(5).max(5);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:<7}  {:<6}  {:>3}  {:>3}  {:>10}  {:>10}",
        "INDEX", "HEALTH", "STATUS", "PRI", "REP", "DOCS", "SIZE"
    );
    for index in indices {
        let _ = writeln!(
            out,
            "{:<width$}  {:<7}  {:<6}  {:>3}  {:>3}  {:>10}  {:>10}",
            index.name,
            index.health,
            index.status,
            index.primary_shards,
            index.replica_shards,
            index.docs_count,
            index.store_size
        );
    }
    out
}

/// Formats cluster health.
pub fn format_health(health: &ClusterHealth, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return format.to_json(health);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Cluster:   {}", health.cluster_name);
    let _ = writeln!(out, "Status:    {}", health.status);
    let _ = writeln!(
        out,
        "Nodes:     {} ({} data)",
        health.number_of_nodes, health.number_of_data_nodes
    );
    let _ = writeln!(
        out,
        "Shards:    {} active ({} primary), {} relocating, {} initializing, {} unassigned",
        health.active_shards,
        health.active_primary_shards,
        health.relocating_shards,
        health.initializing_shards,
        health.unassigned_shards
    );
    let _ = writeln!(out, "Active:    {:.1}%", health.active_shards_percent);
    out
}

/// Formats a connection check.
pub fn format_connection(report: &ConnectionReport, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return format.to_json(report);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Connected via {} transport", report.transport);
    let _ = writeln!(
        out,
        "Cluster {} is {}",
        report.health.cluster_name, report.health.status
    );
    let _ = writeln!(out, "{} index(es) visible", report.index_count);
    for name in &report.indices {
        let _ = writeln!(out, "  - {name}");
    }
    out
}

/// Formats a raw JSON document. Both formats print indented JSON.
pub fn format_value(value: &Value, format: OutputFormat) -> String {
    format.to_json(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchHit;
    use serde_json::json;

    fn sample_result() -> SearchResult {
        SearchResult {
            total_hits: 42,
            max_score: Some(2.5),
            took: 7,
            timed_out: false,
            hits: vec![SearchHit {
                id: "1".to_string(),
                index: "blog-posts".to_string(),
                score: Some(2.5),
                source: json!({ "title": "Hello" }),
                highlight: None,
            }],
            aggregations: None,
        }
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("yaml"), OutputFormat::Text);
    }

    #[test]
    fn test_search_text() {
        let out = format_search_result(&sample_result(), OutputFormat::Text);
        assert!(out.starts_with("42 hit(s), showing 1 (took 7 ms)"));
        assert!(out.contains("[2.500] blog-posts/1"));
        assert!(out.contains(r#"{"title":"Hello"}"#));
    }

    #[test]
    fn test_search_json() {
        let out = format_search_result(&sample_result(), OutputFormat::Json);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["total_hits"], 42);
        assert_eq!(parsed["hits"][0]["index"], "blog-posts");
    }

    #[test]
    fn test_indices_table() {
        let indices = vec![IndexInfo {
            name: "products".to_string(),
            health: "green".to_string(),
            status: "open".to_string(),
            primary_shards: 1,
            docs_count: 8,
            store_size: "12kb".to_string(),
            ..IndexInfo::default()
        }];
        let out = format_indices(&indices, OutputFormat::Text);
        let mut lines = out.lines();
        assert!(lines.next().unwrap().starts_with("INDEX"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("products"));
        assert!(row.contains("green"));
        assert!(row.ends_with("12kb"));

        assert_eq!(format_indices(&[], OutputFormat::Text), "No indices found.\n");
    }

    #[test]
    fn test_health_text() {
        let health = ClusterHealth {
            cluster_name: "docker-cluster".to_string(),
            status: "yellow".to_string(),
            number_of_nodes: 1,
            active_shards_percent: 50.0,
            ..ClusterHealth::default()
        };
        let out = format_health(&health, OutputFormat::Text);
        assert!(out.contains("Cluster:   docker-cluster"));
        assert!(out.contains("Status:    yellow"));
        assert!(out.contains("Active:    50.0%"));
    }
}
