//! Search operations.
//!
//! [`OpenSearchService`] validates parameters, builds the request body,
//! sends it through the configured [`SearchTransport`] and reshapes the
//! answer. It holds no mutable state and is cheap to clone.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::config::{OpenSearchConfig, TransportKind};
use crate::error::SearchError;
use crate::models::{ClusterHealth, IndexInfo, SearchResult};
use crate::query::{RangeBounds, SearchQuery, require};
use crate::transport::{SearchTransport, create_transport};

/// Number of hits returned when the caller gives no size.
pub const DEFAULT_SIZE: u32 = 10;

/// Outcome of a connectivity check.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionReport {
    /// Transport used for the check.
    pub transport: &'static str,
    /// Cluster health at the time of the check.
    pub health: ClusterHealth,
    /// Number of visible indices.
    pub index_count: usize,
    /// Names of the visible indices.
    pub indices: Vec<String>,
}

/// OpenSearch operations exposed to tools, REST routes and the CLI.
#[derive(Clone)]
pub struct OpenSearchService {
    transport: Arc<dyn SearchTransport>,
}

impl std::fmt::Debug for OpenSearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSearchService")
            .field("transport", &self.transport.kind())
            .finish()
    }
}

impl OpenSearchService {
    /// Creates a service with the transport selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be built.
    pub fn new(config: &OpenSearchConfig) -> crate::error::Result<Self> {
        let transport = create_transport(config)?;
        info!(
            url = %config.base_url(),
            transport = transport.kind().as_str(),
            "OpenSearch service ready"
        );
        Ok(Self {
            transport: Arc::from(transport),
        })
    }

    /// Creates a service over an existing transport.
    pub fn with_transport(transport: Arc<dyn SearchTransport>) -> Self {
        Self { transport }
    }

    /// Returns which transport carries requests.
    pub fn transport_kind(&self) -> TransportKind {
        self.transport.kind()
    }

    /// Runs a caller-provided Query DSL body.
    pub async fn search(
        &self,
        index: &str,
        query: Value,
        size: Option<u32>,
    ) -> Result<SearchResult, SearchError> {
        self.execute(index, SearchQuery::Raw(query), size).await
    }

    /// Runs a `query_string` search.
    pub async fn simple_search(
        &self,
        index: &str,
        query_string: &str,
        size: Option<u32>,
    ) -> Result<SearchResult, SearchError> {
        self.execute(index, SearchQuery::QueryString(query_string.to_string()), size)
            .await
    }

    /// Runs a `match` query on one field.
    pub async fn match_search(
        &self,
        index: &str,
        field: &str,
        value: &str,
        size: Option<u32>,
    ) -> Result<SearchResult, SearchError> {
        let query = SearchQuery::Match {
            field: field.to_string(),
            value: value.to_string(),
        };
        self.execute(index, query, size).await
    }

    /// Runs a `range` query on one field.
    pub async fn range_search(
        &self,
        index: &str,
        field: &str,
        bounds: RangeBounds,
        size: Option<u32>,
    ) -> Result<SearchResult, SearchError> {
        let query = SearchQuery::Range {
            field: field.to_string(),
            bounds,
        };
        self.execute(index, query, size).await
    }

    async fn execute(
        &self,
        index: &str,
        query: SearchQuery,
        size: Option<u32>,
    ) -> Result<SearchResult, SearchError> {
        let size = effective_size(size);
        let kind = query.kind();
        info!(index, kind, size, "search");

        let result = async {
            require(index, "index")?;
            let body = query.into_body()?;
            let response = self.transport.search(index, &body, size).await?;
            Ok::<_, SearchError>(SearchResult::from_response(response)?)
        }
        .await;

        match &result {
            Ok(found) => info!(
                index,
                kind,
                total_hits = found.total_hits,
                took = found.took,
                "search complete"
            ),
            Err(e) => error!(index, kind, error = %e, "search failed"),
        }
        result
    }

    /// Fetches a document's `_source` by ID.
    pub async fn get_document(&self, index: &str, doc_id: &str) -> Result<Value, SearchError> {
        info!(index, doc_id, "get document");
        let result = async {
            require(index, "index")?;
            require(doc_id, "doc_id")?;
            let doc = self
                .transport
                .get_document(index, doc_id)
                .await?
                .ok_or_else(|| SearchError::DocumentNotFound {
                    index: index.to_string(),
                    id: doc_id.to_string(),
                })?;
            Ok::<_, SearchError>(source_of(doc))
        }
        .await;
        log_failure("get document", &result);
        result
    }

    /// Lists all indices.
    pub async fn get_indices(&self) -> Result<Vec<IndexInfo>, SearchError> {
        info!("get indices");
        let result = async {
            let response = self.transport.cat_indices().await?;
            Ok::<_, SearchError>(IndexInfo::from_cat_response(response)?)
        }
        .await;
        log_failure("get indices", &result);
        result
    }

    /// Returns cluster health.
    pub async fn get_cluster_health(&self) -> Result<ClusterHealth, SearchError> {
        info!("get cluster health");
        let result = async {
            let response = self.transport.cluster_health().await?;
            Ok::<_, SearchError>(ClusterHealth::from_response(response)?)
        }
        .await;
        log_failure("get cluster health", &result);
        result
    }

    /// Returns the raw mapping of an index.
    pub async fn get_index_mapping(&self, index: &str) -> Result<Value, SearchError> {
        info!(index, "get index mapping");
        let result = async {
            require(index, "index")?;
            self.transport.get_mapping(index).await
        }
        .await;
        log_failure("get index mapping", &result);
        result
    }

    /// Verifies the cluster is reachable with the configured credentials.
    pub async fn check_connection(&self) -> Result<ConnectionReport, SearchError> {
        let health = self.get_cluster_health().await?;
        let indices = self.get_indices().await?;
        info!(
            cluster = %health.cluster_name,
            status = %health.status,
            indices = indices.len(),
            "connection ok"
        );
        Ok(ConnectionReport {
            transport: self.transport.kind().as_str(),
            health,
            index_count: indices.len(),
            indices: indices.into_iter().map(|i| i.name).collect(),
        })
    }
}

const fn effective_size(size: Option<u32>) -> u32 {
    match size {
        Some(0) | None => DEFAULT_SIZE,
        Some(n) => n,
    }
}

/// `_source` of a `GET _doc` response; documents stored without a source
/// come back as an empty object.
fn source_of(mut doc: Value) -> Value {
    doc.get_mut("_source")
        .map_or_else(|| Value::Object(serde_json::Map::new()), Value::take)
}

fn log_failure<T>(operation: &str, result: &Result<T, SearchError>) {
    if let Err(e) = result {
        error!(operation, error = %e, "operation failed");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use test_case::test_case;

    /// Canned transport recording every search request.
    #[derive(Default)]
    pub(crate) struct MockTransport {
        pub(crate) searches: Mutex<Vec<(String, Value, u32)>>,
        pub(crate) search_response: Option<Value>,
        pub(crate) document: Option<Value>,
        pub(crate) fail_with: Option<u16>,
    }

    impl MockTransport {
        fn check(&self) -> Result<(), SearchError> {
            match self.fail_with {
                Some(status) => Err(SearchError::Status {
                    status,
                    reason: "boom".to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl SearchTransport for MockTransport {
        fn kind(&self) -> TransportKind {
            TransportKind::Client
        }

        async fn search(&self, index: &str, body: &Value, size: u32) -> Result<Value, SearchError> {
            self.check()?;
            self.searches
                .lock()
                .unwrap()
                .push((index.to_string(), body.clone(), size));
            Ok(self.search_response.clone().unwrap_or_else(|| {
                json!({
                    "took": 2,
                    "timed_out": false,
                    "hits": {
                        "total": { "value": 1, "relation": "eq" },
                        "max_score": 1.5,
                        "hits": [{
                            "_index": index,
                            "_id": "1",
                            "_score": 1.5,
                            "_source": { "title": "Getting Started with OpenSearch" }
                        }]
                    }
                })
            }))
        }

        async fn get_document(&self, _index: &str, _id: &str) -> Result<Option<Value>, SearchError> {
            self.check()?;
            Ok(self.document.clone())
        }

        async fn cat_indices(&self) -> Result<Value, SearchError> {
            self.check()?;
            Ok(json!([
                { "health": "green", "status": "open", "index": "products", "uuid": "u1",
                  "pri": "1", "rep": "0", "docs.count": "8", "docs.deleted": "0",
                  "store.size": "12kb", "pri.store.size": "12kb" },
                { "health": "yellow", "status": "open", "index": "logs", "uuid": "u2",
                  "pri": "1", "rep": "1", "docs.count": "200", "docs.deleted": "3",
                  "store.size": "1mb", "pri.store.size": "1mb" }
            ]))
        }

        async fn cluster_health(&self) -> Result<Value, SearchError> {
            self.check()?;
            Ok(json!({
                "cluster_name": "docker-cluster",
                "status": "green",
                "number_of_nodes": 1,
                "active_shards_percent_as_number": 100.0
            }))
        }

        async fn get_mapping(&self, index: &str) -> Result<Value, SearchError> {
            self.check()?;
            Ok(json!({ index: { "mappings": { "properties": { "title": { "type": "text" } } } } }))
        }
    }

    fn service(mock: MockTransport) -> (OpenSearchService, Arc<MockTransport>) {
        let mock = Arc::new(mock);
        (OpenSearchService::with_transport(mock.clone()), mock)
    }

    fn last_search(mock: &MockTransport) -> (String, Value, u32) {
        mock.searches.lock().unwrap().last().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_search_forwards_body_verbatim() {
        let (svc, mock) = service(MockTransport::default());
        let body = json!({
            "query": { "bool": { "must": [{ "match": { "category": "tutorial" } }] } },
            "aggs": { "by_author": { "terms": { "field": "author" } } }
        });
        let result = svc.search("blog-posts", body.clone(), Some(5)).await.unwrap();
        assert_eq!(result.total_hits, 1);
        assert_eq!(result.hits[0].index, "blog-posts");
        assert_eq!(last_search(&mock), ("blog-posts".to_string(), body, 5));
    }

    #[tokio::test]
    async fn test_simple_search_body() {
        let (svc, mock) = service(MockTransport::default());
        svc.simple_search("blog-posts", "opensearch", None).await.unwrap();
        let (_, body, size) = last_search(&mock);
        assert_eq!(body, json!({ "query": { "query_string": { "query": "opensearch" } } }));
        assert_eq!(size, DEFAULT_SIZE);
    }

    #[tokio::test]
    async fn test_match_search_body() {
        let (svc, mock) = service(MockTransport::default());
        svc.match_search("user-activity", "action", "login", Some(20))
            .await
            .unwrap();
        let (_, body, size) = last_search(&mock);
        assert_eq!(body, json!({ "query": { "match": { "action": "login" } } }));
        assert_eq!(size, 20);
    }

    #[tokio::test]
    async fn test_range_search_body() {
        let (svc, mock) = service(MockTransport::default());
        let bounds = RangeBounds::default().gte(100).lte(500);
        svc.range_search("products", "price", bounds, None)
            .await
            .unwrap();
        let (_, body, _) = last_search(&mock);
        assert_eq!(
            body,
            json!({ "query": { "range": { "price": { "gte": 100, "lte": 500 } } } })
        );
    }

    #[test_case(None, 10 ; "missing size")]
    #[test_case(Some(0), 10 ; "zero size")]
    #[test_case(Some(3), 3 ; "explicit size")]
    fn test_effective_size(size: Option<u32>, expected: u32) {
        assert_eq!(effective_size(size), expected);
    }

    #[tokio::test]
    async fn test_blank_index_rejected_before_request() {
        let (svc, mock) = service(MockTransport::default());
        let err = svc.simple_search(" ", "x", None).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "index is required");
        assert!(mock.searches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_range_without_bounds_rejected() {
        let (svc, mock) = service(MockTransport::default());
        let err = svc
            .range_search("products", "price", RangeBounds::default(), None)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "At least one range parameter (gte, lte, gt, lt) is required"
        );
        assert!(mock.searches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_document_returns_source() {
        let (svc, _) = service(MockTransport {
            document: Some(json!({
                "_index": "products", "_id": "1", "found": true,
                "_source": { "name": "Laptop", "price": 999.99 }
            })),
            ..MockTransport::default()
        });
        let doc = svc.get_document("products", "1").await.unwrap();
        assert_eq!(doc, json!({ "name": "Laptop", "price": 999.99 }));
    }

    #[tokio::test]
    async fn test_get_document_missing() {
        let (svc, _) = service(MockTransport::default());
        let err = svc.get_document("products", "42").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Document not found: products/42");
    }

    #[tokio::test]
    async fn test_get_document_requires_id() {
        let (svc, _) = service(MockTransport::default());
        let err = svc.get_document("products", "").await.unwrap_err();
        assert_eq!(err.to_string(), "doc_id is required");
    }

    #[tokio::test]
    async fn test_indices_and_health() {
        let (svc, _) = service(MockTransport::default());
        let indices = svc.get_indices().await.unwrap();
        assert_eq!(indices.len(), 2);
        assert_eq!(indices[1].name, "logs");
        assert_eq!(indices[1].docs_count, 200);

        let health = svc.get_cluster_health().await.unwrap();
        assert_eq!(health.cluster_name, "docker-cluster");
        assert!((health.active_shards_percent - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_mapping_passthrough() {
        let (svc, _) = service(MockTransport::default());
        let mapping = svc.get_index_mapping("blog-posts").await.unwrap();
        assert_eq!(
            mapping["blog-posts"]["mappings"]["properties"]["title"]["type"],
            "text"
        );
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let (svc, _) = service(MockTransport {
            fail_with: Some(503),
            ..MockTransport::default()
        });
        let err = svc.get_cluster_health().await.unwrap_err();
        assert_eq!(err.to_string(), "OpenSearch returned 503: boom");
        assert!(svc.check_connection().await.is_err());
    }

    #[tokio::test]
    async fn test_check_connection_report() {
        let (svc, _) = service(MockTransport::default());
        let report = svc.check_connection().await.unwrap();
        assert_eq!(report.transport, "client");
        assert_eq!(report.index_count, 2);
        assert_eq!(report.indices, vec!["products", "logs"]);
        assert_eq!(report.health.status, "green");
    }
}
