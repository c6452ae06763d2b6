//! Plain REST routes mirroring the MCP tools.
//!
//! Mounted next to `/mcp` on the HTTP server so the same operations can be
//! exercised with `curl`:
//!
//! - `GET  /health`
//! - `GET  /api/opensearch/cluster/health`
//! - `GET  /api/opensearch/indices`
//! - `GET  /api/opensearch/indices/{index}/mapping`
//! - `GET  /api/opensearch/indices/{index}/documents/{doc_id}`
//! - `GET  /api/opensearch/indices/{index}/search?q=&size=`
//! - `POST /api/opensearch/indices/{index}/search?size=`
//! - `GET  /api/opensearch/indices/{index}/search/match?field=&value=&size=`
//! - `GET  /api/opensearch/indices/{index}/search/range?field=&gte=&lte=&gt=&lt=&size=`

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::SearchError;
use crate::models::{ClusterHealth, IndexInfo, SearchResult};
use crate::query::{RangeBounds, parse_bound};
use crate::service::OpenSearchService;

/// Error body: `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError(SearchError);

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        Self(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(SearchError::Validation(rejection.body_text()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(SearchError::Validation(rejection.body_text()))
    }
}

impl ApiError {
    const fn status_code(&self) -> StatusCode {
        if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "detail": self.0.to_string() }));
        (status, body).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Query-string extractor whose rejection is routed through [`ApiError`].
type QueryParams<T> = Result<Query<T>, QueryRejection>;

#[derive(Debug, Deserialize)]
struct SizeQuery {
    size: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SimpleQuery {
    #[serde(default)]
    q: String,
    size: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct MatchQuery {
    #[serde(default)]
    field: String,
    #[serde(default)]
    value: String,
    size: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    #[serde(default)]
    field: String,
    gte: Option<String>,
    lte: Option<String>,
    gt: Option<String>,
    lt: Option<String>,
    size: Option<u32>,
}

impl RangeQuery {
    fn bounds(&self) -> RangeBounds {
        let parse = |raw: &Option<String>| raw.as_deref().map(parse_bound);
        RangeBounds {
            gte: parse(&self.gte),
            lte: parse(&self.lte),
            gt: parse(&self.gt),
            lt: parse(&self.lt),
        }
    }
}

/// Builds the REST router over `service`.
pub fn router(service: OpenSearchService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/opensearch/cluster/health", get(cluster_health))
        .route("/api/opensearch/indices", get(indices))
        .route("/api/opensearch/indices/{index}/mapping", get(mapping))
        .route(
            "/api/opensearch/indices/{index}/documents/{doc_id}",
            get(document),
        )
        .route(
            "/api/opensearch/indices/{index}/search",
            get(simple_search).post(search),
        )
        .route(
            "/api/opensearch/indices/{index}/search/match",
            get(match_search),
        )
        .route(
            "/api/opensearch/indices/{index}/search/range",
            get(range_search),
        )
        .with_state(service)
}

async fn health(State(service): State<OpenSearchService>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "transport": service.transport_kind().as_str(),
    }))
}

async fn cluster_health(State(service): State<OpenSearchService>) -> ApiResult<ClusterHealth> {
    Ok(Json(service.get_cluster_health().await?))
}

async fn indices(State(service): State<OpenSearchService>) -> ApiResult<Vec<IndexInfo>> {
    Ok(Json(service.get_indices().await?))
}

async fn mapping(
    State(service): State<OpenSearchService>,
    Path(index): Path<String>,
) -> ApiResult<Value> {
    Ok(Json(service.get_index_mapping(&index).await?))
}

async fn document(
    State(service): State<OpenSearchService>,
    Path((index, doc_id)): Path<(String, String)>,
) -> ApiResult<Value> {
    Ok(Json(service.get_document(&index, &doc_id).await?))
}

async fn simple_search(
    State(service): State<OpenSearchService>,
    Path(index): Path<String>,
    params: QueryParams<SimpleQuery>,
) -> ApiResult<SearchResult> {
    let Query(params) = params?;
    Ok(Json(
        service
            .simple_search(&index, &params.q, params.size)
            .await?,
    ))
}

async fn search(
    State(service): State<OpenSearchService>,
    Path(index): Path<String>,
    params: QueryParams<SizeQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<SearchResult> {
    let Query(params) = params?;
    let Json(body) = body?;
    Ok(Json(service.search(&index, body, params.size).await?))
}

async fn match_search(
    State(service): State<OpenSearchService>,
    Path(index): Path<String>,
    params: QueryParams<MatchQuery>,
) -> ApiResult<SearchResult> {
    let Query(params) = params?;
    Ok(Json(
        service
            .match_search(&index, &params.field, &params.value, params.size)
            .await?,
    ))
}

async fn range_search(
    State(service): State<OpenSearchService>,
    Path(index): Path<String>,
    params: QueryParams<RangeQuery>,
) -> ApiResult<SearchResult> {
    let Query(params) = params?;
    let bounds = params.bounds();
    Ok(Json(
        service
            .range_search(&index, &params.field, bounds, params.size)
            .await?,
    ))
}
