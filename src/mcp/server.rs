//! MCP server implementation.
//!
//! Each tool validates its parameters, runs the matching
//! [`OpenSearchService`] operation and returns the result as pretty JSON.
//! Caller mistakes surface as `invalid_params`; cluster failures come back
//! as a tool result flagged `is_error` so the agent can read the message.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use crate::config::OpenSearchConfig;
use crate::error::SearchError;
use crate::service::OpenSearchService;

use super::params::{
    GetDocumentParams, IndexParams, MatchSearchParams, RangeSearchParams, SearchParams,
    SimpleSearchParams,
};

/// Maps an operation outcome onto an MCP tool result.
fn tool_result<T: Serialize>(result: Result<T, SearchError>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => {
            let json = serde_json::to_string_pretty(&value).map_err(|e| {
                McpError::internal_error(format!("Serialization error: {e}"), None)
            })?;
            Ok(CallToolResult::success(vec![Content::text(json)]))
        }
        Err(e) if e.is_validation() => Err(McpError::invalid_params(e.to_string(), None)),
        Err(e) => Ok(CallToolResult::error(vec![Content::text(format!("Error: {e}"))])),
    }
}

/// OpenSearch MCP server.
#[derive(Clone)]
pub struct OpenSearchMcpServer {
    tool_router: ToolRouter<Self>,
    service: OpenSearchService,
}

#[tool_router]
impl OpenSearchMcpServer {
    #[tool(
        name = "search",
        description = "Execute a custom search query against an OpenSearch index. The query is an OpenSearch Query DSL request body and is sent unchanged."
    )]
    async fn search(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            self.service
                .search(&params.index, params.query, params.size)
                .await,
        )
    }

    #[tool(
        name = "simple_search",
        description = "Execute a simple string search query against an OpenSearch index using query_string syntax."
    )]
    async fn simple_search(
        &self,
        Parameters(params): Parameters<SimpleSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            self.service
                .simple_search(&params.index, &params.query_string, params.size)
                .await,
        )
    }

    #[tool(
        name = "match_search",
        description = "Execute a match query for a specific field in an OpenSearch index."
    )]
    async fn match_search(
        &self,
        Parameters(params): Parameters<MatchSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            self.service
                .match_search(&params.index, &params.field, &params.value, params.size)
                .await,
        )
    }

    #[tool(
        name = "range_search",
        description = "Execute a range query for a specific field in an OpenSearch index. At least one of gte, lte, gt or lt is required."
    )]
    async fn range_search(
        &self,
        Parameters(params): Parameters<RangeSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let bounds = params.bounds();
        tool_result(
            self.service
                .range_search(&params.index, &params.field, bounds, params.size)
                .await,
        )
    }

    #[tool(
        name = "get_document",
        description = "Get a specific document by ID from an OpenSearch index. Returns the document source."
    )]
    async fn get_document(
        &self,
        Parameters(params): Parameters<GetDocumentParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            self.service
                .get_document(&params.index, &params.doc_id)
                .await,
        )
    }

    #[tool(
        name = "get_indices",
        description = "Get information about all available OpenSearch indices: health, status, shard counts, document counts and store size."
    )]
    async fn get_indices(&self) -> Result<CallToolResult, McpError> {
        tool_result(self.service.get_indices().await)
    }

    #[tool(
        name = "get_cluster_health",
        description = "Get OpenSearch cluster health information."
    )]
    async fn get_cluster_health(&self) -> Result<CallToolResult, McpError> {
        tool_result(self.service.get_cluster_health().await)
    }

    #[tool(
        name = "get_index_mapping",
        description = "Get the mapping (schema) for a specific OpenSearch index."
    )]
    async fn get_index_mapping(
        &self,
        Parameters(params): Parameters<IndexParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(self.service.get_index_mapping(&params.index).await)
    }
}

#[tool_handler]
impl ServerHandler for OpenSearchMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "opensearch-mcp-server".to_string(),
                title: Some("OpenSearch MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Query an OpenSearch cluster. Use `get_indices` to discover indices and \
                 `get_index_mapping` to learn their fields, then `simple_search`, \
                 `match_search`, `range_search` or a raw Query DSL `search`. \
                 Fetch single documents with `get_document`."
                    .to_string(),
            ),
        }
    }
}

impl OpenSearchMcpServer {
    /// Creates a server over the transport selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be built.
    pub fn new(config: &OpenSearchConfig) -> crate::error::Result<Self> {
        Ok(Self::with_service(OpenSearchService::new(config)?))
    }

    /// Creates a server over an existing service.
    pub fn with_service(service: OpenSearchService) -> Self {
        Self {
            tool_router: Self::tool_router(),
            service,
        }
    }

    /// Returns the underlying service.
    pub const fn service(&self) -> &OpenSearchService {
        &self.service
    }
}
