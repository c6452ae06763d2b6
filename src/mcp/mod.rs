//! MCP (Model Context Protocol) server for OpenSearch.
//!
//! Exposes the search operations as MCP tools so an agent can explore and
//! query a cluster.
//!
//! # Feature Gate
//!
//! This module requires the `mcp` feature flag (enabled by default).
//!
//! # Architecture
//!
//! ```text
//! MCP Client
//!   ↓ tools/call (search, simple_search, match_search, range_search,
//!   ↓             get_document, get_indices, get_cluster_health, get_index_mapping)
//! OpenSearchMcpServer
//!   ↓
//! OpenSearchService ─→ SearchTransport (client | session) ─→ OpenSearch
//!   ↓
//! SearchResult / IndexInfo / ClusterHealth JSON → MCP Client
//! ```
//!
//! The HTTP transport also serves [`rest`], a plain JSON mirror of the tools.

pub mod params;
pub mod rest;
pub mod server;
pub mod transport;

pub use params::{
    GetDocumentParams, IndexParams, MatchSearchParams, RangeSearchParams, SearchParams,
    SimpleSearchParams,
};
pub use server::OpenSearchMcpServer;
pub use transport::{serve_http, serve_stdio};
