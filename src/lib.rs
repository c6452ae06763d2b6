//! # opensearch-mcp
//!
//! OpenSearch query operations exposed as MCP (Model Context Protocol)
//! tools for automated agents.
//!
//! ```text
//! environment / .env ─→ OpenSearchConfig ─→ SearchTransport ─┐
//!                                              (client | session)
//! tool params ─→ SearchQuery ─→ Query DSL body ──────────────┤
//!                                                            ↓
//!                       SearchResult / IndexInfo / ClusterHealth
//! ```
//!
//! - [`config`]: connection settings from `OPENSEARCH_*` variables
//! - [`auth`]: session cookies, cURL extraction and extra headers
//! - [`query`]: typed parameters to Query DSL
//! - [`transport`]: credentialed client or cookie session
//! - [`models`]: response reshaping
//! - [`service`]: the eight operations
//! - `mcp`: MCP server and REST mirror (feature `mcp`)
//!
//! ## Example
//!
//! ```no_run
//! use opensearch_mcp::{OpenSearchConfig, OpenSearchService};
//!
//! # async fn run() -> opensearch_mcp::Result<()> {
//! let config = OpenSearchConfig::builder().from_env().build()?;
//! let service = OpenSearchService::new(&config)?;
//! let result = service.simple_search("blog-posts", "opensearch", Some(5)).await?;
//! println!("{} hits", result.total_hits);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
#[cfg(feature = "mcp")]
pub mod mcp;
pub mod models;
pub mod query;
pub mod service;
pub mod transport;

pub use config::{OpenSearchConfig, OpenSearchConfigBuilder, TransportKind};
pub use error::{CommandError, ConfigError, Error, Result, SearchError};
pub use models::{ClusterHealth, IndexInfo, SearchHit, SearchResult};
pub use query::{RangeBounds, SearchQuery};
pub use service::{ConnectionReport, OpenSearchService};
pub use transport::{SearchTransport, create_transport};
