//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// opensearch-mcp: OpenSearch query tools for agents.
///
/// Serves the search tools over MCP (stdio or HTTP) and runs the same
/// operations from the command line. Connection settings come from
/// `OPENSEARCH_*` environment variables, optionally loaded from a `.env`
/// file.
#[derive(Parser, Debug)]
#[command(name = "opensearch-mcp")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Load environment variables from this file instead of `./.env`.
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start MCP (Model Context Protocol) server.
    #[cfg(feature = "mcp")]
    #[command(subcommand)]
    Mcp(McpCommands),

    /// Show cluster health.
    Health,

    /// List indices.
    Indices,

    /// Show the mapping of an index.
    Mapping {
        /// Index name.
        index: String,
    },

    /// Fetch a document's source by ID.
    Get {
        /// Index name.
        index: String,

        /// Document ID.
        doc_id: String,
    },

    /// Run a raw Query DSL search.
    #[command(after_help = r#"Examples:
  opensearch-mcp search blog-posts '{"query":{"match_all":{}}}'
  opensearch-mcp search logs '{"query":{"term":{"level":"error"}}}' -s 50
"#)]
    Search {
        /// Index name.
        index: String,

        /// Query DSL request body as JSON.
        query: String,

        /// Number of results (default: 10).
        #[arg(short, long)]
        size: Option<u32>,
    },

    /// Run a `query_string` search.
    #[command(after_help = r#"Examples:
  opensearch-mcp simple blog-posts opensearch
  opensearch-mcp simple blog-posts 'title:opensearch AND author:john'
"#)]
    Simple {
        /// Index name.
        index: String,

        /// Query string.
        query: String,

        /// Number of results (default: 10).
        #[arg(short, long)]
        size: Option<u32>,
    },

    /// Run a `match` query on one field.
    Match {
        /// Index name.
        index: String,

        /// Field to match.
        field: String,

        /// Value to match.
        value: String,

        /// Number of results (default: 10).
        #[arg(short, long)]
        size: Option<u32>,
    },

    /// Run a `range` query on one field.
    ///
    /// Bounds are parsed as JSON when possible (`100`, `12.5`), otherwise
    /// sent as strings (`2024-01-01`, `now-1d/d`).
    #[command(after_help = r#"Examples:
  opensearch-mcp range products price --gte 100 --lte 500
  opensearch-mcp range logs timestamp --gt now-1h
"#)]
    Range {
        /// Index name.
        index: String,

        /// Field to filter.
        field: String,

        /// Greater than or equal to.
        #[arg(long)]
        gte: Option<String>,

        /// Less than or equal to.
        #[arg(long)]
        lte: Option<String>,

        /// Strictly greater than.
        #[arg(long)]
        gt: Option<String>,

        /// Strictly less than.
        #[arg(long)]
        lt: Option<String>,

        /// Number of results (default: 10).
        #[arg(short, long)]
        size: Option<u32>,
    },

    /// Check connectivity: cluster health and visible indices.
    Check,

    /// Print the resolved connection settings (secrets redacted).
    Config,

    /// Session cookie helpers.
    #[command(subcommand)]
    Cookies(CookieCommands),
}

/// MCP server subcommands.
#[cfg(feature = "mcp")]
#[derive(Subcommand, Debug)]
pub enum McpCommands {
    /// Start MCP server with stdio transport.
    ///
    /// Reads JSON-RPC messages from stdin, writes responses to stdout.
    #[command(after_help = r#"Examples:
  opensearch-mcp mcp stdio
  opensearch-mcp --env-file prod.env mcp stdio
"#)]
    Stdio,

    /// Start MCP server with streamable HTTP transport.
    ///
    /// Serves MCP at `/mcp` and the REST mirror under `/api/opensearch`.
    #[command(after_help = r#"Examples:
  opensearch-mcp mcp http                            # Listen on 127.0.0.1:8000
  opensearch-mcp mcp http --host 0.0.0.0 --port 9000
"#)]
    Http {
        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on.
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
}

/// Cookie subcommands.
#[derive(Subcommand, Debug)]
pub enum CookieCommands {
    /// Test the configured cookies against the cluster.
    Check,

    /// Extract cookies from a browser "Copy as cURL" command and store
    /// them in a `.env` file.
    #[command(after_help = r#"Examples:
  opensearch-mcp cookies from-curl "curl 'https://search.example.com/' -H 'Cookie: sid=abc'"
  pbpaste | opensearch-mcp cookies from-curl -
"#)]
    FromCurl {
        /// The cURL command, or `-` to read it from stdin.
        curl: String,

        /// `.env` file to update.
        #[arg(long = "env-file", default_value = ".env")]
        target: PathBuf,
    },
}
