//! CLI layer for opensearch-mcp.
//!
//! Provides the command-line interface using clap: MCP server startup,
//! one-shot search commands and cookie maintenance.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
#[cfg(feature = "mcp")]
pub use parser::McpCommands;
pub use parser::{Cli, Commands, CookieCommands};
