//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use std::future::Future;
use std::io::{self, Read};
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::auth::{extract_curl_cookies, parse_cookie_string, update_env_file};
use crate::cli::output::{
    OutputFormat, format_connection, format_health, format_indices, format_search_result,
    format_value,
};
#[cfg(feature = "mcp")]
use crate::cli::parser::McpCommands;
use crate::cli::parser::{Cli, Commands, CookieCommands};
use crate::config::OpenSearchConfig;
use crate::error::{CommandError, Result};
use crate::query::{RangeBounds, parse_bound};
use crate::service::OpenSearchService;

/// Executes the CLI command.
///
/// Connection settings are read from the environment; load any `.env`
/// file before calling this.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the command fails.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        #[cfg(feature = "mcp")]
        Commands::Mcp(sub) => cmd_mcp(sub, &load_config()?),

        Commands::Health => {
            let service = connect()?;
            let health = block_on(service.get_cluster_health())??;
            Ok(format_health(&health, format))
        }
        Commands::Indices => {
            let service = connect()?;
            let indices = block_on(service.get_indices())??;
            Ok(format_indices(&indices, format))
        }
        Commands::Mapping { index } => {
            let service = connect()?;
            let mapping = block_on(service.get_index_mapping(index))??;
            Ok(format_value(&mapping, format))
        }
        Commands::Get { index, doc_id } => {
            let service = connect()?;
            let doc = block_on(service.get_document(index, doc_id))??;
            Ok(format_value(&doc, format))
        }
        Commands::Search { index, query, size } => {
            let body = parse_query_body(query)?;
            let service = connect()?;
            let result = block_on(service.search(index, body, *size))??;
            Ok(format_search_result(&result, format))
        }
        Commands::Simple { index, query, size } => {
            let service = connect()?;
            let result = block_on(service.simple_search(index, query, *size))??;
            Ok(format_search_result(&result, format))
        }
        Commands::Match {
            index,
            field,
            value,
            size,
        } => {
            let service = connect()?;
            let result = block_on(service.match_search(index, field, value, *size))??;
            Ok(format_search_result(&result, format))
        }
        Commands::Range {
            index,
            field,
            gte,
            lte,
            gt,
            lt,
            size,
        } => {
            let bounds = range_bounds(gte.as_deref(), lte.as_deref(), gt.as_deref(), lt.as_deref());
            let service = connect()?;
            let result = block_on(service.range_search(index, field, bounds, *size))??;
            Ok(format_search_result(&result, format))
        }
        Commands::Check => {
            let service = connect()?;
            let report = block_on(service.check_connection())??;
            Ok(format_connection(&report, format))
        }
        Commands::Config => Ok(format_value(&load_config()?.redacted(), format)),
        Commands::Cookies(sub) => execute_cookies(sub, format),
    }
}

fn execute_cookies(cmd: &CookieCommands, format: OutputFormat) -> Result<String> {
    match cmd {
        CookieCommands::Check => cmd_cookies_check(format),
        CookieCommands::FromCurl { curl, target } => cmd_cookies_from_curl(curl, target, format),
    }
}

fn load_config() -> Result<OpenSearchConfig> {
    Ok(OpenSearchConfig::from_env()?)
}

fn connect() -> Result<OpenSearchService> {
    OpenSearchService::new(&load_config()?)
}

/// Runs `future` to completion on a fresh runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new().map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to create async runtime: {e}"))
    })?;
    Ok(rt.block_on(future))
}

fn parse_query_body(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| {
        CommandError::InvalidArgument(format!("query must be a JSON object: {e}")).into()
    })
}

fn range_bounds(
    gte: Option<&str>,
    lte: Option<&str>,
    gt: Option<&str>,
    lt: Option<&str>,
) -> RangeBounds {
    RangeBounds {
        gte: gte.map(parse_bound),
        lte: lte.map(parse_bound),
        gt: gt.map(parse_bound),
        lt: lt.map(parse_bound),
    }
}

fn cmd_cookies_check(format: OutputFormat) -> Result<String> {
    let mut config = load_config()?;
    if config.cookies.is_empty() {
        return Err(CommandError::InvalidArgument(
            "no cookies configured; set OPENSEARCH_COOKIES or OPENSEARCH_COOKIE_FILE".to_string(),
        )
        .into());
    }
    config.use_cookies = true;
    info!(cookies = config.cookies.len(), "checking session cookies");

    let service = OpenSearchService::new(&config)?;
    let report = block_on(service.check_connection())?.map_err(|e| {
        CommandError::ExecutionFailed(format!(
            "cookies rejected ({e}); capture fresh ones with `cookies from-curl`"
        ))
    })?;

    match format {
        OutputFormat::Text => Ok(format!(
            "{} cookie(s) accepted.\n{}",
            config.cookies.len(),
            format_connection(&report, format)
        )),
        OutputFormat::Json => Ok(format.to_json(&report)),
    }
}

fn cmd_cookies_from_curl(curl: &str, target: &Path, format: OutputFormat) -> Result<String> {
    let command = if curl == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        curl.to_string()
    };

    let cookie_string = extract_curl_cookies(&command).ok_or_else(|| {
        CommandError::InvalidArgument(
            "no cookies found in cURL command (expected -H 'Cookie: ...' or -b '...')".to_string(),
        )
    })?;
    let names: Vec<String> = parse_cookie_string(&cookie_string)
        .into_iter()
        .map(|(name, _)| name)
        .collect();

    update_env_file(target, &cookie_string)?;
    info!(path = %target.display(), cookies = names.len(), "updated env file");

    match format {
        OutputFormat::Text => Ok(format!(
            "Updated {} with {} cookie(s): {}\n",
            target.display(),
            names.len(),
            names.join(", ")
        )),
        OutputFormat::Json => Ok(format.to_json(&serde_json::json!({
            "env_file": target.display().to_string(),
            "cookies": names,
        }))),
    }
}

#[cfg(feature = "mcp")]
fn cmd_mcp(cmd: &McpCommands, config: &OpenSearchConfig) -> Result<String> {
    use crate::mcp::{OpenSearchMcpServer, serve_http, serve_stdio};

    let server = OpenSearchMcpServer::new(config).map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to create MCP server: {e}"))
    })?;

    block_on(async {
        match cmd {
            McpCommands::Stdio => serve_stdio(server).await,
            McpCommands::Http { host, port } => serve_http(server, host, *port).await,
        }
    })?
    .map_err(|e| CommandError::ExecutionFailed(format!("MCP server error: {e}")))?;

    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_range_bounds_parsing() {
        let bounds = range_bounds(Some("100"), None, None, Some("now-1d/d"));
        assert_eq!(bounds.gte, Some(json!(100)));
        assert_eq!(bounds.lt, Some(json!("now-1d/d")));
        assert!(bounds.lte.is_none() && bounds.gt.is_none());
    }

    #[test]
    fn test_parse_query_body() {
        let body = parse_query_body(r#"{"query":{"match_all":{}}}"#).unwrap();
        assert_eq!(body, json!({ "query": { "match_all": {} } }));
        assert!(parse_query_body("{not json").is_err());
    }

    #[test]
    fn test_cookies_from_curl_writes_env_file() {
        let dir = TempDir::new().unwrap();
        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "OPENSEARCH_HOST=search.example.com\n").unwrap();

        let curl = "curl 'https://search.example.com/_dashboards/api/status' \
                    -H 'accept: application/json' \
                    -H 'cookie: security_authentication=abc123; JSESSIONID=xyz'";
        let out = cmd_cookies_from_curl(curl, &env_path, OutputFormat::Text).unwrap();
        assert!(out.contains("2 cookie(s): security_authentication, JSESSIONID"));

        let contents = std::fs::read_to_string(&env_path).unwrap();
        assert!(contents.contains("OPENSEARCH_HOST=search.example.com"));
        assert!(contents.contains("OPENSEARCH_USE_COOKIES=true"));
        assert!(contents.contains("OPENSEARCH_COOKIES='security_authentication=abc123; JSESSIONID=xyz'"));
    }

    #[test]
    fn test_cookies_from_curl_without_cookie() {
        let dir = TempDir::new().unwrap();
        let env_path = dir.path().join(".env");
        let result = cmd_cookies_from_curl(
            "curl 'https://search.example.com/' -H 'accept: */*'",
            &env_path,
            OutputFormat::Text,
        );
        assert!(result.is_err());
        assert!(!env_path.exists());
    }
}
