//! Session cookie parsing.
//!
//! Cookies captured from an authenticated browser session (for example
//! behind an SSO proxy in front of OpenSearch) can be supplied as a header
//! string, a plain `name=value` file, a Netscape `cookies.txt` export, or
//! pulled out of a "Copy as cURL" command.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;

/// A single `(name, value)` cookie pair.
pub type Cookie = (String, String);

/// Number of tab-separated fields in a Netscape `cookies.txt` line.
const NETSCAPE_FIELDS: usize = 7;

/// Matches `-H 'Cookie: ...'` / `--header "cookie: ..."`.
#[allow(clippy::expect_used)]
static CURL_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:-H|--header)\s+(?:'cookie:\s*([^']*)'|"cookie:\s*([^"]*)")"#)
        .expect("valid cURL cookie header regex")
});

/// Matches `-b '...'` / `--cookie "..."`.
#[allow(clippy::expect_used)]
static CURL_COOKIE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:-b|--cookie)\s+(?:'([^']*)'|"([^"]*)")"#)
        .expect("valid cURL cookie flag regex")
});

/// Parses a `Cookie` header style string: `name=value; name2=value2`.
///
/// Segments without `=` or with an empty name are skipped. Values may
/// themselves contain `=` (base64 tokens).
pub fn parse_cookie_string(input: &str) -> Vec<Cookie> {
    input.split(';').filter_map(parse_pair).collect()
}

fn parse_pair(segment: &str) -> Option<Cookie> {
    let (name, value) = segment.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

/// Parses the contents of a cookie file.
///
/// Accepts `name=value` lines and Netscape `cookies.txt` lines. Blank lines
/// and `#` comments are ignored, except `#HttpOnly_` entries which Netscape
/// exports use to mark HTTP-only cookies.
pub fn parse_cookie_file(contents: &str) -> Vec<Cookie> {
    contents
        .lines()
        .filter_map(|raw| {
            let line = raw.trim_end_matches(['\r', '\n']);
            let line = line.strip_prefix("#HttpOnly_").unwrap_or(line);
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                return None;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() == NETSCAPE_FIELDS {
                let name = fields[5].trim();
                if name.is_empty() {
                    return None;
                }
                return Some((name.to_string(), fields[6].trim().to_string()));
            }

            parse_pair(line)
        })
        .collect()
}

/// Reads and parses a cookie file from disk.
pub fn load_cookie_file(path: &Path) -> Result<Vec<Cookie>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::CookieFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_cookie_file(&contents))
}

/// Merges two cookie lists by name.
///
/// Later entries replace earlier ones with the same name, both within a
/// list and across them, so `overrides` wins over `base`. First-seen order
/// is kept.
pub fn merge_cookies(base: Vec<Cookie>, overrides: Vec<Cookie>) -> Vec<Cookie> {
    let mut merged: Vec<Cookie> = Vec::with_capacity(base.len() + overrides.len());
    for (name, value) in base.into_iter().chain(overrides) {
        if let Some(existing) = merged.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            merged.push((name, value));
        }
    }
    merged
}

/// Formats cookies as a `Cookie` header value.
pub fn format_cookie_header(cookies: &[Cookie]) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Extracts the cookie string from a browser "Copy as cURL" command.
///
/// Looks for a `Cookie` header first, then for `-b` / `--cookie`.
pub fn extract_curl_cookies(curl: &str) -> Option<String> {
    let captured = |re: &Regex| {
        re.captures(curl)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().trim().to_string())
    };

    captured(&*CURL_HEADER_RE)
        .or_else(|| captured(&*CURL_COOKIE_RE))
        .filter(|s| !s.is_empty())
}
