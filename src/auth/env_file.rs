//! `.env` file updates for refreshed session cookies.

use std::path::Path;

const USE_COOKIES_KEY: &str = "OPENSEARCH_USE_COOKIES";
const COOKIES_KEY: &str = "OPENSEARCH_COOKIES";

/// Writes `cookie_string` into the `.env` file at `path`.
///
/// Sets `OPENSEARCH_USE_COOKIES=true` and `OPENSEARCH_COOKIES='...'`,
/// replacing existing assignments in place and appending missing ones.
/// Other lines, including comments, are kept as they are. The file is
/// created if it does not exist.
pub fn update_env_file(path: &Path, cookie_string: &str) -> std::io::Result<()> {
    let existing = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };
    std::fs::write(path, rewrite_env(&existing, cookie_string))
}

/// Returns `contents` with the cookie assignments set.
pub fn rewrite_env(contents: &str, cookie_string: &str) -> String {
    let cookies_line = format!("{COOKIES_KEY}={}", quote_value(cookie_string));
    let use_line = format!("{USE_COOKIES_KEY}=true");

    let mut saw_use = false;
    let mut saw_cookies = false;
    let mut lines: Vec<String> = contents
        .lines()
        .map(|line| match assignment_key(line) {
            Some(USE_COOKIES_KEY) => {
                saw_use = true;
                use_line.clone()
            }
            Some(COOKIES_KEY) => {
                saw_cookies = true;
                cookies_line.clone()
            }
            _ => line.to_string(),
        })
        .collect();

    if !saw_use {
        lines.push(use_line);
    }
    if !saw_cookies {
        lines.push(cookies_line);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Quotes a value so dotenv loaders read it back verbatim. Single quotes
/// are literal; values containing `'` fall back to escaped double quotes.
fn quote_value(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn assignment_key(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return None;
    }
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
    trimmed.split_once('=').map(|(key, _)| key.trim())
}
