//! Authentication material for the session transport.
//!
//! Credentials (basic / client certificate) are handled by the `opensearch`
//! client directly; this module covers what that client cannot express:
//! captured session cookies and arbitrary proxy headers.

pub mod cookies;
pub mod env_file;
pub mod headers;

pub use cookies::{
    Cookie, extract_curl_cookies, format_cookie_header, load_cookie_file, merge_cookies,
    parse_cookie_file, parse_cookie_string,
};
pub use env_file::update_env_file;
pub use headers::parse_auth_headers;
