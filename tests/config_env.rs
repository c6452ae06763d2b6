//! Environment resolution for `OpenSearchConfig`.
//!
//! Kept to a single test so no other test in this binary touches the
//! process environment concurrently.

use std::env;
use std::time::Duration;

use opensearch_mcp::config::{OpenSearchConfig, TransportKind};

const VARS: &[(&str, &str)] = &[
    ("OPENSEARCH_HOST", "env-host"),
    ("OPENSEARCH_PORT", "not-a-port"),
    ("OPENSEARCH_TIMEOUT", "soon"),
    ("OPENSEARCH_USE_SSL", "TRUE"),
    ("OPENSEARCH_VERIFY_CERTS", "yes"),
    ("OPENSEARCH_USE_COOKIES", "1"),
    ("OPENSEARCH_COOKIES", "sid=env"),
];

#[test]
fn test_env_resolution() {
    unsafe {
        for (name, value) in VARS {
            env::set_var(name, value);
        }
        env::remove_var("OPENSEARCH_COOKIE_FILE");
        env::remove_var("OPENSEARCH_AUTH_HEADERS");
    }

    let from_env = OpenSearchConfig::from_env().unwrap();
    assert_eq!(from_env.host, "env-host");
    assert_eq!(from_env.port, 9200);
    assert_eq!(from_env.timeout, Duration::from_secs(30));
    assert!(from_env.use_ssl);
    assert!(!from_env.verify_certs);
    assert!(!from_env.use_cookies);
    assert_eq!(from_env.transport_kind(), TransportKind::Client);

    let explicit = OpenSearchConfig::builder()
        .host("explicit-host")
        .port(9400)
        .use_ssl(false)
        .use_cookies(true)
        .cookies("sid=explicit")
        .from_env()
        .build()
        .unwrap();
    assert_eq!(explicit.host, "explicit-host");
    assert_eq!(explicit.port, 9400);
    assert!(!explicit.use_ssl);
    assert_eq!(explicit.transport_kind(), TransportKind::Session);
    assert_eq!(explicit.cookie_header().as_deref(), Some("sid=explicit"));

    unsafe {
        for (name, _) in VARS {
            env::remove_var(name);
        }
    }
}
