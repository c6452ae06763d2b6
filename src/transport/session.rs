//! Session transport for clusters behind SSO proxies.
//!
//! Replays browser cookies (and any extra auth headers) on every request
//! using a plain `reqwest` client.

use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::Value;
use tracing::debug;

use super::{SearchTransport, decode_body, decode_document};
use crate::config::{OpenSearchConfig, TransportKind};
use crate::error::{ConfigError, SearchError};

/// Cookie-authenticated transport.
pub struct SessionTransport {
    http: Client,
    base_url: Url,
    basic_auth: Option<(String, String)>,
}

impl SessionTransport {
    /// Builds the HTTP client with cookies and extra headers preinstalled.
    ///
    /// # Errors
    ///
    /// Returns an error if a header is not a valid HTTP header, the base URL
    /// cannot be parsed, or the client fails to build.
    pub fn new(config: &OpenSearchConfig) -> crate::error::Result<Self> {
        let base = config.base_url();
        let base_url = Url::parse(&base).map_err(|_| ConfigError::InvalidUrl(base.clone()))?;

        let mut headers = HeaderMap::new();
        if let Some(cookie) = config.cookie_header() {
            let value = HeaderValue::from_str(&cookie)
                .map_err(|_| ConfigError::InvalidHeader("Cookie".to_string()))?;
            headers.insert(COOKIE, value);
        }
        for (name, value) in &config.auth_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ConfigError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_certs)
            .build()
            .map_err(SearchError::from)?;

        debug!(
            url = %base,
            cookies = config.cookies.len(),
            headers = config.auth_headers.len(),
            "created OpenSearch session transport"
        );

        Ok(Self {
            http,
            base_url,
            basic_auth: config
                .credentials()
                .map(|(user, pass)| (user.to_string(), pass.to_string())),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, SearchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SearchError::Transport(format!("cannot build URL from {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.basic_auth {
            Some((user, pass)) => builder.basic_auth(user, Some(pass)),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<(u16, String), SearchError> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok((status, text))
    }

    async fn get_json(&self, url: Url) -> Result<Value, SearchError> {
        let (status, text) = self.send(self.request(Method::GET, url)).await?;
        decode_body(status, &text)
    }
}

#[async_trait]
impl SearchTransport for SessionTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Session
    }

    async fn search(&self, index: &str, body: &Value, size: u32) -> Result<Value, SearchError> {
        let mut url = self.url(&[index, "_search"])?;
        url.query_pairs_mut().append_pair("size", &size.to_string());
        let (status, text) = self
            .send(self.request(Method::POST, url).json(body))
            .await?;
        decode_body(status, &text)
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>, SearchError> {
        let url = self.url(&[index, "_doc", id])?;
        let (status, text) = self.send(self.request(Method::GET, url)).await?;
        decode_document(status, &text)
    }

    async fn cat_indices(&self) -> Result<Value, SearchError> {
        let mut url = self.url(&["_cat", "indices"])?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("v", "true");
        self.get_json(url).await
    }

    async fn cluster_health(&self) -> Result<Value, SearchError> {
        self.get_json(self.url(&["_cluster", "health"])?).await
    }

    async fn get_mapping(&self, index: &str) -> Result<Value, SearchError> {
        self.get_json(self.url(&[index, "_mapping"])?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_config(server: &MockServer) -> OpenSearchConfig {
        let address = server.address();
        OpenSearchConfig::builder()
            .host(address.ip().to_string())
            .port(address.port())
            .use_cookies(true)
            .cookies("security_authentication=abc123; JSESSIONID=xyz")
            .auth_headers("X-Forwarded-User: john.doe, X-Auth-Token: t0k3n")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_search_replays_cookies_and_headers() {
        let server = MockServer::start().await;
        let body = json!({ "query": { "match": { "action": "search" } } });
        Mock::given(method("POST"))
            .and(path("/logs/_search"))
            .and(query_param("size", "10"))
            .and(header("cookie", "security_authentication=abc123; JSESSIONID=xyz"))
            .and(header("x-forwarded-user", "john.doe"))
            .and(header("x-auth-token", "t0k3n"))
            .and(body_json(&body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "took": 3,
                "timed_out": false,
                "hits": { "total": { "value": 1 }, "max_score": 1.0, "hits": [
                    { "_index": "logs", "_id": "1", "_score": 1.0, "_source": { "action": "search" } }
                ] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = SessionTransport::new(&session_config(&server)).unwrap();
        assert_eq!(transport.kind(), TransportKind::Session);
        let response = transport.search("logs", &body, 10).await.unwrap();
        assert_eq!(response["hits"]["hits"][0]["_id"], "1");
    }

    #[tokio::test]
    async fn test_cat_indices_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/_cat/indices"))
            .and(query_param("format", "json"))
            .and(query_param("v", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "index": "logs", "health": "green", "status": "open" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let transport = SessionTransport::new(&session_config(&server)).unwrap();
        let response = transport.cat_indices().await.unwrap();
        assert_eq!(response[0]["index"], "logs");
    }

    #[tokio::test]
    async fn test_document_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/logs/_doc/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_index": "logs", "_id": "abc", "found": true, "_source": { "user": "alice" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/logs/_doc/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "_index": "logs", "_id": "missing", "found": false
            })))
            .mount(&server)
            .await;

        let transport = SessionTransport::new(&session_config(&server)).unwrap();
        let doc = transport.get_document("logs", "abc").await.unwrap().unwrap();
        assert_eq!(doc["_source"]["user"], "alice");
        assert!(transport.get_document("logs", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/_cluster/health"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string("<html><form>SSO login</form></html>"),
            )
            .mount(&server)
            .await;

        let transport = SessionTransport::new(&session_config(&server)).unwrap();
        let err = transport.cluster_health().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "OpenSearch returned 401: Unauthorized"
        );
    }

    #[test]
    fn test_url_segments_are_escaped() {
        let config = OpenSearchConfig::builder().use_cookies(true).build().unwrap();
        let transport = SessionTransport::new(&config).unwrap();
        let url = transport.url(&["logs", "_doc", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9200/logs/_doc/a%2Fb%20c");
    }
}
