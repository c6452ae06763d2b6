//! Credentialed transport backed by the `opensearch` client.

use async_trait::async_trait;
use opensearch::auth::{ClientCertificate, Credentials};
use opensearch::cat::CatIndicesParts;
use opensearch::cert::CertificateValidation;
use opensearch::cluster::ClusterHealthParts;
use opensearch::http::headers::{HeaderMap, HeaderName, HeaderValue};
use opensearch::http::response::Response;
use opensearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use opensearch::http::Url;
use opensearch::indices::IndicesGetMappingParts;
use opensearch::{GetParts, OpenSearch, SearchParts};
use serde_json::Value;
use tracing::debug;

use super::{SearchTransport, decode_body, decode_document};
use crate::config::{OpenSearchConfig, TransportKind};
use crate::error::{ConfigError, SearchError};

/// Transport using the official client with basic or certificate auth.
pub struct ClientTransport {
    client: OpenSearch,
}

impl ClientTransport {
    /// Builds the client from `config`.
    ///
    /// Basic credentials take precedence when both they and a client
    /// certificate are configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL, headers or certificate are invalid, or
    /// the underlying HTTP client cannot be built.
    pub fn new(config: &OpenSearchConfig) -> crate::error::Result<Self> {
        let base_url = config.base_url();
        let url = Url::parse(&base_url).map_err(|_| ConfigError::InvalidUrl(base_url.clone()))?;

        let mut builder = TransportBuilder::new(SingleNodeConnectionPool::new(url))
            .timeout(config.timeout)
            .disable_proxy();

        if let Some((user, pass)) = config.credentials() {
            builder = builder.auth(Credentials::Basic(user.to_string(), pass.to_string()));
        } else if let Some(path) = &config.client_cert {
            let pem = std::fs::read(path).map_err(|source| ConfigError::ClientCert {
                path: path.clone(),
                source,
            })?;
            builder = builder.auth(Credentials::Certificate(ClientCertificate::Pem(pem)));
        }

        if !config.verify_certs {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if !config.auth_headers.is_empty() {
            builder = builder.headers(header_map(&config.auth_headers)?);
        }

        let transport = builder
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        debug!(url = %base_url, "created OpenSearch client transport");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ConfigError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader(name.clone()))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Reads the body and maps non-success statuses.
async fn read_json(response: Response) -> Result<Value, SearchError> {
    let status = response.status_code().as_u16();
    let text = response.text().await?;
    decode_body(status, &text)
}

#[async_trait]
impl SearchTransport for ClientTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Client
    }

    async fn search(&self, index: &str, body: &Value, size: u32) -> Result<Value, SearchError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .size(i64::from(size))
            .body(body.clone())
            .send()
            .await?;
        read_json(response).await
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>, SearchError> {
        let response = self.client.get(GetParts::IndexId(index, id)).send().await?;
        let status = response.status_code().as_u16();
        let text = response.text().await?;
        decode_document(status, &text)
    }

    async fn cat_indices(&self) -> Result<Value, SearchError> {
        let response = self
            .client
            .cat()
            .indices(CatIndicesParts::None)
            .format("json")
            .v(true)
            .send()
            .await?;
        read_json(response).await
    }

    async fn cluster_health(&self) -> Result<Value, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await?;
        read_json(response).await
    }

    async fn get_mapping(&self, index: &str) -> Result<Value, SearchError> {
        let response = self
            .client
            .indices()
            .get_mapping(IndicesGetMappingParts::Index(&[index]))
            .send()
            .await?;
        read_json(response).await
    }
}
