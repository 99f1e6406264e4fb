use async_trait::async_trait;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::traits::{IndexRequest, IndexResponse, IndexingClient, WriteResult};
use crate::config::ElasticsearchConfig;
use crate::error::{ClientError, ConfigError, Result};

/// How requests authenticate against the cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthMethod {
    #[default]
    None,
    Basic {
        username: String,
        password: String,
    },
    ApiKey {
        id: String,
        api_key: String,
    },
}

/// Elasticsearch REST client for single-document writes
pub struct HttpClient {
    base_url: Url,
    auth: AuthMethod,
    timeout: Option<Duration>,
    refresh: bool,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: Url) -> std::result::Result<Self, ConfigError> {
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            auth: AuthMethod::None,
            timeout: None,
            refresh: false,
            client: reqwest::Client::new(),
        })
    }

    pub fn from_config(config: &ElasticsearchConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self::new(config.base_url()?)?
            .with_auth(config.auth.clone())
            .with_timeout(Duration::from_secs(config.timeout_secs))
            .with_refresh(config.refresh))
    }

    pub fn with_auth(mut self, auth: AuthMethod) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Ask the cluster to refresh the index after each write so the
    /// document is immediately searchable.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn document_url(&self, request: &IndexRequest) -> Url {
        let mut url = self.base_url.clone();
        // new() rejects cannot-be-a-base URLs, so path_segments_mut succeeds
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([&request.index, &request.doc_type, &request.id]);
        }
        if self.refresh {
            url.query_pairs_mut().append_pair("refresh", "true");
        }
        url
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            AuthMethod::None => builder,
            AuthMethod::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
            AuthMethod::ApiKey { id, api_key } => {
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", id, api_key));
                builder.header(AUTHORIZATION, format!("ApiKey {}", encoded))
            }
        }
    }
}

/// Successful single-document index response. `_type` is absent on
/// typeless clusters and `result` is absent before 5.x, which report
/// `created` instead.
#[derive(Debug, Deserialize)]
struct IndexAck {
    #[serde(rename = "_index")]
    index: String,
    #[serde(rename = "_type")]
    doc_type: Option<String>,
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_version", default = "default_version")]
    version: u64,
    result: Option<String>,
    created: Option<bool>,
}

fn default_version() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Structured {
        #[serde(rename = "type")]
        error_type: String,
        reason: String,
    },
    Message(String),
}

fn rejection(status: StatusCode, body: &str) -> ClientError {
    let (error_type, reason) = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: ErrorDetail::Structured { error_type, reason },
        }) => (error_type, reason),
        Ok(ErrorBody {
            error: ErrorDetail::Message(message),
        }) => ("http_error".to_string(), message),
        Err(_) if !body.trim().is_empty() => ("http_error".to_string(), body.trim().to_string()),
        Err(_) => (
            "http_error".to_string(),
            status.canonical_reason().unwrap_or("unknown").to_string(),
        ),
    };
    ClientError::Rejected {
        status: status.as_u16(),
        error_type,
        reason,
    }
}

fn write_result(ack: &IndexAck, status: StatusCode) -> WriteResult {
    match (ack.result.as_deref(), ack.created) {
        (Some("updated"), _) => WriteResult::Updated,
        (Some(_), _) => WriteResult::Created,
        (None, Some(true)) => WriteResult::Created,
        (None, Some(false)) => WriteResult::Updated,
        (None, None) if status == StatusCode::CREATED => WriteResult::Created,
        (None, None) => WriteResult::Updated,
    }
}

#[async_trait]
impl IndexingClient for HttpClient {
    async fn index(&self, request: IndexRequest) -> Result<IndexResponse> {
        let url = self.document_url(&request);
        tracing::debug!(
            index = %request.index,
            doc_type = %request.doc_type,
            id = %request.id,
            "PUT {}",
            url
        );

        let mut builder = self.authorize(self.client.put(url).json(&request.source));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(status = status.as_u16(), "Cluster refused credentials");
            return Err(ClientError::Auth {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(status = status.as_u16(), "Failed to read error body: {}", e);
                    String::new()
                }
            };
            let err = rejection(status, &body);
            tracing::warn!(index = %request.index, id = %request.id, "{}", err);
            return Err(err);
        }

        let bytes = response.bytes().await?;
        let ack: IndexAck = serde_json::from_slice(&bytes)?;
        let result = write_result(&ack, status);

        Ok(IndexResponse {
            index: ack.index,
            doc_type: ack.doc_type.unwrap_or(request.doc_type),
            id: ack.id,
            version: ack.version,
            result,
        })
    }

    fn backend_name(&self) -> &str {
        "elasticsearch"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn test_document_url_joins_segments() {
        let req = IndexRequest::new("migrations-test", "kv", "0002-java");
        let url = client("http://localhost:9200").document_url(&req);
        assert_eq!(url.as_str(), "http://localhost:9200/migrations-test/kv/0002-java");
    }

    #[test]
    fn test_document_url_keeps_base_path() {
        let req = IndexRequest::new("idx", "kv", "a b");
        let url = client("http://proxy:8080/es/").document_url(&req);
        assert_eq!(url.as_str(), "http://proxy:8080/es/idx/kv/a%20b");
    }

    #[test]
    fn test_document_url_with_refresh() {
        let req = IndexRequest::new("idx", "kv", "1");
        let url = client("http://localhost:9200").with_refresh(true).document_url(&req);
        assert_eq!(url.as_str(), "http://localhost:9200/idx/kv/1?refresh=true");
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = HttpClient::new(Url::parse("mailto:ops@example.com").unwrap());
        assert!(matches!(err, Err(ConfigError::UnsupportedUrl(_))));
    }

    #[test]
    fn test_rejection_parses_structured_error() {
        let body = r#"{"error":{"root_cause":[],"type":"mapper_parsing_exception","reason":"failed to parse"},"status":400}"#;
        match rejection(StatusCode::BAD_REQUEST, body) {
            ClientError::Rejected {
                status,
                error_type,
                reason,
            } => {
                assert_eq!(status, 400);
                assert_eq!(error_type, "mapper_parsing_exception");
                assert_eq!(reason, "failed to parse");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejection_falls_back_to_status_reason() {
        match rejection(StatusCode::SERVICE_UNAVAILABLE, "") {
            ClientError::Rejected { reason, .. } => assert_eq!(reason, "Service Unavailable"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_write_result_from_legacy_created_flag() {
        let ack: IndexAck = serde_json::from_str(
            r#"{"_index":"i","_type":"kv","_id":"1","_version":3,"created":false}"#,
        )
        .unwrap();
        assert_eq!(write_result(&ack, StatusCode::OK), WriteResult::Updated);
        assert_eq!(ack.version, 3);
    }
}
