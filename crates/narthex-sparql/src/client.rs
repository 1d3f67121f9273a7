//! SPARQL protocol client and the endpoint abstraction shared by queries and mutations.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde::Deserialize;

use narthex_core::OrgId;

use crate::results::{self, QueryResults};

const RESULTS_ACCEPT: &str =
    "application/sparql-results+json, application/sparql-results+xml;q=0.9";

/// Errors from SPARQL operations.
#[derive(Debug, thiserror::Error)]
pub enum SparqlError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SPARQL endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid endpoint URL: {0}")]
    Endpoint(String),

    #[error("Failed to parse JSON results: {0}")]
    Json(String),

    #[error("Failed to parse XML results: {0}")]
    Xml(String),

    #[error("Unexpected results: {0}")]
    UnexpectedResults(String),

    #[error("Store error: {0}")]
    Store(String),
}

/// Configuration for reaching the triple store.
///
/// Loaded from the `[sparql]` section of `narthex.toml` or
/// `NARTHEX__SPARQL__*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlConfig {
    /// Server root; datasets live at `{base_url}/{org_id}`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Unset means wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:3030".to_string()
}

impl Default for SparqlConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

/// Anything that can answer SPARQL queries and apply SPARQL updates.
///
/// [`SparqlClient`] talks to a live store over HTTP; the in-memory
/// `MemoryEndpoint` (feature `memory`) evaluates the same text locally.
pub trait SparqlEndpoint {
    /// Run a SELECT or ASK query.
    fn query(&self, query: &str) -> impl Future<Output = Result<QueryResults, SparqlError>> + Send;

    /// Apply an update and return the raw response body.
    fn update(&self, update: &str) -> impl Future<Output = Result<String, SparqlError>> + Send;
}

/// HTTP client bound to one organization's dataset.
///
/// Clone is cheap (the inner `reqwest::Client` is reference-counted).
#[derive(Debug, Clone)]
pub struct SparqlClient {
    http: reqwest::Client,
    query_url: Url,
    update_url: Url,
}

impl SparqlClient {
    /// Build a client for `org_id`'s `/sparql` and `/update` services.
    pub fn new(config: &SparqlConfig, org_id: &OrgId) -> Result<Self, SparqlError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        let query_url = endpoint_url(&config.base_url, org_id, "sparql")?;
        let update_url = endpoint_url(&config.base_url, org_id, "update")?;

        tracing::info!(
            org_id = %org_id,
            query_url = %query_url,
            update_url = %update_url,
            "SPARQL endpoints configured"
        );
        Ok(Self {
            http,
            query_url,
            update_url,
        })
    }

    pub fn query_url(&self) -> &Url {
        &self.query_url
    }

    pub fn update_url(&self) -> &Url {
        &self.update_url
    }

    /// Check that the query service answers `ASK {}`.
    pub async fn ping(&self) -> Result<bool, SparqlError> {
        let results = self.query("ASK {}").await?;
        results
            .boolean
            .ok_or_else(|| SparqlError::UnexpectedResults("ASK returned no boolean".to_string()))
    }
}

impl SparqlEndpoint for SparqlClient {
    async fn query(&self, query: &str) -> Result<QueryResults, SparqlError> {
        tracing::debug!(url = %self.query_url, "Sending SPARQL query");
        let response = self
            .http
            .post(self.query_url.clone())
            .header(CONTENT_TYPE, "application/sparql-query")
            .header(ACCEPT, RESULTS_ACCEPT)
            .body(query.to_string())
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SparqlError::Status {
                status: status.as_u16(),
                body,
            });
        }
        results::parse_results(&content_type, &body)
    }

    async fn update(&self, update: &str) -> Result<String, SparqlError> {
        tracing::debug!(url = %self.update_url, "Sending SPARQL update");
        let response = self
            .http
            .post(self.update_url.clone())
            .header(CONTENT_TYPE, "application/sparql-update")
            .body(update.to_string())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SparqlError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// `{base_url}/{org_id}/{service}`, with `org_id` percent-encoded as one path segment.
pub fn endpoint_url(base_url: &str, org_id: &OrgId, service: &str) -> Result<Url, SparqlError> {
    let mut url =
        Url::parse(base_url).map_err(|e| SparqlError::Endpoint(format!("{base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| SparqlError::Endpoint(format!("{base_url}: cannot be a base URL")))?
        .pop_if_empty()
        .push(org_id.as_str())
        .push(service);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(raw: &str) -> OrgId {
        OrgId::parse(raw).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = SparqlConfig::default();
        assert_eq!(config.base_url, "http://localhost:3030");
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn test_endpoint_url_default_server() {
        let url = endpoint_url("http://localhost:3030", &org("brabant"), "sparql").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3030/brabant/sparql");

        let url = endpoint_url("http://localhost:3030/", &org("brabant"), "update").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3030/brabant/update");
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let url = endpoint_url("https://store.example.org/fuseki/", &org("org1"), "sparql").unwrap();
        assert_eq!(url.as_str(), "https://store.example.org/fuseki/org1/sparql");
    }

    #[test]
    fn test_endpoint_url_encodes_org_segment() {
        let url = endpoint_url("http://localhost:3030", &org("müller?x#y"), "sparql").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3030/m%C3%BCller%3Fx%23y/sparql"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_dataset_segment_for_dotted_names() {
        let url = endpoint_url("http://localhost:3030/fuseki", &org("org.v2"), "sparql").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3030/fuseki/org.v2/sparql");

        assert!(OrgId::parse("..").is_err());
        assert!(OrgId::parse(".").is_err());
    }

    #[test]
    fn test_endpoint_url_rejects_bad_base() {
        let err = endpoint_url("not a url", &org("org1"), "sparql").unwrap_err();
        assert!(matches!(err, SparqlError::Endpoint(_)));

        let err = endpoint_url("mailto:admin@example.org", &org("org1"), "sparql").unwrap_err();
        assert!(matches!(err, SparqlError::Endpoint(_)));
    }

    #[test]
    fn test_client_urls() {
        let config = SparqlConfig {
            base_url: "http://store:3030".to_string(),
            timeout_secs: Some(5),
        };
        let client = SparqlClient::new(&config, &org("org1")).unwrap();
        assert_eq!(client.query_url().as_str(), "http://store:3030/org1/sparql");
        assert_eq!(client.update_url().as_str(), "http://store:3030/org1/update");
    }
}
