//! Elasticsearch search index over the REST API.

use super::SearchIndex;
use crate::error::{Error, Result};
use crate::query::{dsl, QueryDescriptor};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

/// Configuration for the Elasticsearch index.
#[derive(Clone, Debug)]
pub struct ElasticConfig {
    /// Base URL, e.g. `http://127.0.0.1:9200`
    pub url: String,
    /// Per-request timeout. Expiry surfaces as `Error::BackendError`.
    pub timeout: Duration,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        ElasticConfig {
            url: "http://127.0.0.1:9200".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Elasticsearch-backed search index.
///
/// # Example
///
/// ```no_run
/// # use catalog_kit::index::{ElasticConfig, ElasticIndex, SearchIndex};
/// # use catalog_kit::error::Result;
/// # async fn example() -> Result<()> {
/// let index = ElasticIndex::new(ElasticConfig::default())?;
/// let doc = index.get("movies", "42").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ElasticIndex {
    client: Client,
    base_url: Url,
}

impl ElasticIndex {
    /// Create a new client. No request is made until first use.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` for an unparsable URL, `Error::BackendError`
    /// if the HTTP client cannot be built.
    pub fn new(config: ElasticConfig) -> Result<Self> {
        let base_url = Url::parse(&config.url)
            .map_err(|e| Error::ConfigError(format!("Invalid Elasticsearch URL {}: {}", config.url, e)))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::BackendError(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            "✓ Elasticsearch index initialized: {} (timeout: {:?})",
            base_url, config.timeout
        );

        Ok(ElasticIndex { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::ConfigError(format!("Cannot route requests to {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl SearchIndex for ElasticIndex {
    async fn get(&self, index: &str, id: &str) -> Result<Option<Value>> {
        let url = self.endpoint(&[index, "_doc", id])?;
        let what = format!("GET {}/{}", index, id);
        let response = self.client.get(url).send().await?;

        if !document_status(response.status(), &what)? {
            debug!("✓ Elasticsearch {} -> ABSENT", what);
            return Ok(None);
        }

        let document = source_of(decode_body(&response.bytes().await?, &what)?);
        debug!(
            "✓ Elasticsearch {} -> {}",
            what,
            if document.is_some() { "FOUND" } else { "ABSENT" }
        );
        Ok(document)
    }

    async fn search(&self, index: &str, query: &QueryDescriptor) -> Result<Vec<Value>> {
        let url = self.endpoint(&[index, "_search"])?;
        let what = format!("SEARCH {}", index);
        let body = dsl::search_body(query);
        trace!("Elasticsearch {} body: {}", what, body);

        let response = self.client.post(url).json(&body).send().await?;
        search_status(response.status(), &what)?;

        let hits = hits_of(decode_body(&response.bytes().await?, &what)?)?;
        debug!("✓ Elasticsearch {} -> {} hits", what, hits.len());
        Ok(hits)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = self.endpoint(&["_cluster", "health"])?;
        let response = self.client.get(url).send().await?;
        Ok(response.status().is_success())
    }
}

/// Status of a get-document request: `true` for a document, `false` for a 404.
fn document_status(status: StatusCode, what: &str) -> Result<bool> {
    if status == StatusCode::NOT_FOUND {
        Ok(false)
    } else {
        search_status(status, what).map(|()| true)
    }
}

/// Any non-2xx status is a failed exchange, including 404 for a missing index.
fn search_status(status: StatusCode, what: &str) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::BackendError(format!(
            "Elasticsearch {} returned {}",
            what, status
        )))
    }
}

/// A response body that is not JSON is a broken exchange, not a bad record.
fn decode_body(bytes: &[u8], what: &str) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| {
        Error::BackendError(format!("Elasticsearch {} sent an undecodable body: {}", what, e))
    })
}

/// `_source` of a get-document response, if the document was found.
fn source_of(mut body: Value) -> Option<Value> {
    if body.get("found").and_then(Value::as_bool) == Some(false) {
        return None;
    }
    body.get_mut("_source").map(Value::take)
}

/// `_source` of every hit in a search response, in rank order.
fn hits_of(mut body: Value) -> Result<Vec<Value>> {
    let hits = body
        .pointer_mut("/hits/hits")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| Error::BackendError("Elasticsearch response has no hits.hits".to_string()))?;

    Ok(hits
        .iter_mut()
        .filter_map(|hit| hit.get_mut("_source").map(Value::take))
        .collect())
}
