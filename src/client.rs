//! arXiv API client: sends prepared requests and hands the bodies to the parsers.
//!
//! Each call issues exactly one GET. There is no retry, rate limiting or
//! pagination here; callers that need them drive [`ArxivClient::search`]
//! themselves.

use url::Url;

use crate::config::Config;
use crate::error::ArxivError;
use crate::feed::{parse_feed, ArxivFeed};
use crate::models::{PreparedRequest, QueryBuilder, TaxonomyRow, ARXIV_API_URL};
use crate::taxonomy::{parse_category_taxonomy, CATEGORY_TAXONOMY_URL};
use crate::utils::HttpClient;

/// arXiv API client
#[derive(Debug, Clone)]
pub struct ArxivClient {
    client: HttpClient,
    query_url: Url,
    taxonomy_url: Url,
}

impl ArxivClient {
    /// Create a client for the public arXiv endpoints
    pub fn new() -> Result<Self, ArxivError> {
        Ok(Self {
            client: HttpClient::new()?,
            query_url: Url::parse(ARXIV_API_URL)?,
            taxonomy_url: Url::parse(CATEGORY_TAXONOMY_URL)?,
        })
    }

    /// Create a client from the `[api]` configuration section
    pub fn from_config(config: &Config) -> Result<Self, ArxivError> {
        let client = HttpClient::with_settings(&config.api.user_agent, config.api.timeout())?;
        Self::with_endpoints(client, &config.api.query_url, &config.api.taxonomy_url)
    }

    /// Create with a custom HTTP client and endpoints (for testing)
    pub fn with_endpoints(
        client: HttpClient,
        query_url: &str,
        taxonomy_url: &str,
    ) -> Result<Self, ArxivError> {
        Ok(Self {
            client,
            query_url: Url::parse(query_url)?,
            taxonomy_url: Url::parse(taxonomy_url)?,
        })
    }

    pub fn query_url(&self) -> &Url {
        &self.query_url
    }

    pub fn taxonomy_url(&self) -> &Url {
        &self.taxonomy_url
    }

    /// Build the request `query` would send, without sending it
    pub fn prepare(&self, query: &QueryBuilder) -> Result<PreparedRequest, ArxivError> {
        query.build_request_for(&self.query_url)
    }

    /// Send a prepared request and return the response body
    pub async fn send(&self, request: &PreparedRequest) -> Result<String, ArxivError> {
        tracing::debug!("Sending {}", request);

        let response = self
            .client
            .client()
            .request(request.method().clone(), request.url().clone())
            .header("Accept", "application/atom+xml")
            .send()
            .await
            .map_err(|e| ArxivError::Network(format!("Failed to fetch arXiv results: {}", e)))?;

        if !response.status().is_success() {
            return Err(ArxivError::Api(format!(
                "arXiv API returned status: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ArxivError::Network(format!("Failed to read response: {}", e)))
    }

    /// Run one search and parse the returned feed
    pub async fn search(&self, query: &QueryBuilder) -> Result<ArxivFeed, ArxivError> {
        let request = self.prepare(query)?;
        let body = self.send(&request).await?;
        let feed = parse_feed(&body)?;

        tracing::info!(
            "arXiv returned {} entries ({} skipped) of {} total",
            feed.entries.len(),
            feed.skipped,
            feed.total_results
                .map(|total| total.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );

        Ok(feed)
    }

    /// Fetch and parse the category taxonomy page
    pub async fn fetch_category_taxonomy(&self) -> Result<Vec<TaxonomyRow>, ArxivError> {
        tracing::debug!("Fetching category taxonomy from {}", self.taxonomy_url);

        let response = self
            .client
            .get(self.taxonomy_url.clone())
            .header("Accept", "text/html")
            .send()
            .await
            .map_err(|e| {
                ArxivError::Network(format!("Failed to fetch category taxonomy: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(ArxivError::Api(format!(
                "arXiv taxonomy page returned status: {}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ArxivError::Network(format!("Failed to read HTML: {}", e)))?;

        Ok(parse_category_taxonomy(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let client = ArxivClient::new().unwrap();
        assert_eq!(client.query_url().as_str(), ARXIV_API_URL);
        assert_eq!(client.taxonomy_url().as_str(), CATEGORY_TAXONOMY_URL);
    }

    #[test]
    fn test_prepare_uses_configured_endpoint() {
        let mut config = Config::default();
        config.api.query_url = "http://127.0.0.1:9/api/query".to_string();

        let client = ArxivClient::from_config(&config).unwrap();
        let request = client
            .prepare(&QueryBuilder::ids(["2301.12345"]))
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://127.0.0.1:9/api/query?id_list=2301.12345&start=0&max_results=10"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let client = HttpClient::new().unwrap();
        let result = ArxivClient::with_endpoints(client, "not a url", CATEGORY_TAXONOMY_URL);
        assert!(matches!(result, Err(ArxivError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_prepare_rejects_invalid_query() {
        let client = ArxivClient::new().unwrap();
        let result = client.search(&QueryBuilder::new()).await;
        assert!(matches!(result, Err(ArxivError::InvalidInput(_))));
    }
}
