//! HTTP client for listing and detail page fetches
//!
//! One request per call, no retries: the pagination driver decides what a
//! failed fetch means, and politeness pauses are applied by the caller.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::errors::{RecallError, RecallResult};
use crate::domain::services::PageFetcher;
use crate::infrastructure::config::{HttpConfig, defaults};

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Whether to follow redirects
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    pub fn from_http_config(http: &HttpConfig) -> Self {
        Self {
            timeout_seconds: http.request_timeout_seconds,
            user_agent: http.user_agent.clone(),
            follow_redirects: http.follow_redirects,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
            follow_redirects: true,
        }
    }
}

/// Page fetcher over a shared `reqwest` client
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    /// Optional context label for provenance in logs (e.g., "listing", "detail")
    context_label: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: &HttpClientConfig) -> RecallResult<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| RecallError::config("http", format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            context_label: None,
        })
    }

    pub fn from_http_config(http: &HttpConfig) -> RecallResult<Self> {
        Self::with_config(&HttpClientConfig::from_http_config(http))
    }

    /// Set a human-readable context label for logging provenance (returns self for chaining)
    pub fn with_context_label(mut self, label: &str) -> Self {
        self.context_label = Some(label.to_string());
        self
    }

    /// Fetch HTML content as a string; only HTTP 200 counts as success
    pub async fn fetch_html_string(&self, url: &str) -> RecallResult<String> {
        match &self.context_label {
            Some(label) => info!("🌐 HTTP GET ({}): {}", label, url),
            None => info!("🌐 HTTP GET: {}", url),
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RecallError::transport(url, e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("❌ HTTP error {}: {}", status, url);
            return Err(RecallError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RecallError::transport(url, format!("Failed to read response body: {e}")))?;

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> RecallResult<String> {
        self.fetch_html_string(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(HttpClient::with_config(&HttpClientConfig::default()).is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = HttpClientConfig {
            timeout_seconds: 10,
            user_agent: "Test Agent".to_string(),
            follow_redirects: false,
        };
        let client = HttpClient::with_config(&config).map(|c| c.with_context_label("detail"));
        assert!(client.is_ok());
    }

    #[test]
    fn config_is_derived_from_app_settings() {
        let http = HttpConfig {
            request_timeout_seconds: 5,
            user_agent: "ua".into(),
            follow_redirects: false,
        };
        let config = HttpClientConfig::from_http_config(&http);
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.user_agent, "ua");
        assert!(!config.follow_redirects);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let config = HttpClientConfig {
            timeout_seconds: 2,
            ..Default::default()
        };
        let client = HttpClient::with_config(&config).unwrap();
        let err = client.fetch("http://127.0.0.1:9/categorie/94/1").await.unwrap_err();
        assert!(err.is_transport());
    }
}
