//! HTTP client shared by the catalog and score provider clients
//!
//! One request per call: no retries, no backoff. Non-success statuses come
//! back as `ApiError::Status` so callers can decide how to degrade.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::infrastructure::config::HttpConfig;

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Headers sent with every request
    pub default_headers: Vec<(String, String)>,
}

impl HttpClientConfig {
    #[must_use]
    pub fn from_http_config(http: &HttpConfig) -> Self {
        Self {
            timeout_seconds: http.timeout_seconds,
            user_agent: http.user_agent.clone(),
            default_headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers.push((name.to_string(), value.to_string()));
        self
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_http_config(&HttpConfig::default())
    }
}

/// JSON-over-HTTP client with a context label for log provenance
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    context_label: &'static str,
}

impl HttpClient {
    pub fn with_config(config: &HttpClientConfig, context_label: &'static str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let invalid = |reason: String| ApiError::InvalidRequest {
                target: format!("header {name}"),
                reason,
            };
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            headers.insert(name, value);
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(|e| ApiError::Transport {
                url: String::new(),
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client, context_label })
    }

    /// GET `url` and decode the JSON body as `T`
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!("🌐 HTTP GET ({}): {}", self.context_label, url);
        self.send_json(url, self.client.get(url)).await
    }

    /// POST `form` url-encoded to `url` and decode the JSON body as `T`
    pub async fn post_form_json<F, T>(&self, url: &str, form: &F) -> Result<T, ApiError>
    where
        F: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("🌐 HTTP POST ({}): {}", self.context_label, url);
        self.send_json(url, self.client.post(url).form(form)).await
    }

    async fn send_json<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("❌ HTTP error {} ({}): {}", status, self.context_label, url);
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            message: format!("Failed to read response body: {e}"),
        })?;

        serde_json::from_slice(&body).map_err(|e| ApiError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
