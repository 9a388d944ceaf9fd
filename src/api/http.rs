//! HTTP implementation of the explorer API.
//!
//! Uses reqwest with a per-request timeout so a hung backend eventually
//! settles instead of leaving the view loading forever.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::types::{DbInfo, QueryRequest, QueryResponse};
use super::{ExplorerApi, DB_INFO_PATH, QUERY_PATH};
use crate::config::{parse_base_url, ApiConfig};
use crate::error::{AppError, Result};

/// Explorer API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpExplorerApi {
    base_url: Url,
    client: Client,
}

impl HttpExplorerApi {
    /// Creates a client for the given base URL and timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        if timeout.is_zero() {
            // reqwest would time out every request immediately
            return Err(AppError::config("Request timeout must be non-zero"));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { base_url, client })
    }

    /// Creates a client from the API section of the configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins an absolute API path onto the base URL, keeping any path
    /// prefix the base URL already has.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    fn map_send_error(e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::http("Request timed out")
        } else if e.is_connect() {
            AppError::http(format!("Failed to connect to explorer API: {e}"))
        } else {
            AppError::http(format!("Request failed: {e}"))
        }
    }
}

#[async_trait]
impl ExplorerApi for HttpExplorerApi {
    async fn db_info(&self) -> Result<DbInfo> {
        let url = self.endpoint(DB_INFO_PATH);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::http(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(AppError::http(format!(
                "Explorer API error ({status}): {body}"
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::decode(format!("Failed to parse database info: {e}")))
    }

    async fn query(&self, question: &str) -> Result<QueryResponse> {
        let url = self.endpoint(QUERY_PATH);
        debug!("POST {} ({} chars)", url, question.len());

        let response = self
            .client
            .post(&url)
            .json(&QueryRequest { question })
            .send()
            .await
            .map_err(Self::map_send_error)?;

        // The body is decoded whatever the status code says.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::http(format!("Failed to read response: {e}")))?;
        debug!("Query response status {}", status);

        QueryResponse::from_json(&body)
    }
}
