use super::AdvisorClient;
use crate::config::AdvisorConfig;
use crate::error::{AppError, Result};
use crate::models::{AdvisorRequest, AdvisorResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Recommendation function reached over HTTP
#[derive(Clone)]
pub struct HttpAdvisorClient {
    pub(crate) client: Client,
    pub(crate) endpoint: String,
    pub(crate) api_key: Option<String>,
    pub(crate) timeout_secs: u64,
}

impl HttpAdvisorClient {
    /// Create a new advisor client
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            timeout_secs,
        })
    }

    /// Build a client from configuration, reading the API key from the named environment variable
    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        if !config.enabled {
            return Err(AppError::Configuration(
                "Advisor is disabled (set advisor.enabled = true)".to_string(),
            ));
        }

        let endpoint = config
            .endpoint
            .clone()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AppError::Configuration("advisor.endpoint is required".to_string()))?;

        let api_key = match &config.api_key_env {
            Some(var) => match std::env::var(var) {
                Ok(key) if !key.is_empty() => Some(key),
                _ => {
                    warn!(env = %var, "Advisor API key variable is not set, sending unauthenticated requests");
                    None
                }
            },
            None => None,
        };

        Self::new(endpoint, api_key, config.timeout_secs)
    }
}

#[async_trait]
impl AdvisorClient for HttpAdvisorClient {
    async fn recommend(&self, request: &AdvisorRequest) -> Result<AdvisorResponse> {
        debug!(
            endpoint = %self.endpoint,
            properties = request.properties.len(),
            "Requesting recommendations"
        );

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("User-Agent", "property-browser/1.0");
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.json(request).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::integration(
                    "advisor",
                    format!("Request timed out after {} seconds", self.timeout_secs),
                )
            } else {
                AppError::integration("advisor", format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            error!(status = %status, "Advisor returned non-success status");
            return Err(AppError::integration(
                "advisor",
                format!(
                    "Non-success status {}: {}",
                    status,
                    if body.is_empty() { "No response body" } else { &body }
                ),
            ));
        }

        Ok(serde_json::from_str(&body)?)
    }
}
