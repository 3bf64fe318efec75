//! HTTP implementation of [`BacklogApi`]

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use super::error::ApiError;
use super::types::{
    Backlog, ClearResponse, ExportFormat, GenerateBacklogRequest, HealthStatus,
    PlanSprintsRequest, UpdateVelocityRequest,
};
use super::BacklogApi;

/// Default API root of a locally running backlog service
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

pub struct HttpBacklogClient {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for HttpBacklogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBacklogClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl HttpBacklogClient {
    /// Create a client for the API rooted at `base_url` (e.g. `http://host:8000/api`)
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, None)
    }

    /// Create a client with an optional per-request timeout
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url =
            Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(ApiError::from_network_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = %status, body = %body, "Backlog service returned an error");
            return Err(ApiError::from_http_status(status, &body));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await.map_err(ApiError::from_network_error)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidPayload(e.to_string()))
    }

    async fn decode_backlog(response: reqwest::Response) -> Result<Backlog, ApiError> {
        let backlog: Backlog = Self::decode(response).await?;
        backlog.validate().map_err(|reason| {
            tracing::warn!(%reason, "Rejected malformed backlog payload");
            ApiError::InvalidPayload(reason)
        })?;
        Ok(backlog)
    }

    async fn post_backlog<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Backlog, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let response = self.send(self.client.post(url).json(body)).await?;
        Self::decode_backlog(response).await
    }
}

#[async_trait]
impl BacklogApi for HttpBacklogClient {
    async fn generate(&self, request: &GenerateBacklogRequest) -> Result<Backlog, ApiError> {
        self.post_backlog("generate-backlog", request).await
    }

    async fn current(&self) -> Result<Backlog, ApiError> {
        let url = self.endpoint("backlog")?;
        tracing::debug!(%url, "GET");
        let response = self.send(self.client.get(url)).await?;
        Self::decode_backlog(response).await
    }

    async fn plan_sprints(&self, request: &PlanSprintsRequest) -> Result<Backlog, ApiError> {
        self.post_backlog("plan-sprints", request).await
    }

    async fn update_velocity(&self, request: &UpdateVelocityRequest) -> Result<Backlog, ApiError> {
        self.post_backlog("update-velocity", request).await
    }

    async fn export(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&format!("export/{}", format.as_str()))?;
        tracing::debug!(%url, "GET");
        let response = self.send(self.client.get(url)).await?;

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.starts_with(format.media_type()) {
                tracing::warn!(
                    expected = format.media_type(),
                    actual = content_type,
                    "Export content type does not match requested format"
                );
            }
        }

        let bytes = response.bytes().await.map_err(ApiError::from_network_error)?;
        Ok(bytes.to_vec())
    }

    async fn clear(&self) -> Result<ClearResponse, ApiError> {
        let url = self.endpoint("backlog")?;
        tracing::debug!(%url, "DELETE");
        let response = self.send(self.client.delete(url)).await?;
        Self::decode(response).await
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        // Health lives at the service root, outside the API prefix
        let url = self.endpoint("/health")?;
        let response = self.send(self.client.get(url)).await?;
        Self::decode(response).await
    }
}
