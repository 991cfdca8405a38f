//! Authenticated client for the Storage Box listing endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap};
use serde::Deserialize;

use super::error::ApiError;
use super::types::{StorageBox, StorageBoxesResponse};
use crate::collector::StorageBoxSource;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.hetzner.com/v1";

/// Per-request timeout of the underlying HTTP client (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Response headers that may carry the request id, in lookup order.
const REQUEST_ID_HEADERS: [&str; 2] = ["x-request-id", "x-amzn-requestid"];

/// Error body shape: `{"error": {"message": "...", "code": "..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Hetzner API client for Storage Boxes.
#[derive(Clone)]
pub struct HetznerClient {
    client: Client,
    token: String,
    base_url: String,
}

impl std::fmt::Debug for HetznerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HetznerClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HetznerClient {
    /// Create a client for the production API.
    ///
    /// # Errors
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(Self {
            client,
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API root (e.g. a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Retrieve all Storage Boxes visible to the token.
    pub async fn list_storage_boxes(&self) -> Result<Vec<StorageBox>, ApiError> {
        let url = format!("{}/storage_boxes", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let status = status.as_u16();
            let request_id = request_id(response.headers());
            let message = match response.text().await {
                Ok(body) => error_message(status, &body),
                Err(e) => format!("API request failed: failed to read response body: {e}"),
            };

            return Err(ApiError::Status {
                status,
                message,
                request_id,
            });
        }

        let body = response.bytes().await?;
        let listing: StorageBoxesResponse = serde_json::from_slice(&body)?;

        tracing::debug!(
            url = %url,
            count = listing.storage_boxes.len(),
            "Fetched storage boxes"
        );

        Ok(listing.storage_boxes)
    }
}

#[async_trait]
impl StorageBoxSource for HetznerClient {
    async fn list_storage_boxes(&self) -> Result<Vec<StorageBox>, ApiError> {
        HetznerClient::list_storage_boxes(self).await
    }
}

fn request_id(headers: &HeaderMap) -> Option<String> {
    REQUEST_ID_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// Prefer the API's own error message, then the raw body.
fn error_message(status: u16, body: &str) -> String {
    if body.is_empty() {
        return format!("HTTP {status} error");
    }

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body.to_string(),
    }
}
