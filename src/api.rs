use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Spot counts for one parking lot, as computed by the occupancy backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingSpotSummary {
    pub total_spots: u32,
    pub occupied_spots: u32,
    /// Reported by the backend; not recomputed from the other counts
    pub vacant_spots: u32,
    /// Percentage in `[0, 100]`
    pub occupancy_rate: f64,
    pub occupied_spot_index: Vec<u32>,
}

/// Response envelope returned by `GET /process<endpoint>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub result: ParkingSpotSummary,
}

/// Anything that can produce occupancy snapshots for a lot endpoint
#[async_trait]
pub trait SummarySource: Send + Sync {
    /// Fetch one snapshot. `None` means the fetch failed and was logged.
    async fn fetch_data(&self, endpoint: &str) -> Option<ApiResponse>;
}

/// Client for the occupancy backend
#[derive(Debug, Clone)]
pub struct OccupancyClient {
    client: Client,
    base_url: String,
}

impl OccupancyClient {
    /// Create a new client against `base_url` (e.g. `http://127.0.0.1:8000`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a lot endpoint such as `/?process=AA+Lot+North+2`
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/process{}", self.base_url, endpoint)
    }

    /// Perform one GET and decode the response, reporting which step failed
    pub async fn try_fetch_data(&self, endpoint: &str) -> Result<ApiResponse, FetchError> {
        let url = self.url_for(endpoint);
        tracing::debug!("Fetching data from: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let json: ApiResponse = serde_json::from_slice(&body)?;
        tracing::debug!("Fetched JSON: {:?}", json);

        Ok(json)
    }

    /// Download a document (the campus parking map) into memory
    pub async fn fetch_document(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Fetching document from: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to request {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP Error {} fetching {}", status.as_u16(), url);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read document body")?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SummarySource for OccupancyClient {
    async fn fetch_data(&self, endpoint: &str) -> Option<ApiResponse> {
        match self.try_fetch_data(endpoint).await {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::warn!("API Error: {}", e);
                None
            }
        }
    }
}
