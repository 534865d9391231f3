//! Level source implementations: remote HTTP API and embedded database.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::db::MazeRepository;
use crate::loader::{LevelSource, SourceError};
use crate::stage::StageSpec;

/// Envelope returned by the level API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelResponse {
    /// Whether the lookup succeeded.
    pub success: bool,
    /// The stage data on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StageSpec>,
    /// Human-readable reason on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fetches stages from the remote level API.
#[derive(Debug, Clone)]
pub struct HttpLevelSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpLevelSource {
    /// Request timeout for a single level fetch.
    const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a source against the given base URL (trailing slash
    /// tolerated).
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Probes the source by fetching stage 1; used as the startup
    /// connection test.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn test_connection(&self) -> bool {
        info!("Testing level server connection");
        match self.fetch(1).await {
            Ok(_) => {
                info!("Level server connection successful");
                true
            }
            Err(e) => {
                warn!(error = %e, "Level server connection failed");
                false
            }
        }
    }
}

#[async_trait]
impl LevelSource for HttpLevelSource {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch(&self, stage_number: u32) -> Result<StageSpec, SourceError> {
        let url = format!("{}/levels/{}", self.base_url, stage_number);
        debug!(url = %url, "Fetching level data");

        let response = self
            .client
            .get(&url)
            .timeout(Self::FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| SourceError::new(e.to_string()))?;

        let body: LevelResponse = response
            .json()
            .await
            .map_err(|e| SourceError::new(format!("invalid response body: {}", e)))?;

        if body.success {
            body.data
                .ok_or_else(|| SourceError::new("response missing stage data"))
        } else {
            Err(SourceError::new(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

/// Reads stages from the embedded database; used by the offline client.
#[derive(Debug, Clone)]
pub struct DbLevelSource {
    repository: MazeRepository,
}

impl DbLevelSource {
    /// Creates a source over the given repository.
    pub fn new(repository: MazeRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl LevelSource for DbLevelSource {
    async fn fetch(&self, stage_number: u32) -> Result<StageSpec, SourceError> {
        match self.repository.get_stage(stage_number) {
            Ok(Some(row)) => Ok(row.to_spec()),
            Ok(None) => Err(SourceError::new(format!("stage {} not found", stage_number))),
            Err(e) => Err(SourceError::new(e.to_string())),
        }
    }
}
