//! Remote-control mode: consume externally sourced movement events.
//!
//! An optional background listener polls a movement feed and forwards
//! directions into the game loop's channel. The listener is cleanly
//! cancelable: stopping signals the worker and waits briefly for it to
//! finish.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::maze::Direction;

/// One externally sourced movement message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteMovement {
    /// Requested movement direction.
    pub direction: Direction,
    /// Sender's player column at send time.
    pub player_x: i32,
    /// Sender's player row at send time.
    pub player_y: i32,
    /// Stage the sender was playing.
    pub stage: u32,
    /// When the movement was sent.
    pub timestamp: DateTime<Utc>,
}

/// Error from a movement feed poll.
#[derive(Debug, Clone, Display, Error)]
#[display("Movement feed error: {reason}")]
pub struct FeedError {
    /// Human-readable reason the poll failed.
    pub reason: String,
}

impl FeedError {
    /// Creates a new feed error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Yields externally sourced movements, one per poll.
///
/// Receiving a movement consumes it from the feed.
#[async_trait]
pub trait MovementFeed: Send + Sync {
    /// Returns the next pending movement, or `None` if the feed is empty.
    async fn next_movement(&self) -> Result<Option<RemoteMovement>, FeedError>;
}

/// Polls the level server's movement queue over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMovementFeed {
    base_url: String,
    client: reqwest::Client,
}

impl HttpMovementFeed {
    /// Creates a feed against the given server base URL.
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MovementFeed for HttpMovementFeed {
    async fn next_movement(&self) -> Result<Option<RemoteMovement>, FeedError> {
        let url = format!("{}/movements/next", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::new(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(FeedError::new(format!("HTTP {}", response.status())));
        }

        let movement: RemoteMovement = response
            .json()
            .await
            .map_err(|e| FeedError::new(format!("invalid movement body: {}", e)))?;
        Ok(Some(movement))
    }
}

/// Gap between polls when the feed is empty.
const EMPTY_POLL_DELAY: Duration = Duration::from_millis(500);

/// Back-off after a failed poll.
const ERROR_POLL_DELAY: Duration = Duration::from_secs(1);

/// How long [`MovementListener::stop`] waits for the worker to exit.
const STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Background worker that polls a feed and forwards directions to the game
/// loop.
pub struct MovementListener {
    shutdown: watch::Sender<bool>,
    worker: JoinHandle<()>,
}

impl MovementListener {
    /// Starts the listener on its own task. Forwarded directions arrive on
    /// the receiving end of `tx`.
    #[instrument(skip_all)]
    pub fn start(feed: Arc<dyn MovementFeed>, tx: mpsc::UnboundedSender<Direction>) -> Self {
        let (shutdown, mut signal) = watch::channel(false);

        let worker = tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = signal.changed() => {
                        if changed.is_err() || *signal.borrow() {
                            break;
                        }
                    }
                    polled = feed.next_movement() => match polled {
                        Ok(Some(movement)) => {
                            debug!(direction = %movement.direction, stage = movement.stage, "Remote movement received");
                            if tx.send(movement.direction).is_err() {
                                // Game loop is gone; nothing left to feed.
                                break;
                            }
                        }
                        Ok(None) => tokio::time::sleep(EMPTY_POLL_DELAY).await,
                        Err(e) => {
                            warn!(error = %e, "Movement feed poll failed");
                            tokio::time::sleep(ERROR_POLL_DELAY).await;
                        }
                    }
                }
            }
            debug!("Movement listener worker exiting");
        });

        info!("Movement listener started");
        Self { shutdown, worker }
    }

    /// Signals the worker to exit and waits up to two seconds for it.
    #[instrument(skip(self))]
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if tokio::time::timeout(STOP_TIMEOUT, self.worker).await.is_err() {
            warn!("Movement listener did not stop in time");
        } else {
            info!("Movement listener stopped");
        }
    }
}
