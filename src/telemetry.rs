//! Gameplay analytics: lifecycle events published off the critical path.
//!
//! The game loop hands events to a [`TelemetryEmitter`], which queues them on
//! a bounded channel drained by a background worker. The producer never
//! blocks and never observes sink failures; lost events are acceptable, a
//! stalled sink is not allowed to stall movement.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// A gameplay lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A new play-through began.
    GameStart,
    /// A stage was completed.
    LevelComplete {
        /// The completed stage.
        stage_number: u32,
        /// Seconds from stage entry to completion, frozen at detection.
        time_taken: f64,
        /// Accepted moves made during the stage.
        moves_count: u32,
    },
    /// The final stage was completed.
    GameComplete {
        /// Seconds across the whole play-through.
        total_time: f64,
        /// Accepted moves across all stages.
        total_moves: u64,
    },
}

/// Envelope pairing an event with its player and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Identifier of the player the event belongs to.
    pub player_id: String,
    /// The event payload; its kind tag and fields are flattened inline.
    #[serde(flatten)]
    pub event: GameEvent,
    /// When the event was produced.
    pub timestamp: DateTime<Utc>,
}

/// Error returned by a sink publish attempt.
#[derive(Debug, Clone, Display, Error)]
#[display("Telemetry publish failed: {reason}")]
pub struct SinkError {
    /// Human-readable reason the publish failed.
    pub reason: String,
}

impl SinkError {
    /// Creates a new sink error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Accepts analytics events, best effort.
///
/// Publish results are observed for logging only; callers never retry
/// synchronously or block gameplay on the outcome.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publishes one event envelope.
    async fn publish(&self, event: &EventEnvelope) -> Result<(), SinkError>;
}

/// Sink that discards every event; used by the offline client.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn publish(&self, _event: &EventEnvelope) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that posts envelopes to the level server's event intake.
#[derive(Debug, Clone)]
pub struct HttpEventSink {
    url: String,
    client: reqwest::Client,
}

impl HttpEventSink {
    /// Creates a sink posting to the given URL.
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EventSink for HttpEventSink {
    #[instrument(skip_all, fields(url = %self.url))]
    async fn publish(&self, event: &EventEnvelope) -> Result<(), SinkError> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .map_err(|e| SinkError::new(e.to_string()))?;

        if response.status().is_success() {
            debug!("Event published");
            Ok(())
        } else {
            Err(SinkError::new(format!("HTTP {}", response.status())))
        }
    }
}

/// Bound on the in-flight event queue. When full, new events are dropped
/// rather than blocking the producer.
pub const EVENT_QUEUE_CAPACITY: usize = 64;

/// Handle used by the game loop to hand events to the background publisher.
///
/// Cloneable; the worker exits after draining the queue once every clone has
/// been dropped. Delivery is at-most-once.
#[derive(Debug, Clone)]
pub struct TelemetryEmitter {
    player_id: String,
    tx: mpsc::Sender<EventEnvelope>,
}

impl TelemetryEmitter {
    /// Spawns the publishing worker and returns the emitter handle along
    /// with the worker's join handle.
    pub fn spawn(player_id: String, sink: Arc<dyn EventSink>) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<EventEnvelope>(EVENT_QUEUE_CAPACITY);

        let worker = tokio::spawn(async move {
            while let Some(envelope) = rx.recv().await {
                if let Err(e) = sink.publish(&envelope).await {
                    // Observed, never propagated.
                    warn!(error = %e, event = ?envelope.event, "Event publish failed");
                }
            }
            debug!("Telemetry worker drained and finished");
        });

        info!(player_id = %player_id, "Telemetry emitter started");
        (Self { player_id, tx }, worker)
    }

    /// Queues an event for publishing; fire and forget.
    ///
    /// A full queue drops the event with a warning (reject-new policy); a
    /// closed channel is logged. Neither outcome reaches the caller.
    pub fn emit(&self, event: GameEvent) {
        let envelope = EventEnvelope {
            player_id: self.player_id.clone(),
            event,
            timestamp: Utc::now(),
        };

        match self.tx.try_send(envelope) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                warn!(event = ?dropped.event, "Event queue full, dropping newest event");
            }
            Err(mpsc::error::TrySendError::Closed(dropped)) => {
                warn!(event = ?dropped.event, "Telemetry worker gone, event dropped");
            }
        }
    }

    /// The player id stamped on every envelope.
    pub fn player_id(&self) -> &str {
        &self.player_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_wire_format_flattens_event_fields() {
        let envelope = EventEnvelope {
            player_id: "p1".to_string(),
            event: GameEvent::LevelComplete {
                stage_number: 3,
                time_taken: 12.5,
                moves_count: 40,
            },
            timestamp: Utc::now(),
        };

        let value = serde_json::to_value(&envelope).expect("serialize failed");
        assert_eq!(value["event_type"], "level_complete");
        assert_eq!(value["player_id"], "p1");
        assert_eq!(value["stage_number"], 3);
        assert_eq!(value["moves_count"], 40);
    }

    #[test]
    fn game_start_carries_only_the_tag() {
        let value = serde_json::to_value(GameEvent::GameStart).expect("serialize failed");
        assert_eq!(value, serde_json::json!({ "event_type": "game_start" }));
    }
}
