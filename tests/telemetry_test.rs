//! Tests for the telemetry emitter's off-critical-path guarantees.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use mazebound::{
    EVENT_QUEUE_CAPACITY, EventEnvelope, EventSink, GameEvent, SinkError, TelemetryEmitter,
};

/// Sink whose publishes never complete.
struct StalledSink;

#[async_trait]
impl EventSink for StalledSink {
    async fn publish(&self, _event: &EventEnvelope) -> Result<(), SinkError> {
        // Pends forever; the worker gets stuck on the first event.
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Sink that fails every publish and counts the attempts.
#[derive(Clone, Default)]
struct FailingSink {
    attempts: Arc<AtomicU32>,
}

#[async_trait]
impl EventSink for FailingSink {
    async fn publish(&self, _event: &EventEnvelope) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::new("sink offline"))
    }
}

/// Sink that records publish counts.
#[derive(Clone, Default)]
struct CountingSink {
    published: Arc<AtomicU32>,
}

#[async_trait]
impl EventSink for CountingSink {
    async fn publish(&self, _event: &EventEnvelope) -> Result<(), SinkError> {
        self.published.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn emit_never_blocks_on_a_stalled_sink() {
    let (emitter, _worker) = TelemetryEmitter::spawn("tester".to_string(), Arc::new(StalledSink));

    // Push well past the queue bound; overflow is dropped, not awaited.
    let start = Instant::now();
    for _ in 0..(EVENT_QUEUE_CAPACITY * 3) {
        emitter.emit(GameEvent::GameStart);
    }
    assert!(
        start.elapsed() < Duration::from_secs(1),
        "emit must not stall on a stuck sink"
    );
}

#[tokio::test]
async fn publish_failures_are_swallowed_and_the_worker_keeps_draining() {
    let sink = FailingSink::default();
    let (emitter, _worker) = TelemetryEmitter::spawn("tester".to_string(), Arc::new(sink.clone()));

    for _ in 0..3 {
        emitter.emit(GameEvent::GameStart);
    }

    // All three attempts were made despite every one failing.
    for _ in 0..100 {
        if sink.attempts.load(Ordering::SeqCst) >= 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(sink.attempts.load(Ordering::SeqCst), 3);

    // The emitter is still usable afterwards.
    emitter.emit(GameEvent::GameComplete {
        total_time: 1.0,
        total_moves: 1,
    });
}

#[tokio::test]
async fn worker_drains_and_exits_once_every_emitter_is_dropped() {
    let sink = CountingSink::default();
    let (emitter, worker) = TelemetryEmitter::spawn("tester".to_string(), Arc::new(sink.clone()));

    emitter.emit(GameEvent::GameStart);
    emitter.emit(GameEvent::LevelComplete {
        stage_number: 1,
        time_taken: 2.0,
        moves_count: 10,
    });
    drop(emitter);

    tokio::time::timeout(Duration::from_secs(2), worker)
        .await
        .expect("Worker should exit after the channel closes")
        .expect("Worker panicked");
    assert_eq!(sink.published.load(Ordering::SeqCst), 2);
}
