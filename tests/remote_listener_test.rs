//! Tests for the remote-control movement listener.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use mazebound::{Direction, FeedError, MovementFeed, MovementListener, RemoteMovement};
use tokio::sync::mpsc;

fn movement(direction: Direction) -> RemoteMovement {
    RemoteMovement {
        direction,
        player_x: 1,
        player_y: 1,
        stage: 1,
        timestamp: Utc::now(),
    }
}

/// In-memory feed backed by a queue; receive pops.
#[derive(Clone, Default)]
struct QueueFeed {
    queue: Arc<Mutex<VecDeque<RemoteMovement>>>,
}

impl QueueFeed {
    fn push(&self, m: RemoteMovement) {
        self.queue.lock().unwrap().push_back(m);
    }
}

#[async_trait]
impl MovementFeed for QueueFeed {
    async fn next_movement(&self) -> Result<Option<RemoteMovement>, FeedError> {
        Ok(self.queue.lock().unwrap().pop_front())
    }
}

#[tokio::test]
async fn listener_forwards_directions_in_order() {
    let feed = QueueFeed::default();
    feed.push(movement(Direction::Down));
    feed.push(movement(Direction::Right));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let listener = MovementListener::start(Arc::new(feed), tx);

    let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("Timed out waiting for first movement")
        .expect("Channel closed");
    let second = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("Timed out waiting for second movement")
        .expect("Channel closed");

    assert_eq!(first, Direction::Down);
    assert_eq!(second, Direction::Right);

    listener.stop().await;
}

#[tokio::test]
async fn stop_returns_promptly_on_an_idle_feed() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let listener = MovementListener::start(Arc::new(QueueFeed::default()), tx);

    // Let the worker settle into its empty-poll cadence.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let start = Instant::now();
    listener.stop().await;
    assert!(
        start.elapsed() < Duration::from_secs(2),
        "stop must not hang on an idle worker"
    );
}

#[tokio::test]
async fn worker_exits_when_the_game_loop_is_gone() {
    let feed = QueueFeed::default();
    let (tx, rx) = mpsc::unbounded_channel();
    let listener = MovementListener::start(Arc::new(feed.clone()), tx);

    drop(rx);
    feed.push(movement(Direction::Up));

    // The send failure ends the worker; stop still completes cleanly.
    let start = Instant::now();
    listener.stop().await;
    assert!(start.elapsed() < Duration::from_secs(2));
}
