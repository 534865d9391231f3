//! Mazebound library - local-first maze navigation game.
//!
//! # Architecture
//!
//! - **Core**: maze grid, movement validation, and the stage/game state
//!   machines. Movement is validated locally and applied synchronously;
//!   it never waits on I/O.
//! - **Level sources**: stage geometry fetched from the remote level server
//!   or an embedded SQLite database (offline mode).
//! - **Telemetry**: lifecycle events handed to a background worker over a
//!   bounded queue; publishing is best effort and off the critical path.
//! - **Server**: axum service backing the remote client with level data, an
//!   analytics intake, and a remote-control movement queue.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mazebound::{
//!     GameSession, HttpEventSink, HttpLevelSource, REMOTE_TOTAL_STAGES,
//!     StageLoader, TelemetryEmitter,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let source = HttpLevelSource::new("http://localhost:3000".to_string());
//! let sink = Arc::new(HttpEventSink::new("http://localhost:3000/events".to_string()));
//! let (telemetry, _worker) = TelemetryEmitter::spawn("player1".to_string(), sink);
//! let loader = StageLoader::new(Box::new(source), REMOTE_TOTAL_STAGES);
//! let session = GameSession::start(loader, telemetry).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod db;
mod game;
mod loader;
mod maze;
mod progress;
mod remote;
mod server;
mod settings;
mod sources;
mod stage;
mod telemetry;
mod tui;

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - persistence
pub use db::{
    DbError, DbHandle, MazeRepository, NewProgressRow, NewStageRow, ProgressRow, StageRow,
    run_migrations, sample_stages,
};

// Crate-level exports - game state machine
pub use game::{
    GamePhase, GameSession, InputEvent, LOCAL_TOTAL_STAGES, REMOTE_TOTAL_STAGES,
};

// Crate-level exports - stage loading
pub use loader::{LevelSource, LoadError, SourceError, StageLoader};

// Crate-level exports - maze core
pub use maze::{Cell, Direction, MalformedLayout, MazeGrid, Position, try_move};

// Crate-level exports - progress persistence
pub use progress::ProgressService;

// Crate-level exports - remote-control mode
pub use remote::{FeedError, HttpMovementFeed, MovementFeed, MovementListener, RemoteMovement};

// Crate-level exports - level server
pub use server::{MAX_STAGE, ServerState, router, serve};

// Crate-level exports - configuration
pub use settings::Settings;

// Crate-level exports - level sources
pub use sources::{DbLevelSource, HttpLevelSource, LevelResponse};

// Crate-level exports - stage session
pub use stage::{MoveOutcome, StageSession, StageSpec};

// Crate-level exports - telemetry
pub use telemetry::{
    EVENT_QUEUE_CAPACITY, EventEnvelope, EventSink, GameEvent, HttpEventSink, NullSink, SinkError,
    TelemetryEmitter,
};

// Crate-level exports - terminal UI
pub use tui::{ProgressHook, map_event, run_tui};
