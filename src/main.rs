//! Mazebound - local-first maze game.
//!
//! Movement is validated locally for instant response; levels come from a
//! remote server or an embedded database; analytics leave on a background
//! worker.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use mazebound::{
    Cli, Command, DbHandle, DbLevelSource, GameSession, HttpEventSink, HttpLevelSource,
    HttpMovementFeed, LOCAL_TOTAL_STAGES, MazeRepository, MovementListener, NullSink,
    ProgressHook, ProgressService, REMOTE_TOTAL_STAGES, ServerState, Settings, StageLoader,
    TelemetryEmitter, run_migrations, run_tui, serve,
};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            server_url,
            player,
            remote_feed,
        } => run_play(server_url, player, remote_feed).await,
        Command::Local { db_path, player } => run_local(db_path, player).await,
        Command::Serve {
            port,
            host,
            db_path,
            seed,
        } => run_serve(host, port, db_path, seed).await,
    }
}

/// Play against a remote level server.
async fn run_play(
    server_url: Option<String>,
    player: Option<String>,
    remote_feed: bool,
) -> Result<()> {
    init_tui_logging()?;

    let settings = Settings::from_env();
    let base_url = server_url
        .or_else(|| settings.server_url().clone())
        .context("no level server configured: pass --server-url or set SERVER_URL")?;
    let player_id = player.unwrap_or_else(|| settings.player_id().clone());

    info!(base_url = %base_url, player_id = %player_id, "Starting remote game");

    // Probe the level source before touching the terminal, so a dead server
    // is a clean startup error.
    let source = HttpLevelSource::new(base_url.clone());
    if !source.test_connection().await {
        bail!(
            "failed to connect to level server at {base_url}; \
             check SERVER_URL and that `mazebound serve` is running"
        );
    }

    let sink = Arc::new(HttpEventSink::new(format!("{base_url}/events")));
    let (telemetry, _worker) = TelemetryEmitter::spawn(player_id, sink);

    let loader = StageLoader::new(Box::new(source), REMOTE_TOTAL_STAGES);
    let session = GameSession::start(loader, telemetry)
        .await
        .context("failed to load stage 1")?;

    let (listener, remote_rx) = if remote_feed {
        let (tx, rx) = mpsc::unbounded_channel();
        let feed = Arc::new(HttpMovementFeed::new(base_url));
        (Some(MovementListener::start(feed, tx)), Some(rx))
    } else {
        (None, None)
    };

    let result = run_tui(session, remote_rx, None).await;

    if let Some(listener) = listener {
        listener.stop().await;
    }
    result
}

/// Play offline against the embedded database.
async fn run_local(db_path: String, player: String) -> Result<()> {
    init_tui_logging()?;

    info!(db_path = %db_path, player = %player, "Starting offline game");

    run_migrations(&db_path)?;
    let repository = MazeRepository::new(DbHandle::new(db_path));
    repository.seed_sample_stages()?;

    let progress = ProgressService::new(repository.clone());
    let (telemetry, _worker) = TelemetryEmitter::spawn(player.clone(), Arc::new(NullSink));

    let loader = StageLoader::new(Box::new(DbLevelSource::new(repository)), LOCAL_TOTAL_STAGES);
    let session = GameSession::start(loader, telemetry)
        .await
        .context("failed to load stage 1 from the local database")?;

    run_tui(session, None, Some(ProgressHook::new(progress, player))).await
}

/// Run the level server.
async fn run_serve(host: String, port: u16, db_path: String, seed: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(db_path = %db_path, "Starting level server");

    run_migrations(&db_path)?;
    let repository = MazeRepository::new(DbHandle::new(db_path));
    if seed {
        let inserted = repository.seed_sample_stages()?;
        info!(inserted, "Seed requested");
    }

    serve(&host, port, ServerState::new(repository)).await
}

/// Logs to a file so tracing output does not corrupt the terminal UI.
fn init_tui_logging() -> Result<()> {
    let log_file = std::fs::File::create("mazebound.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
