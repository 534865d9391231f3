//! Level server: serves stage geometry, accepts analytics events, and
//! queues remote-control movements.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{debug, info, instrument, warn};

use crate::db::MazeRepository;
use crate::remote::RemoteMovement;
use crate::sources::LevelResponse;
use crate::telemetry::EventEnvelope;

/// Highest stage number the server will serve.
pub const MAX_STAGE: u32 = 10;

/// Shared state behind the level server's routes.
#[derive(Debug, Clone)]
pub struct ServerState {
    repository: MazeRepository,
    movements: Arc<Mutex<VecDeque<RemoteMovement>>>,
}

impl ServerState {
    /// Creates server state over the given repository.
    pub fn new(repository: MazeRepository) -> Self {
        Self {
            repository,
            movements: Arc::new(Mutex::new(VecDeque::new())),
        }
    }
}

/// Builds the level server router.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/levels/{stage_number}", get(get_level))
        .route("/events", post(post_event))
        .route("/movements", post(post_movement))
        .route("/movements/next", get(next_movement))
        .with_state(state)
}

/// Binds and serves until the process is stopped.
pub async fn serve(host: &str, port: u16, state: ServerState) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    info!(host, port, "Level server ready");
    axum::serve(listener, app).await?;
    Ok(())
}

fn failure(error: impl Into<String>) -> LevelResponse {
    LevelResponse {
        success: false,
        data: None,
        error: Some(error.into()),
    }
}

/// `GET /levels/{stage_number}` — the level source lookup.
///
/// Range and format validation happens before any database access.
#[instrument(skip(state))]
async fn get_level(
    State(state): State<ServerState>,
    Path(stage_number): Path<String>,
) -> (StatusCode, Json<LevelResponse>) {
    let stage_number: u32 = match stage_number.parse() {
        Ok(n) => n,
        Err(_) => {
            debug!("Rejecting malformed stage number");
            return (
                StatusCode::BAD_REQUEST,
                Json(failure("Invalid stage_number format")),
            );
        }
    };

    if stage_number < 1 || stage_number > MAX_STAGE {
        return (
            StatusCode::BAD_REQUEST,
            Json(failure(format!(
                "Stage number must be between 1 and {}",
                MAX_STAGE
            ))),
        );
    }

    match state.repository.get_stage(stage_number) {
        Ok(Some(row)) => {
            info!(stage_number, "Stage served");
            (
                StatusCode::OK,
                Json(LevelResponse {
                    success: true,
                    data: Some(row.to_spec()),
                    error: None,
                }),
            )
        }
        Ok(None) => {
            warn!(stage_number, "Stage not found");
            (
                StatusCode::NOT_FOUND,
                Json(failure(format!("Stage {} not found", stage_number))),
            )
        }
        Err(e) => {
            warn!(stage_number, error = %e, "Stage lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(failure(format!("Internal server error: {}", e))),
            )
        }
    }
}

/// `POST /events` — analytics intake. Accepts and logs the envelope.
#[instrument(skip_all, fields(player_id = %envelope.player_id))]
async fn post_event(Json(envelope): Json<EventEnvelope>) -> StatusCode {
    info!(event = ?envelope.event, ts = %envelope.timestamp, "Analytics event received");
    StatusCode::ACCEPTED
}

/// `POST /movements` — enqueue a remote-control movement.
#[instrument(skip_all)]
async fn post_movement(
    State(state): State<ServerState>,
    Json(movement): Json<RemoteMovement>,
) -> StatusCode {
    debug!(direction = %movement.direction, stage = movement.stage, "Movement queued");
    state.movements.lock().unwrap().push_back(movement);
    StatusCode::ACCEPTED
}

/// `GET /movements/next` — pop the oldest queued movement; receiving
/// removes it, like the original queue semantics. 204 when empty.
#[instrument(skip_all)]
async fn next_movement(
    State(state): State<ServerState>,
) -> Result<Json<RemoteMovement>, StatusCode> {
    match state.movements.lock().unwrap().pop_front() {
        Some(movement) => Ok(Json(movement)),
        None => Err(StatusCode::NO_CONTENT),
    }
}
