//! Game session: the stage-sequencing state machine.
//!
//! One session drives a play-through of stages `1..=total`. Movement is
//! validated locally and applied synchronously; only stage loads are
//! awaited, and never concurrently.

use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::loader::{LoadError, StageLoader};
use crate::maze::Direction;
use crate::stage::{MoveOutcome, StageSession};
use crate::telemetry::{GameEvent, TelemetryEmitter};

/// Number of stages in a full remote play-through.
pub const REMOTE_TOTAL_STAGES: u32 = 10;

/// Number of stages in the offline sample set.
pub const LOCAL_TOTAL_STAGES: u32 = 3;

/// Discrete input events the core reacts to.
///
/// Everything else from the input surface is filtered out before it gets
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Exit the game.
    Quit,
    /// One directional step.
    Direction(Direction),
    /// The primary activation: continue, play again, or retry a failed load.
    PrimaryActivate,
}

/// Phase of the overall game state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// A stage is being played; movement input is live.
    Playing,
    /// A non-final stage was completed; waiting for the continue action.
    StageComplete,
    /// The final stage was completed; waiting for the restart action.
    GameComplete,
    /// A stage load failed; waiting for a user-triggered retry.
    LoadFailed {
        /// The stage whose load failed and will be retried.
        stage: u32,
    },
}

/// The per-play-through session driving stages `1..=total_stages`.
///
/// Exclusively owns the active [`StageSession`]; loading a stage replaces it
/// wholesale. All mutation happens on the caller's task.
pub struct GameSession {
    loader: StageLoader,
    telemetry: TelemetryEmitter,
    stage: StageSession,
    phase: GamePhase,
    current_stage: u32,
    total_moves: u64,
    game_started_at: Instant,
}

impl GameSession {
    /// Starts a new play-through: emits `game_start` and loads stage 1.
    ///
    /// # Errors
    ///
    /// A failed initial load is a startup failure returned to the caller,
    /// not a state-machine transition.
    #[instrument(skip(loader, telemetry))]
    pub async fn start(
        loader: StageLoader,
        telemetry: TelemetryEmitter,
    ) -> Result<Self, LoadError> {
        telemetry.emit(GameEvent::GameStart);
        let stage = loader.load(1).await?;
        info!(total_stages = loader.total_stages(), "Game session started");

        Ok(Self {
            loader,
            telemetry,
            stage,
            phase: GamePhase::Playing,
            current_stage: 1,
            total_moves: 0,
            game_started_at: Instant::now(),
        })
    }

    /// Routes one input event through the transition table.
    ///
    /// Any (phase, input) combination not in the table is a no-op.
    pub async fn handle(&mut self, event: InputEvent) {
        match (self.phase, event) {
            (GamePhase::Playing, InputEvent::Direction(direction)) => {
                self.apply_move(direction);
            }
            (GamePhase::StageComplete, InputEvent::PrimaryActivate) => self.advance().await,
            (GamePhase::GameComplete, InputEvent::PrimaryActivate) => self.restart().await,
            (GamePhase::LoadFailed { stage }, InputEvent::PrimaryActivate) => {
                info!(stage, "Retrying failed stage load");
                self.enter_stage(stage).await;
            }
            _ => debug!(phase = ?self.phase, ?event, "Input ignored"),
        }
    }

    /// Applies one directional move; live only while [`GamePhase::Playing`].
    ///
    /// Accepted moves update the stage and total counters; on reaching the
    /// goal the session transitions and emits completion events.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.phase != GamePhase::Playing {
            debug!(phase = ?self.phase, "Movement ignored outside Playing");
            return MoveOutcome::Rejected;
        }

        let outcome = self.stage.apply_move(direction);
        match outcome {
            MoveOutcome::Moved => self.total_moves += 1,
            MoveOutcome::ReachedGoal => {
                self.total_moves += 1;
                self.complete_stage();
            }
            MoveOutcome::Rejected => {}
        }
        outcome
    }

    /// Marks the current stage complete, freezing its statistics at this
    /// instant and emitting `level_complete` (plus `game_complete` on the
    /// final stage, in that order).
    fn complete_stage(&mut self) {
        let time_taken = self.stage.elapsed().as_secs_f64();
        let moves_count = self.stage.moves();
        info!(
            stage = self.current_stage,
            moves = moves_count,
            time_taken,
            "Stage completed"
        );

        self.telemetry.emit(GameEvent::LevelComplete {
            stage_number: self.current_stage,
            time_taken,
            moves_count,
        });

        if self.current_stage == self.loader.total_stages() {
            let total_time = self.game_started_at.elapsed().as_secs_f64();
            info!(total_moves = self.total_moves, total_time, "Game completed");
            self.telemetry.emit(GameEvent::GameComplete {
                total_time,
                total_moves: self.total_moves,
            });
            self.phase = GamePhase::GameComplete;
        } else {
            self.phase = GamePhase::StageComplete;
        }
    }

    /// Continue action: move on to the next stage.
    async fn advance(&mut self) {
        self.current_stage += 1;
        self.enter_stage(self.current_stage).await;
    }

    /// Restart action: back to stage 1 with the totals reset.
    async fn restart(&mut self) {
        info!("Restarting game");
        self.current_stage = 1;
        self.total_moves = 0;
        self.game_started_at = Instant::now();
        self.telemetry.emit(GameEvent::GameStart);
        self.enter_stage(1).await;
    }

    /// Loads `stage` and transitions to `Playing`, or to `LoadFailed` on
    /// error. The previous stage's state is kept so the surface can render
    /// it behind a failure indicator.
    async fn enter_stage(&mut self, stage: u32) {
        match self.loader.load(stage).await {
            Ok(session) => {
                self.stage = session;
                self.phase = GamePhase::Playing;
            }
            Err(e) => {
                warn!(stage, error = %e, "Stage load failed");
                self.phase = GamePhase::LoadFailed { stage };
            }
        }
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// 1-based number of the stage being played (or pending).
    pub fn current_stage(&self) -> u32 {
        self.current_stage
    }

    /// Number of stages in a full play-through.
    pub fn total_stages(&self) -> u32 {
        self.loader.total_stages()
    }

    /// Accepted moves across all stages this play-through.
    pub fn total_moves(&self) -> u64 {
        self.total_moves
    }

    /// Seconds since the play-through started.
    pub fn game_elapsed(&self) -> std::time::Duration {
        self.game_started_at.elapsed()
    }

    /// The active stage session.
    pub fn stage(&self) -> &StageSession {
        &self.stage
    }
}
