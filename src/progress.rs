//! Player progress business logic layer.

use tracing::{debug, info, instrument};

use crate::db::{DbError, MazeRepository, ProgressRow};

/// Service layer for saved player progress.
///
/// Wraps [`MazeRepository`] with the upsert-by-player-name semantics the
/// offline client uses after each stage completion. Not part of the game
/// state machine.
#[derive(Debug, Clone)]
pub struct ProgressService {
    repository: MazeRepository,
}

impl ProgressService {
    /// Creates a new progress service backed by the given repository.
    pub fn new(repository: MazeRepository) -> Self {
        Self { repository }
    }

    /// Records that `player_name` completed `completed_stages` stages and is
    /// headed for `current_stage` next.
    #[instrument(skip(self))]
    pub fn record(
        &self,
        player_name: &str,
        current_stage: u32,
        completed_stages: u32,
    ) -> Result<ProgressRow, DbError> {
        debug!(player_name, current_stage, completed_stages, "Recording progress");
        let row = self
            .repository
            .upsert_progress(player_name, current_stage, completed_stages)?;
        info!(player_name, current_stage, "Progress saved");
        Ok(row)
    }

    /// Returns the saved progress for a player, if any.
    #[instrument(skip(self))]
    pub fn lookup(&self, player_name: &str) -> Result<Option<ProgressRow>, DbError> {
        self.repository.get_progress(player_name)
    }
}
