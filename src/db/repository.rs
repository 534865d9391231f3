//! Database repository for maze stages and player progress.

use chrono::Utc;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use crate::db::seed::sample_stages;
use crate::db::{DbError, DbHandle, NewProgressRow, NewStageRow, ProgressRow, StageRow, schema};

/// Repository for stage lookup, seeding, and progress upserts.
///
/// All access goes through the injected [`DbHandle`], which owns the
/// lazily-established, reusable connection.
#[derive(Debug, Clone)]
pub struct MazeRepository {
    handle: DbHandle,
}

impl MazeRepository {
    /// Creates a repository over the given handle.
    pub fn new(handle: DbHandle) -> Self {
        info!(path = %handle.path(), "Creating MazeRepository");
        Self { handle }
    }

    /// Gets a stage by its 1-based number. Returns `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_stage(&self, stage_number: u32) -> Result<Option<StageRow>, DbError> {
        debug!(stage_number, "Looking up stage");
        self.handle.run(|conn| {
            let row = schema::maze_stages::table
                .filter(schema::maze_stages::stage_number.eq(stage_number as i32))
                .first::<StageRow>(conn)
                .optional()?;
            Ok(row)
        })
    }

    /// Lists all stages ordered by stage number.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_stages(&self) -> Result<Vec<StageRow>, DbError> {
        self.handle.run(|conn| {
            let rows = schema::maze_stages::table
                .order(schema::maze_stages::stage_number.asc())
                .load::<StageRow>(conn)?;
            Ok(rows)
        })
    }

    /// Inserts one stage row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stage number already exists or a database
    /// error occurs.
    #[instrument(skip(self, stage))]
    pub fn insert_stage(&self, stage: NewStageRow) -> Result<StageRow, DbError> {
        self.handle.run(|conn| {
            let row = diesel::insert_into(schema::maze_stages::table)
                .values(&stage)
                .returning(StageRow::as_returning())
                .get_result(conn)?;
            Ok(row)
        })
    }

    /// Seeds the built-in sample stages if the stage table is empty.
    /// Returns the number of stages inserted (0 when already populated).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn seed_sample_stages(&self) -> Result<usize, DbError> {
        let existing = self.handle.run(|conn| {
            let count: i64 = schema::maze_stages::table.count().get_result(conn)?;
            Ok(count)
        })?;

        if existing > 0 {
            debug!(existing, "Stages already present, skipping seed");
            return Ok(0);
        }

        let stages = sample_stages();
        let inserted = stages.len();
        for stage in stages {
            self.insert_stage(stage)?;
        }
        info!(inserted, "Seeded sample stages");
        Ok(inserted)
    }

    /// Inserts or updates a player's progress, keyed by player name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn upsert_progress(
        &self,
        player_name: &str,
        current_stage: u32,
        completed_stages: u32,
    ) -> Result<ProgressRow, DbError> {
        debug!(player_name, current_stage, completed_stages, "Upserting progress");
        let now = Utc::now().naive_utc();
        let new_row = NewProgressRow::new(
            player_name.to_string(),
            current_stage as i32,
            completed_stages as i32,
            now,
        );

        self.handle.run(|conn| {
            let row = diesel::insert_into(schema::player_progress::table)
                .values(&new_row)
                .on_conflict(schema::player_progress::player_name)
                .do_update()
                .set((
                    schema::player_progress::current_stage.eq(current_stage as i32),
                    schema::player_progress::completed_stages.eq(completed_stages as i32),
                    schema::player_progress::last_played.eq(now),
                ))
                .returning(ProgressRow::as_returning())
                .get_result(conn)?;
            Ok(row)
        })
    }

    /// Gets a player's saved progress. Returns `None` if never saved.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_progress(&self, player_name: &str) -> Result<Option<ProgressRow>, DbError> {
        self.handle.run(|conn| {
            let row = schema::player_progress::table
                .filter(schema::player_progress::player_name.eq(player_name))
                .first::<ProgressRow>(conn)
                .optional()?;
            Ok(row)
        })
    }
}
