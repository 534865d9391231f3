//! Database models for maze stages and player progress.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::schema;
use crate::stage::StageSpec;

/// Maze stage database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::maze_stages)]
pub struct StageRow {
    id: i32,
    stage_number: i32,
    layout: String,
    width: i32,
    height: i32,
    start_x: i32,
    start_y: i32,
    end_x: i32,
    end_y: i32,
}

impl StageRow {
    /// Converts the row into the wire-format stage spec.
    pub fn to_spec(&self) -> StageSpec {
        StageSpec {
            stage_number: self.stage_number.max(0) as u32,
            layout: self.layout.clone(),
            width: self.width,
            height: self.height,
            start_x: self.start_x,
            start_y: self.start_y,
            end_x: self.end_x,
            end_y: self.end_y,
        }
    }
}

/// Insertable stage model for seeding and level authoring.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::maze_stages)]
pub struct NewStageRow {
    stage_number: i32,
    layout: String,
    width: i32,
    height: i32,
    start_x: i32,
    start_y: i32,
    end_x: i32,
    end_y: i32,
}

/// Player progress database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::player_progress)]
pub struct ProgressRow {
    id: i32,
    player_name: String,
    current_stage: i32,
    completed_stages: i32,
    last_played: NaiveDateTime,
}

/// Insertable progress model for the upsert path.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::player_progress)]
pub struct NewProgressRow {
    player_name: String,
    current_stage: i32,
    completed_stages: i32,
    last_played: NaiveDateTime,
}
