//! Per-stage play session: grid, player, goal, and stage statistics.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::maze::{Direction, MazeGrid, Position, try_move};

/// Stage geometry as served by the level source.
///
/// Field names match the backend wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSpec {
    /// 1-based stage number.
    pub stage_number: u32,
    /// Raw maze layout, rows separated by line breaks.
    pub layout: String,
    /// Declared grid width.
    pub width: i32,
    /// Declared grid height.
    pub height: i32,
    /// Player start column.
    pub start_x: i32,
    /// Player start row.
    pub start_y: i32,
    /// Goal column.
    pub end_x: i32,
    /// Goal row.
    pub end_y: i32,
}

impl StageSpec {
    /// The player's starting position.
    pub fn start(&self) -> Position {
        Position::new(self.start_x, self.start_y)
    }

    /// The goal position.
    pub fn end(&self) -> Position {
        Position::new(self.end_x, self.end_y)
    }
}

/// Outcome of applying one directional input to a stage session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player advanced one cell.
    Moved,
    /// The move hit a wall or the border; position unchanged.
    Rejected,
    /// The player advanced one cell onto the goal.
    ReachedGoal,
}

/// Mutable state for the stage currently being played.
///
/// Owned exclusively by the game session and replaced wholesale on every
/// stage load; the grid is immutable for the session's lifetime.
#[derive(Debug)]
pub struct StageSession {
    stage_number: u32,
    grid: MazeGrid,
    player: Position,
    goal: Position,
    moves: u32,
    started_at: Instant,
}

impl StageSession {
    /// Creates a fresh session with the player at the start position and
    /// counters zeroed. The clock starts now.
    pub fn new(stage_number: u32, grid: MazeGrid, start: Position, goal: Position) -> Self {
        info!(stage_number, %start, %goal, "Stage session created");
        Self {
            stage_number,
            grid,
            player: start,
            goal,
            moves: 0,
            started_at: Instant::now(),
        }
    }

    /// Applies one directional input.
    ///
    /// Accepted moves increment the move counter; rejected moves never do.
    /// [`MoveOutcome::ReachedGoal`] is signaled iff the new position equals
    /// the goal exactly.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        match try_move(&self.grid, self.player, direction) {
            Some(to) => {
                self.player = to;
                self.moves += 1;
                if to == self.goal {
                    MoveOutcome::ReachedGoal
                } else {
                    MoveOutcome::Moved
                }
            }
            None => {
                debug!(%direction, player = %self.player, "Move rejected");
                MoveOutcome::Rejected
            }
        }
    }

    /// Time elapsed since the stage was entered, monotonic.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// 1-based stage number.
    pub fn stage_number(&self) -> u32 {
        self.stage_number
    }

    /// The stage's grid.
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    /// Current player position.
    pub fn player(&self) -> Position {
        self.player
    }

    /// Goal position.
    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Accepted moves since this stage was entered.
    pub fn moves(&self) -> u32 {
        self.moves
    }
}
