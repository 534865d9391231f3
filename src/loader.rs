//! Stage loading: fetch, parse, validate, and build a fresh session.

use async_trait::async_trait;
use derive_more::{Display, Error};
use tracing::{info, instrument, warn};

use crate::maze::{MalformedLayout, MazeGrid};
use crate::stage::{StageSession, StageSpec};

/// Error surfaced by a level source lookup.
#[derive(Debug, Clone, Display, Error)]
#[display("Level source unavailable: {reason}")]
pub struct SourceError {
    /// Human-readable reason the lookup failed.
    pub reason: String,
}

impl SourceError {
    /// Creates a new source error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Supplies stage geometry by stage number.
///
/// Lookups must be idempotent and side-effect-free. The state machine awaits
/// them inline; no concurrent loads are ever issued.
#[async_trait]
pub trait LevelSource: Send + Sync {
    /// Fetches the spec for the given 1-based stage number.
    async fn fetch(&self, stage_number: u32) -> Result<StageSpec, SourceError>;
}

/// Error from a stage load attempt.
#[derive(Debug, Clone, Display, Error)]
pub enum LoadError {
    /// Stage number outside the playable range; rejected before any source
    /// call is made.
    #[display("invalid stage request: {stage} is not in 1..={max}")]
    InvalidStageRequest {
        /// The rejected stage number.
        stage: u32,
        /// Highest valid stage number.
        max: u32,
    },
    /// The level source failed to produce a spec.
    #[display("{_0}")]
    Unavailable(SourceError),
    /// The returned layout failed to parse.
    #[display("{_0}")]
    Malformed(MalformedLayout),
    /// The spec's start or end position does not address an open cell.
    #[display("invalid spec for stage {stage}: {reason}")]
    InvalidSpec {
        /// The offending stage number.
        stage: u32,
        /// What was wrong with the spec.
        reason: String,
    },
}

impl From<SourceError> for LoadError {
    fn from(err: SourceError) -> Self {
        LoadError::Unavailable(err)
    }
}

impl From<MalformedLayout> for LoadError {
    fn from(err: MalformedLayout) -> Self {
        LoadError::Malformed(err)
    }
}

/// Orchestrates fetching and preparing stages from a level source.
///
/// Stateless between calls: every stage entry re-fetches, even on restart.
pub struct StageLoader {
    source: Box<dyn LevelSource>,
    total_stages: u32,
}

impl StageLoader {
    /// Creates a loader over the given source, serving stages
    /// `1..=total_stages`.
    pub fn new(source: Box<dyn LevelSource>, total_stages: u32) -> Self {
        Self {
            source,
            total_stages,
        }
    }

    /// Number of stages in a full play-through.
    pub fn total_stages(&self) -> u32 {
        self.total_stages
    }

    /// Loads the given stage and builds a fresh [`StageSession`] with the
    /// player at the start, counters zeroed, and the clock restarted.
    ///
    /// # Errors
    ///
    /// - [`LoadError::InvalidStageRequest`] for stage numbers outside range
    /// - [`LoadError::Unavailable`] when the source lookup fails
    /// - [`LoadError::Malformed`] when the layout does not parse
    /// - [`LoadError::InvalidSpec`] when start or end falls on a wall
    #[instrument(skip(self))]
    pub async fn load(&self, stage_number: u32) -> Result<StageSession, LoadError> {
        if stage_number < 1 || stage_number > self.total_stages {
            warn!(stage_number, max = self.total_stages, "Stage request out of range");
            return Err(LoadError::InvalidStageRequest {
                stage: stage_number,
                max: self.total_stages,
            });
        }

        let spec = self.source.fetch(stage_number).await?;
        let grid = MazeGrid::parse(&spec.layout)?;

        let start = spec.start();
        let goal = spec.end();
        if !grid.is_open(start.x, start.y) {
            return Err(LoadError::InvalidSpec {
                stage: stage_number,
                reason: format!("start {start} is not an open cell"),
            });
        }
        if !grid.is_open(goal.x, goal.y) {
            return Err(LoadError::InvalidSpec {
                stage: stage_number,
                reason: format!("end {goal} is not an open cell"),
            });
        }

        info!(
            stage_number,
            width = grid.width(),
            height = grid.height(),
            "Stage loaded"
        );
        Ok(StageSession::new(stage_number, grid, start, goal))
    }
}
