//! Immutable per-stage cell grid parsed from a textual layout.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A single cell in the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Impassable cell.
    Wall,
    /// Walkable cell. Start/end markers and spaces are geometrically open.
    Open,
}

/// Grid position as signed coordinates.
///
/// Signed so that a movement delta applied at the border produces an
/// out-of-bounds probe instead of an integer underflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column, increasing rightward.
    pub x: i32,
    /// Row, increasing downward.
    pub y: i32,
}

impl Position {
    /// Creates a position from column and row.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Error returned when a layout string cannot be parsed into a grid.
#[derive(Debug, Clone, Display, Error)]
#[display("Malformed layout: {reason}")]
pub struct MalformedLayout {
    /// Human-readable reason the layout was rejected.
    pub reason: String,
}

impl MalformedLayout {
    /// Creates a new layout error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Immutable 2D cell grid for one stage.
///
/// Rows may have independent lengths; walkability checks are bounds-checked
/// against the actual row, never against an assumed uniform width.
#[derive(Debug, Clone)]
pub struct MazeGrid {
    cells: Vec<Vec<Cell>>,
    width: usize,
    height: usize,
}

impl MazeGrid {
    /// Parses a raw layout string into a grid.
    ///
    /// Rows are separated by line breaks; leading and trailing blank lines
    /// are stripped. `#` becomes [`Cell::Wall`], every other character
    /// (including spaces and start/end glyphs) becomes [`Cell::Open`].
    ///
    /// # Errors
    ///
    /// Returns [`MalformedLayout`] if the stripped layout has zero rows.
    #[instrument(skip(layout), fields(bytes = layout.len()))]
    pub fn parse(layout: &str) -> Result<Self, MalformedLayout> {
        let lines: Vec<&str> = layout.lines().collect();
        let first = lines.iter().position(|l| !l.trim().is_empty());
        let last = lines.iter().rposition(|l| !l.trim().is_empty());

        let (first, last) = match (first, last) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(MalformedLayout::new("layout has no rows")),
        };

        let cells: Vec<Vec<Cell>> = lines[first..=last]
            .iter()
            .map(|line| {
                line.chars()
                    .map(|c| if c == '#' { Cell::Wall } else { Cell::Open })
                    .collect()
            })
            .collect();

        let width = cells.iter().map(Vec::len).max().unwrap_or(0);
        let height = cells.len();

        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Returns `true` iff `(x, y)` addresses an in-bounds open cell.
    ///
    /// Out-of-bounds coordinates return `false`, indistinguishable from a
    /// wall. This is a deliberate simplification the movement validator
    /// relies on.
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        matches!(
            self.cells
                .get(y as usize)
                .and_then(|row| row.get(x as usize)),
            Some(Cell::Open)
        )
    }

    /// Returns the cells of row `y`, if it exists.
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        self.cells.get(y).map(Vec::as_slice)
    }

    /// Width of the longest row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }
}
