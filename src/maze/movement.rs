//! Movement validation: pure, local, never waits on I/O.

use serde::{Deserialize, Serialize};

use super::grid::{MazeGrid, Position};

/// A directional input.
///
/// Serialized uppercase to match the movement wire format.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Direction {
    /// One cell up.
    Up,
    /// One cell down.
    Down,
    /// One cell left.
    Left,
    /// One cell right.
    Right,
}

impl Direction {
    /// Grid delta for one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Returns the destination cell iff the move is valid, `None` otherwise.
///
/// A move is valid when the destination is an in-bounds open cell. Each call
/// yields at most one cell transition, applied synchronously; the caller's
/// position is unchanged on rejection. No diagonals, no queuing.
pub fn try_move(grid: &MazeGrid, from: Position, direction: Direction) -> Option<Position> {
    let (dx, dy) = direction.delta();
    let to = Position::new(from.x + dx, from.y + dy);
    grid.is_open(to.x, to.y).then_some(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORRIDOR: &str = "###\n#S#\n#.#\n#E#\n###";

    #[test]
    fn accepted_move_lands_exactly_one_delta_away() {
        let grid = MazeGrid::parse(CORRIDOR).expect("parse failed");
        let from = Position::new(1, 1);
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let (dx, dy) = direction.delta();
            let expected = Position::new(from.x + dx, from.y + dy);
            match try_move(&grid, from, direction) {
                Some(to) => assert_eq!(to, expected),
                None => assert!(!grid.is_open(expected.x, expected.y)),
            }
        }
    }

    #[test]
    fn wall_rejects_the_move() {
        let grid = MazeGrid::parse(CORRIDOR).expect("parse failed");
        assert_eq!(try_move(&grid, Position::new(1, 1), Direction::Left), None);
        assert_eq!(
            try_move(&grid, Position::new(1, 1), Direction::Down),
            Some(Position::new(1, 2))
        );
    }

    #[test]
    fn border_exit_rejects_the_move() {
        let grid = MazeGrid::parse("...").expect("parse failed");
        assert_eq!(try_move(&grid, Position::new(0, 0), Direction::Up), None);
        assert_eq!(try_move(&grid, Position::new(0, 0), Direction::Left), None);
        assert_eq!(
            try_move(&grid, Position::new(0, 0), Direction::Right),
            Some(Position::new(1, 0))
        );
    }

    #[test]
    fn direction_wire_format_is_uppercase() {
        assert_eq!(Direction::Up.to_string(), "UP");
        assert_eq!(
            serde_json::to_string(&Direction::Left).expect("serialize failed"),
            "\"LEFT\""
        );
    }
}
