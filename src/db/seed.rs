//! Built-in sample stages for offline play and fresh server databases.

use crate::db::NewStageRow;

const STAGE_1: &str = "###########
#S........#
#.########.
#.........#
########.##
#.........#
#.#######.#
#.........E
###########";

const STAGE_2: &str = "#############
#S..........#
##.########.#
#..#......#.#
#.##.####.#.#
#....#....#.#
######.####.#
#...........E
#############";

const STAGE_3: &str = "###############
#S............#
#.###########.#
#.#.........#.#
#.#.#######.#.#
#...#.....#...#
#####.###.###.#
#.............#
#.###########.#
#...........E.#
###############";

/// The three built-in sample stages.
pub fn sample_stages() -> Vec<NewStageRow> {
    vec![
        NewStageRow::new(1, STAGE_1.to_string(), 11, 9, 1, 1, 9, 7),
        NewStageRow::new(2, STAGE_2.to_string(), 13, 9, 1, 1, 11, 7),
        NewStageRow::new(3, STAGE_3.to_string(), 15, 11, 1, 1, 12, 9),
    ]
}
