//! ASCII-art level loading.
//!
//! Levels are drawn with `#` for walls, `=` for exits and one of `@ ? ! &`
//! for actor start cells. Any other character becomes empty floor drawn with
//! that character.

use log::debug;
use maze_walkers_core::{Position, Tile, TileKind};
use thiserror::Error;

use crate::{Actor, Grid, GridError, Level};

const WALL_CHAR: char = '#';
const EXIT_CHAR: char = '=';
const ACTOR_CHARS: [char; 4] = ['@', '?', '!', '&'];

/// Errors raised while parsing an ASCII level.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The input contained no rows.
    #[error("level contains no rows")]
    Empty,
    /// A row did not match the width of the first row.
    #[error("row {row} has {actual} columns, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// The parsed tiles could not be assembled into a grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Parses an ASCII-art level into tiles, actors and exits.
///
/// Actors start with their target set to their own cell; callers assign a
/// real destination before attaching a navigator.
pub fn parse(text: &str) -> Result<Level, LoadError> {
    let mut tiles = Vec::new();
    let mut actors = Vec::new();
    let mut exits = Vec::new();
    let mut width = None;
    let mut height = 0;

    for (row, line) in text.lines().enumerate() {
        let mut columns = 0;
        for (col, c) in line.chars().enumerate() {
            let pos = Position::new(to_coord(row), to_coord(col));
            let tile = if c == WALL_CHAR {
                Tile::wall()
            } else if c == EXIT_CHAR {
                exits.push(pos);
                Tile::new(TileKind::Empty, c)
            } else if ACTOR_CHARS.contains(&c) {
                actors.push(Actor::new(c, pos, pos));
                Tile::empty()
            } else {
                Tile::new(TileKind::Empty, c)
            };
            tiles.push(tile);
            columns += 1;
        }

        match width {
            None => width = Some(columns),
            Some(expected) if expected != columns => {
                return Err(LoadError::Ragged {
                    row,
                    expected,
                    actual: columns,
                });
            }
            Some(_) => {}
        }
        height += 1;
    }

    let Some(width) = width else {
        return Err(LoadError::Empty);
    };

    let grid = Grid::from_tiles(width, height, tiles)?;
    debug!(
        "loaded {width}x{height} level with {} actors and {} exits",
        actors.len(),
        exits.len()
    );

    let mut level = Level::new(grid, exits);
    for actor in actors {
        let _ = level.add_actor(actor);
    }
    Ok(level)
}

/// Renders the tile kinds of a grid as `#` walls and blank floor.
#[must_use]
pub fn tile_rows(grid: &Grid) -> Vec<String> {
    grid.rows()
        .map(|row| {
            row.iter()
                .map(|tile| match tile.kind() {
                    TileKind::Wall => WALL_CHAR,
                    TileKind::Empty => ' ',
                })
                .collect()
        })
        .collect()
}

fn to_coord(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = "\
#@#####
# #   #
#   # #
#####=#";

    #[test]
    fn parse_collects_walls_actors_and_exits() {
        let level = parse(LEVEL).expect("valid level");
        let grid = level.grid();

        assert_eq!(grid.width(), 7);
        assert_eq!(grid.height(), 4);
        assert_eq!(level.exits(), &[Position::new(3, 5)]);
        assert_eq!(level.actors().len(), 1);

        let actor = &level.actors()[0];
        assert_eq!(actor.glyph(), '@');
        assert_eq!(actor.position(), Position::new(0, 1));
        assert!(grid.is_walkable(Position::new(0, 1)));
        assert!(grid.is_walkable(Position::new(3, 5)));
        assert!(!grid.is_walkable(Position::new(1, 2)));
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let error = parse("###\n##\n###").expect_err("ragged rows");
        assert_eq!(
            error,
            LoadError::Ragged {
                row: 1,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(parse("").expect_err("no rows"), LoadError::Empty);
    }

    #[test]
    fn tile_rows_round_trips_wall_layout() {
        let level = parse(LEVEL).expect("valid level");
        assert_eq!(
            tile_rows(level.grid()),
            vec!["# #####", "# #   #", "#   # #", "##### #"]
        );
    }
}
