#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized depth-first maze carving.
//!
//! The generator fills the interior of a framed grid with wall and ploughs
//! corridors into it. Every carved cell is attached to the corridor it was
//! carved from and a corridor never breaks into a neighbouring one, so the
//! resulting floor forms a single connected component. Two exits are cut
//! into the top and bottom border afterwards.

use log::debug;
use maze_walkers_core::{Direction, Position, Tile, DIRECTIONS};
use maze_walkers_world::{Grid, GridError, Level};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Smallest width and height the generator accepts.
pub const MIN_DIMENSION: usize = 3;

const MIN_RUN: u32 = 2;
const RUN_SPAN: u32 = 4;

/// Errors raised while generating a maze.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// The requested dimensions leave no room for a frame and an interior.
    #[error("maze of {width}x{height} is smaller than the 3x3 minimum")]
    TooSmall {
        /// Requested width in columns.
        width: usize,
        /// Requested height in rows.
        height: usize,
    },
    /// An exit was requested at a position that is not on the border.
    #[error("exit at {position} is not on the level border")]
    ExitOffBorder {
        /// Position that failed validation.
        position: Position,
    },
    /// Carving addressed a cell outside the grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Generates a connected maze with exits at the top left and bottom right.
///
/// Exits are placed at `(0, 1)` and `(height - 1, width - 2)`, in that order.
pub fn generate_maze<R>(width: usize, height: usize, rng: &mut R) -> Result<Level, GenerationError>
where
    R: RngCore + ?Sized,
{
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(GenerationError::TooSmall { width, height });
    }

    let mut grid = Grid::framed(width, height);
    fill_interior(&mut grid)?;

    let start = Position::new(0, 1);
    let exit = Position::new(coord(height) - 1, coord(width) - 2);
    let stats = carve(&mut grid, start, rng)?;
    debug!(
        "carved {} cells into {width}x{height} maze with {} backtracks",
        stats.carved, stats.backtracks
    );

    let mut exits = Vec::with_capacity(2);
    carve_exit(&mut grid, start, &mut exits)?;
    carve_exit(&mut grid, exit, &mut exits)?;

    Ok(Level::new(grid, exits))
}

/// Generates a maze from a ChaCha8 stream seeded with `seed`.
///
/// The same seed always yields a byte-identical layout.
pub fn generate_seeded(width: usize, height: usize, seed: u64) -> Result<Level, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_maze(width, height, &mut rng)
}

/// Cuts an exit into the border and ploughs inward until it meets floor.
///
/// The exit is recorded in `exits`. Ploughing runs perpendicular to the
/// border the exit sits on and stops at the first walkable cell or when it
/// leaves the frame.
pub fn carve_exit(
    grid: &mut Grid,
    pos: Position,
    exits: &mut Vec<Position>,
) -> Result<(), GenerationError> {
    let inward = inward_direction(grid, pos).ok_or(GenerationError::ExitOffBorder { position: pos })?;

    grid.set_tile(pos, Tile::empty())?;
    exits.push(pos);

    let mut cursor = pos.add_direction(inward);
    while grid.within_frame(cursor) && !grid.can_move(cursor) {
        grid.set_tile(cursor, Tile::empty())?;
        cursor = cursor.add_direction(inward);
    }
    Ok(())
}

#[derive(Debug, Default)]
struct CarveStats {
    carved: usize,
    backtracks: usize,
}

fn fill_interior(grid: &mut Grid) -> Result<(), GridError> {
    for row in 1..coord(grid.height()) - 1 {
        for col in 1..coord(grid.width()) - 1 {
            grid.set_tile(Position::new(row, col), Tile::wall())?;
        }
    }
    Ok(())
}

fn carve<R>(grid: &mut Grid, start: Position, rng: &mut R) -> Result<CarveStats, GridError>
where
    R: RngCore + ?Sized,
{
    let mut stats = CarveStats::default();
    let mut turns = vec![start];
    let mut pos = start;

    while !turns.is_empty() {
        let mut steps = 0;

        for direction in shuffled_directions(rng) {
            let run = MIN_RUN + draw_below(rng, RUN_SPAN);
            while steps < run {
                let next = pos.add_direction(direction);
                if !grid.within_frame(next) || grid.is_walkable(next) {
                    break;
                }
                if !has_enough_walls(grid, next, pos) {
                    break;
                }
                grid.set_tile(next, Tile::empty())?;
                pos = next;
                steps += 1;
            }

            if steps > 0 {
                turns.push(pos);
                stats.carved += steps as usize;
                break;
            }
        }

        if steps == 0 {
            if let Some(turn) = turns.pop() {
                pos = turn;
                stats.backtracks += 1;
            }
        }
    }

    Ok(stats)
}

/// Every neighbour of `pos` other than `origin` must be wall or outside the
/// frame, otherwise carving into `pos` would merge two corridors.
fn has_enough_walls(grid: &Grid, pos: Position, origin: Position) -> bool {
    DIRECTIONS
        .into_iter()
        .map(|direction| pos.add_direction(direction))
        .filter(|neighbor| *neighbor != origin && grid.within_frame(*neighbor))
        .all(|neighbor| !grid.is_walkable(neighbor))
}

fn shuffled_directions<R>(rng: &mut R) -> [Direction; 4]
where
    R: RngCore + ?Sized,
{
    let mut directions = DIRECTIONS;
    for index in (1..directions.len()).rev() {
        let swap = draw_below(rng, index as u32 + 1) as usize;
        directions.swap(index, swap);
    }
    directions
}

/// Draws a value in `0..bound`. Bounds stay below five, where the modulo bias
/// of a 32-bit draw is negligible.
fn draw_below<R>(rng: &mut R, bound: u32) -> u32
where
    R: RngCore + ?Sized,
{
    rng.next_u32() % bound
}

fn inward_direction(grid: &Grid, pos: Position) -> Option<Direction> {
    if !grid.within_bounds(pos) {
        return None;
    }
    let last_row = coord(grid.height()) - 1;
    let last_col = coord(grid.width()) - 1;
    if pos.row() == 0 {
        Some(Direction::DOWN)
    } else if pos.col() == 0 {
        Some(Direction::RIGHT)
    } else if pos.row() == last_row {
        Some(Direction::UP)
    } else if pos.col() == last_col {
        Some(Direction::LEFT)
    } else {
        None
    }
}

fn coord(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
