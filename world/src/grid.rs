//! Dense tile matrix backing every level.

use maze_walkers_core::{Position, Tile, DIRECTIONS};
use thiserror::Error;

/// Errors raised when building or editing a grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The addressed position lies outside the grid.
    #[error("position {position} lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Position that failed validation.
        position: Position,
        /// Width of the grid in columns.
        width: usize,
        /// Height of the grid in rows.
        height: usize,
    },
    /// The provided tiles do not fill the requested dimensions.
    #[error("expected {expected} tiles but received {actual}")]
    DimensionMismatch {
        /// Number of tiles required by `width * height`.
        expected: usize,
        /// Number of tiles supplied.
        actual: usize,
    },
}

/// Row-major matrix of tiles.
///
/// The grid only knows about terrain. Actor occupancy is tracked by the
/// level and is deliberately not part of any walkability query here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a grid whose border is wall and whose interior is empty.
    #[must_use]
    pub fn framed(width: usize, height: usize) -> Self {
        let mut tiles = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                let border = row == 0 || col == 0 || row + 1 == height || col + 1 == width;
                tiles.push(if border { Tile::wall() } else { Tile::empty() });
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Wraps an existing row-major tile vector.
    pub fn from_tiles(width: usize, height: usize, tiles: Vec<Tile>) -> Result<Self, GridError> {
        let expected = width * height;
        if tiles.len() != expected {
            return Err(GridError::DimensionMismatch {
                expected,
                actual: tiles.len(),
            });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the position lies inside `[0, height) x [0, width)`.
    #[must_use]
    pub fn within_bounds(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Reports whether the position lies strictly inside the outer border.
    #[must_use]
    pub fn within_frame(&self, pos: Position) -> bool {
        let (Ok(row), Ok(col)) = (usize::try_from(pos.row()), usize::try_from(pos.col())) else {
            return false;
        };
        row > 0 && col > 0 && row + 1 < self.height && col + 1 < self.width
    }

    /// Reports whether the tile at `pos` is empty floor.
    ///
    /// # Panics
    ///
    /// Panics when `pos` lies outside the grid. Callers check
    /// [`Grid::within_bounds`] first or use [`Grid::can_move`].
    #[must_use]
    pub fn is_walkable(&self, pos: Position) -> bool {
        match self.tile(pos) {
            Some(tile) => tile.is_walkable(),
            None => panic!(
                "walkability queried at {pos} outside the {}x{} grid",
                self.width, self.height
            ),
        }
    }

    /// Reports whether an actor may step onto `pos`.
    ///
    /// Other actors standing on the cell do not block it.
    #[must_use]
    pub fn can_move(&self, pos: Position) -> bool {
        self.tile(pos).is_some_and(Tile::is_walkable)
    }

    /// Tile stored at the position, if it lies within the grid.
    #[must_use]
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).and_then(|index| self.tiles.get(index))
    }

    /// Replaces the tile stored at the position.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> Result<(), GridError> {
        let Some(index) = self.index(pos) else {
            return Err(GridError::OutOfBounds {
                position: pos,
                width: self.width,
                height: self.height,
            });
        };
        self.tiles[index] = tile;
        Ok(())
    }

    /// Row-major index of the position, if it lies within the grid.
    #[must_use]
    pub fn index(&self, pos: Position) -> Option<usize> {
        let row = usize::try_from(pos.row()).ok()?;
        let col = usize::try_from(pos.col()).ok()?;
        if row >= self.height || col >= self.width {
            return None;
        }
        row.checked_mul(self.width)?.checked_add(col)
    }

    /// Position addressed by a row-major index.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<Position> {
        if index >= self.tiles.len() {
            return None;
        }
        let row = i32::try_from(index / self.width).ok()?;
        let col = i32::try_from(index % self.width).ok()?;
        Some(Position::new(row, col))
    }

    /// Iterator over the rows of the grid from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        // `chunks` rejects a zero chunk size; an empty grid has no rows anyway.
        self.tiles.chunks(self.width.max(1))
    }

    /// Iterator over every walkable position in row-major order.
    pub fn walkable_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_walkable())
            .filter_map(|(index, _)| self.position(index))
    }

    /// Number of walkable tiles.
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_walkable()).count()
    }

    /// Walkable neighbours of the position in canonical direction order.
    pub fn open_neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        DIRECTIONS
            .into_iter()
            .map(move |direction| pos.add_direction(direction))
            .filter(|neighbor| self.can_move(*neighbor))
    }
}
