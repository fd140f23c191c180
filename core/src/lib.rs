#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core value types shared across the maze walkers workspace.
//!
//! The crate defines the vocabulary that connects the world, the pure
//! navigation systems and the adapters: grid coordinates, movement
//! directions, tiles, actor identifiers and the events emitted while actors
//! step through a level. Nothing here owns state; every type is a small
//! value that can be copied or cloned freely between threads.

use std::fmt;

/// Glyph used to draw wall tiles.
pub const WALL_GLYPH: char = '\u{2588}';

/// Glyph used to draw empty tiles.
pub const EMPTY_GLYPH: char = ' ';

/// Canonical movement directions in deterministic iteration order.
///
/// Every search and every walker iterates directions in this order, which
/// keeps tie-breaking reproducible across runs.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::DOWN,
    Direction::RIGHT,
    Direction::LEFT,
    Direction::UP,
];

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: i32,
    col: i32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index of the position.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the position.
    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }

    /// Offsets the position by the provided direction without bounds checks.
    #[must_use]
    pub const fn add_direction(self, direction: Direction) -> Self {
        Self {
            row: self.row + direction.row_delta(),
            col: self.col + direction.col_delta(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Unit step between two orthogonally adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Direction {
    row_delta: i32,
    col_delta: i32,
}

impl Direction {
    /// Movement toward increasing row indices.
    pub const DOWN: Self = Self::new(1, 0);
    /// Movement toward increasing column indices.
    pub const RIGHT: Self = Self::new(0, 1);
    /// Movement toward decreasing column indices.
    pub const LEFT: Self = Self::new(0, -1);
    /// Movement toward decreasing row indices.
    pub const UP: Self = Self::new(-1, 0);

    /// Creates a direction from explicit row and column deltas.
    #[must_use]
    pub const fn new(row_delta: i32, col_delta: i32) -> Self {
        Self {
            row_delta,
            col_delta,
        }
    }

    /// Row delta applied when moving in this direction.
    #[must_use]
    pub const fn row_delta(&self) -> i32 {
        self.row_delta
    }

    /// Column delta applied when moving in this direction.
    #[must_use]
    pub const fn col_delta(&self) -> i32 {
        self.col_delta
    }

    /// Index of the direction within [`DIRECTIONS`], if it is canonical.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        DIRECTIONS.iter().position(|candidate| *candidate == self)
    }

    /// Canonical direction leading from `from` into the adjacent `to`.
    #[must_use]
    pub fn between(from: Position, to: Position) -> Option<Self> {
        let candidate = Self::new(to.row() - from.row(), to.col() - from.col());
        candidate.index().map(|_| candidate)
    }
}

/// Kinds of tiles that compose a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Open floor that actors may walk on.
    Empty,
    /// Solid wall that is never walkable.
    Wall,
}

impl TileKind {
    /// Reports whether actors may stand on tiles of this kind.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Cost of entering a tile of this kind, or `None` when it is impassable.
    #[must_use]
    pub const fn traversal_cost(self) -> Option<u32> {
        match self {
            Self::Empty => Some(1),
            Self::Wall => None,
        }
    }
}

/// Single cell of a level grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    kind: TileKind,
    glyph: char,
}

impl Tile {
    /// Creates a tile with an explicit kind and display glyph.
    #[must_use]
    pub const fn new(kind: TileKind, glyph: char) -> Self {
        Self { kind, glyph }
    }

    /// Open floor drawn with [`EMPTY_GLYPH`].
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(TileKind::Empty, EMPTY_GLYPH)
    }

    /// Solid wall drawn with [`WALL_GLYPH`].
    #[must_use]
    pub const fn wall() -> Self {
        Self::new(TileKind::Wall, WALL_GLYPH)
    }

    /// Kind of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Glyph used when presenting the tile.
    #[must_use]
    pub const fn glyph(&self) -> char {
        self.glyph
    }

    /// Reports whether actors may stand on the tile.
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        self.kind.is_walkable()
    }
}

/// Unique identifier assigned to an actor by its level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of asking a navigator for a single step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// The actor moved between two cells.
    Advanced {
        /// Cell the actor occupied before the step.
        from: Position,
        /// Cell the actor occupies after the step.
        to: Position,
    },
    /// The navigator had nothing left to do and the actor stayed put.
    Idle,
}

/// Events reported by the drivers after each actor step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that an actor moved between two cells.
    ActorAdvanced {
        /// Identifier of the actor that moved.
        actor: ActorId,
        /// Cell the actor occupied before moving.
        from: Position,
        /// Cell the actor occupies after moving.
        to: Position,
    },
    /// Reports that an actor was stepped but did not move.
    ActorIdle {
        /// Identifier of the idle actor.
        actor: ActorId,
    },
    /// Announces that an actor stands on its target.
    ActorFinished {
        /// Identifier of the actor that arrived.
        actor: ActorId,
    },
}

impl Event {
    /// Identifier of the actor the event concerns.
    #[must_use]
    pub const fn actor(&self) -> ActorId {
        match self {
            Self::ActorAdvanced { actor, .. }
            | Self::ActorIdle { actor }
            | Self::ActorFinished { actor } => *actor,
        }
    }

    /// Translates a navigator step into the event reported for an actor.
    #[must_use]
    pub const fn from_step(actor: ActorId, outcome: StepOutcome) -> Self {
        match outcome {
            StepOutcome::Advanced { from, to } => Self::ActorAdvanced { actor, from, to },
            StepOutcome::Idle => Self::ActorIdle { actor },
        }
    }
}

/// Immutable representation of a single actor's state used for presentation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActorSnapshot {
    /// Unique identifier assigned to the actor.
    pub id: ActorId,
    /// Character drawn at the actor's position.
    pub glyph: char,
    /// Cell currently occupied by the actor.
    pub position: Position,
    /// Cell the actor is heading for.
    pub target: Position,
    /// Visited or planned cells drawn as a trail.
    pub path: Vec<Position>,
}

impl ActorSnapshot {
    /// Reports whether the actor stands on its target.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.position == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_direction_offsets_without_bounds_checks() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.add_direction(Direction::UP), Position::new(-1, 0));
        assert_eq!(origin.add_direction(Direction::RIGHT), Position::new(0, 1));
    }

    #[test]
    fn directions_iterate_down_right_left_up() {
        assert_eq!(
            DIRECTIONS,
            [
                Direction::new(1, 0),
                Direction::new(0, 1),
                Direction::new(0, -1),
                Direction::new(-1, 0),
            ]
        );
        assert_eq!(Direction::LEFT.index(), Some(2));
    }

    #[test]
    fn between_resolves_adjacent_cells_only() {
        let from = Position::new(3, 3);
        assert_eq!(
            Direction::between(from, Position::new(4, 3)),
            Some(Direction::DOWN)
        );
        assert_eq!(Direction::between(from, Position::new(5, 3)), None);
        assert_eq!(Direction::between(from, Position::new(4, 4)), None);
        assert_eq!(Direction::between(from, from), None);
    }

    #[test]
    fn walls_are_impassable() {
        assert!(!Tile::wall().is_walkable());
        assert_eq!(TileKind::Wall.traversal_cost(), None);
        assert_eq!(TileKind::Empty.traversal_cost(), Some(1));
    }

    #[test]
    fn step_outcome_maps_to_actor_event() {
        let actor = ActorId::new(3);
        let from = Position::new(1, 1);
        let to = Position::new(2, 1);
        assert_eq!(
            Event::from_step(actor, StepOutcome::Advanced { from, to }),
            Event::ActorAdvanced { actor, from, to }
        );
        assert_eq!(
            Event::from_step(actor, StepOutcome::Idle).actor(),
            actor
        );
    }
}
