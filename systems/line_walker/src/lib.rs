#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Local-heuristic navigation towards a target.
//!
//! The walker has no global view of the maze. From each cell it prefers the
//! neighbour closest to the target in a straight line, heavily penalises
//! cells it has already left once, and never tries the same direction out
//! of the same cell twice. On a connected maze this bounds a walk to four
//! steps per floor cell.

use std::collections::HashMap;

use log::trace;
use maze_walkers_core::{Position, StepOutcome, DIRECTIONS};
use maze_walkers_world::{ActorState, Grid, NavigationError, Navigator};

const HEADINGS: [&str; 4] = ["down", "right", "left", "up"];

/// Multiplier applied to the score of a neighbour that was visited before.
pub const REVISIT_PENALTY: u64 = 1000;

/// Set of canonical directions already tried out of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tried(u8);

impl Tried {
    /// Reports whether the direction at `index` in [`DIRECTIONS`] was tried.
    #[must_use]
    pub const fn contains(self, index: usize) -> bool {
        self.0 & (1 << index) != 0
    }

    const fn len(self) -> u32 {
        self.0.count_ones()
    }

    fn insert(&mut self, index: usize) -> u32 {
        self.0 |= 1 << index;
        self.len()
    }
}

/// Navigator that greedily closes the straight-line distance to its target.
#[derive(Debug, Default)]
pub struct LineWalker {
    visits: Option<HashMap<Position, Tried>>,
}

impl LineWalker {
    /// Creates a walker that still needs [`Navigator::initialize`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directions already tried out of `pos`, if the walker ever left it.
    #[must_use]
    pub fn tried(&self, pos: Position) -> Option<Tried> {
        self.visits.as_ref()?.get(&pos).copied()
    }

    /// Number of cells the walker has departed from.
    #[must_use]
    pub fn visited_cells(&self) -> usize {
        self.visits.as_ref().map_or(0, HashMap::len)
    }
}

impl Navigator for LineWalker {
    fn initialize(&mut self, _grid: &Grid, actor: &mut ActorState) -> Result<(), NavigationError> {
        self.visits = Some(HashMap::new());
        actor.clear_path();
        Ok(())
    }

    fn next_position(
        &mut self,
        grid: &Grid,
        actor: &mut ActorState,
    ) -> Result<StepOutcome, NavigationError> {
        let visits = self.visits.as_mut().ok_or(NavigationError::NotInitialized)?;
        let position = actor.position();
        let target = actor.target();
        let tried = visits.get(&position).copied().unwrap_or_default();

        let mut best: Option<(usize, u64)> = None;
        for (index, direction) in DIRECTIONS.into_iter().enumerate() {
            if tried.contains(index) {
                continue;
            }
            let candidate = position.add_direction(direction);
            if !grid.can_move(candidate) {
                continue;
            }
            let mut score = line_distance(candidate, target);
            if visits.contains_key(&candidate) {
                score = score.saturating_mul(REVISIT_PENALTY);
            }
            if best.map_or(true, |(_, lowest)| score < lowest) {
                best = Some((index, score));
            }
        }

        let Some((index, score)) = best else {
            return Err(NavigationError::Stuck { position });
        };

        let attempts = visits.entry(position).or_default().insert(index);
        let next = position.add_direction(DIRECTIONS[index]);
        trace!(
            "actor {} steps {} from {position} to {next} (score {score}, attempt {attempts}/4)",
            actor.id(),
            HEADINGS[index]
        );
        actor.record(next);
        Ok(actor.move_to(next))
    }
}

/// Euclidean distance truncated towards zero.
fn line_distance(from: Position, to: Position) -> u64 {
    let rows = f64::from(from.row() - to.row());
    let cols = f64::from(from.col() - to.col());
    (rows * rows + cols * cols).sqrt() as u64
}
