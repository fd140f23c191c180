#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Global shortest-path planning and the walker that replays planned paths.
//!
//! Paths are stored target first: index `0` holds the destination and the
//! last element holds the cell the search started from.

mod search;

use log::{debug, warn};
use maze_walkers_core::{Position, StepOutcome};
use maze_walkers_world::{ActorState, Grid, NavigationError, Navigator};

pub use search::{breadth_first, dijkstra};

/// Graph search used to plan a path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Unweighted breadth-first search.
    #[default]
    BreadthFirst,
    /// Dijkstra search weighted by tile traversal cost.
    Dijkstra,
}

impl Algorithm {
    /// Stable lowercase name used in logs and configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BreadthFirst => "bfs",
            Self::Dijkstra => "dijkstra",
        }
    }
}

/// Plans a path from `source` to `target` with the chosen algorithm.
#[must_use]
pub fn solve(grid: &Grid, source: Position, target: Position, algorithm: Algorithm) -> Vec<Position> {
    match algorithm {
        Algorithm::BreadthFirst => breadth_first(grid, source, target),
        Algorithm::Dijkstra => dijkstra(grid, source, target),
    }
}

/// Retargets the actor and stores the planned path on it.
///
/// An unreachable target leaves the actor with an empty path. Returns the
/// number of cells on the stored path.
pub fn calculate_shortest_path(
    grid: &Grid,
    actor: &mut ActorState,
    target: Position,
    algorithm: Algorithm,
) -> usize {
    actor.set_target(target);
    let path = solve(grid, actor.position(), target, algorithm);
    if path.is_empty() {
        warn!(
            "no route for actor {} from {} to {target}",
            actor.id(),
            actor.position()
        );
    } else {
        debug!(
            "{} planned {} cells for actor {} towards {target}",
            algorithm.name(),
            path.len(),
            actor.id()
        );
    }
    let length = path.len();
    actor.replace_path(path);
    length
}

/// Navigator that follows a precomputed shortest path.
#[derive(Debug, Default)]
pub struct ShortestPathWalker {
    algorithm: Algorithm,
    remaining: Option<usize>,
}

impl ShortestPathWalker {
    /// Creates a walker that plans with `algorithm`.
    #[must_use]
    pub const fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            remaining: None,
        }
    }

    /// Algorithm used when the walker plans its path.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Number of path cells still ahead of the actor, once initialized.
    #[must_use]
    pub const fn remaining(&self) -> Option<usize> {
        self.remaining
    }
}

impl Navigator for ShortestPathWalker {
    fn initialize(&mut self, grid: &Grid, actor: &mut ActorState) -> Result<(), NavigationError> {
        let target = actor.target();
        let length = calculate_shortest_path(grid, actor, target, self.algorithm);
        // The last entry is the starting cell.
        self.remaining = Some(length.saturating_sub(1));
        Ok(())
    }

    fn next_position(
        &mut self,
        _grid: &Grid,
        actor: &mut ActorState,
    ) -> Result<StepOutcome, NavigationError> {
        let remaining = self.remaining.ok_or(NavigationError::NotInitialized)?;
        if remaining == 0 {
            return Ok(StepOutcome::Idle);
        }
        let cursor = remaining - 1;
        let Some(&next) = actor.path().get(cursor) else {
            return Ok(StepOutcome::Idle);
        };
        self.remaining = Some(cursor);
        Ok(actor.move_to(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_walkers_world::{ascii, Level};

    const DETOUR: &str = "\
#####
#@  #
### #
#=  #
#####";

    const ENCLOSED: &str = "\
#####
#@  #
#####
# = #
#####";

    fn level_with_target(text: &str) -> Level {
        let mut level = ascii::parse(text).expect("valid level");
        let exit = level.exits()[0];
        level.actors_mut()[0].set_target(exit);
        level
    }

    fn assert_adjacent_chain(path: &[Position]) {
        for pair in path.windows(2) {
            assert!(
                maze_walkers_core::Direction::between(pair[0], pair[1]).is_some(),
                "{} and {} are not adjacent",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn both_algorithms_find_the_detour() {
        let level = level_with_target(DETOUR);
        let source = level.actors()[0].position();
        let target = level.exits()[0];

        for algorithm in [Algorithm::BreadthFirst, Algorithm::Dijkstra] {
            let path = solve(level.grid(), source, target, algorithm);
            assert_eq!(path.len(), 7, "{}", algorithm.name());
            assert_eq!(path.first(), Some(&target));
            assert_eq!(path.last(), Some(&source));
            assert_adjacent_chain(&path);
        }
    }

    #[test]
    fn enclosed_target_has_no_route() {
        let level = level_with_target(ENCLOSED);
        let source = level.actors()[0].position();
        let target = level.exits()[0];

        assert!(breadth_first(level.grid(), source, target).is_empty());
        assert!(dijkstra(level.grid(), source, target).is_empty());
    }

    #[test]
    fn calculate_shortest_path_retargets_actor() {
        let level = ascii::parse(DETOUR).expect("valid level");
        let mut actor = level.actors()[0].state().clone();
        let target = Position::new(3, 3);

        let length = calculate_shortest_path(level.grid(), &mut actor, target, Algorithm::Dijkstra);

        assert_eq!(length, 5);
        assert_eq!(actor.target(), target);
        assert_eq!(actor.path().len(), 5);
        assert_eq!(actor.path()[0], target);
    }

    #[test]
    fn walker_follows_path_then_idles() {
        let mut level = ascii::parse(DETOUR).expect("valid level");
        let start = level.actors()[0].position();
        let target = level.exits()[0];
        let id = level
            .add_walker('$', start, target, ShortestPathWalker::default())
            .expect("walker initializes");

        let (grid, actors) = level.split_mut();
        let actor = &mut actors[id.get() as usize];
        let mut visited = vec![actor.position()];
        while let StepOutcome::Advanced { from, to } = actor.step(grid).expect("path step") {
            assert_eq!(from, *visited.last().expect("start recorded"));
            visited.push(to);
        }

        assert_eq!(visited.len(), 7);
        assert!(actor.has_finished());
        assert_eq!(actor.step(grid), Ok(StepOutcome::Idle));
    }

    #[test]
    fn walker_idles_when_no_route_exists() {
        let mut level = ascii::parse(ENCLOSED).expect("valid level");
        let start = level.actors()[0].position();
        let target = level.exits()[0];
        let id = level
            .add_walker('$', start, target, ShortestPathWalker::new(Algorithm::Dijkstra))
            .expect("walker initializes");

        let (grid, actors) = level.split_mut();
        let actor = &mut actors[id.get() as usize];
        assert!(actor.path().is_empty());
        assert_eq!(actor.step(grid), Ok(StepOutcome::Idle));
        assert_eq!(actor.position(), start);
    }

    #[test]
    fn walker_requires_initialization() {
        let level = ascii::parse(DETOUR).expect("valid level");
        let mut actor = level.actors()[0].state().clone();
        let mut walker = ShortestPathWalker::default();

        assert_eq!(walker.remaining(), None);
        assert_eq!(
            walker.next_position(level.grid(), &mut actor),
            Err(NavigationError::NotInitialized)
        );
    }
}
