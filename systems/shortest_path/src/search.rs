//! Graph searches over the walkable cells of a grid.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use maze_walkers_core::Position;
use maze_walkers_world::Grid;

const UNREACHED: u32 = u32::MAX;

/// Breadth-first search from `source` to `target`.
///
/// Returns the path ordered from `target` back to `source`, or an empty path
/// when the target cannot be reached. A search whose endpoints coincide
/// yields `[source]`.
#[must_use]
pub fn breadth_first(grid: &Grid, source: Position, target: Position) -> Vec<Position> {
    let (Some(start), Some(goal)) = (grid.index(source), grid.index(target)) else {
        return Vec::new();
    };

    let mut arena = SearchArena::new(grid.cell_count(), start);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            break;
        }
        let Some(pos) = grid.position(current) else {
            continue;
        };
        let distance = arena.distance(current).saturating_add(1);
        for neighbor in grid.open_neighbors(pos) {
            let Some(next) = grid.index(neighbor) else {
                continue;
            };
            if arena.is_reached(next) {
                continue;
            }
            arena.link(next, current, distance);
            queue.push_back(next);
        }
    }

    arena.extract(grid, goal)
}

/// Dijkstra search from `source` to `target` weighted by tile traversal cost.
///
/// Path ordering and the unreachable case match [`breadth_first`].
#[must_use]
pub fn dijkstra(grid: &Grid, source: Position, target: Position) -> Vec<Position> {
    let (Some(start), Some(goal)) = (grid.index(source), grid.index(target)) else {
        return Vec::new();
    };

    let mut arena = SearchArena::new(grid.cell_count(), start);
    let mut frontier = BinaryHeap::from([Frontier {
        distance: 0,
        index: start,
    }]);

    while let Some(Frontier { distance, index }) = frontier.pop() {
        if distance > arena.distance(index) {
            continue;
        }
        if index == goal {
            break;
        }
        let Some(pos) = grid.position(index) else {
            continue;
        };
        for neighbor in grid.open_neighbors(pos) {
            let (Some(next), Some(cost)) = (grid.index(neighbor), entry_cost(grid, neighbor))
            else {
                continue;
            };
            let candidate = distance.saturating_add(cost);
            if candidate < arena.distance(next) {
                arena.link(next, index, candidate);
                frontier.push(Frontier {
                    distance: candidate,
                    index: next,
                });
            }
        }
    }

    arena.extract(grid, goal)
}

fn entry_cost(grid: &Grid, pos: Position) -> Option<u32> {
    grid.tile(pos).and_then(|tile| tile.kind().traversal_cost())
}

#[derive(Clone, Copy, Debug)]
struct PathNode {
    distance: u32,
    parent: Option<usize>,
}

/// Per-search bookkeeping indexed by row-major cell index.
#[derive(Debug)]
struct SearchArena {
    nodes: Vec<PathNode>,
    source: usize,
}

impl SearchArena {
    fn new(cell_count: usize, source: usize) -> Self {
        let mut nodes = vec![
            PathNode {
                distance: UNREACHED,
                parent: None,
            };
            cell_count
        ];
        nodes[source].distance = 0;
        Self { nodes, source }
    }

    fn distance(&self, index: usize) -> u32 {
        self.nodes[index].distance
    }

    fn is_reached(&self, index: usize) -> bool {
        self.nodes[index].distance != UNREACHED
    }

    fn link(&mut self, index: usize, parent: usize, distance: u32) {
        self.nodes[index] = PathNode {
            distance,
            parent: Some(parent),
        };
    }

    /// Follows parent links from `goal` back to the source.
    fn extract(&self, grid: &Grid, goal: usize) -> Vec<Position> {
        if !self.is_reached(goal) {
            return Vec::new();
        }
        let mut path = Vec::new();
        let mut current = Some(goal);
        while let Some(index) = current {
            let Some(pos) = grid.position(index) else {
                return Vec::new();
            };
            path.push(pos);
            if index == self.source {
                break;
            }
            current = self.nodes[index].parent;
        }
        path
    }
}

/// Min-heap entry; ties resolve towards the lower cell index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Frontier {
    distance: u32,
    index: usize,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
