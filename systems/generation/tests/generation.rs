use std::collections::{HashSet, VecDeque};

use maze_walkers_core::Position;
use maze_walkers_system_generation::{generate_maze, generate_seeded, GenerationError};
use maze_walkers_system_shortest_path::breadth_first;
use maze_walkers_world::{ascii, Grid};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn flood_fill(grid: &Grid, from: Position) -> HashSet<Position> {
    let mut seen = HashSet::from([from]);
    let mut queue = VecDeque::from([from]);
    while let Some(pos) = queue.pop_front() {
        for neighbor in grid.open_neighbors(pos) {
            if seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    seen
}

#[test]
fn generated_floor_is_a_single_component() {
    for (width, height) in [(5, 5), (7, 9), (11, 11), (21, 13), (31, 23)] {
        for seed in 0..25 {
            let level = generate_seeded(width, height, seed).expect("valid dimensions");
            let grid = level.grid();
            let start = level.exits()[0];
            let reached = flood_fill(grid, start);
            let floor: HashSet<Position> = grid.walkable_positions().collect();

            assert_eq!(floor.len(), grid.walkable_count());
            assert_eq!(
                reached, floor,
                "{width}x{height} seed {seed} has unreachable floor"
            );
        }
    }
}

#[test]
fn exits_are_mutually_reachable() {
    for seed in 0..40 {
        let level = generate_seeded(15, 11, seed).expect("valid dimensions");
        let [entry, exit] = [level.exits()[0], level.exits()[1]];

        let forward = breadth_first(level.grid(), entry, exit);
        let backward = breadth_first(level.grid(), exit, entry);

        assert!(!forward.is_empty(), "seed {seed}");
        assert_eq!(forward.len(), backward.len(), "seed {seed}");
        assert_eq!(forward.first(), Some(&exit));
        assert_eq!(forward.last(), Some(&entry));
    }
}

#[test]
fn border_is_wall_except_for_the_exits() {
    for seed in [0, 3, 42, 1337] {
        let level = generate_seeded(13, 9, seed).expect("valid dimensions");
        let grid = level.grid();
        assert_eq!(
            level.exits(),
            &[Position::new(0, 1), Position::new(8, 11)]
        );

        for row in 0..9 {
            for col in 0..13 {
                let pos = Position::new(row, col);
                if grid.within_frame(pos) {
                    continue;
                }
                let expected = level.exits().contains(&pos);
                assert_eq!(grid.is_walkable(pos), expected, "seed {seed} at {pos}");
            }
        }
    }
}

#[test]
fn same_seed_reproduces_the_same_layout() {
    let first = generate_seeded(25, 17, 0xdead_beef).expect("valid dimensions");
    let second = generate_seeded(25, 17, 0xdead_beef).expect("valid dimensions");
    assert_eq!(first.grid(), second.grid());
    assert_eq!(first.exits(), second.exits());

    let mut rng = ChaCha8Rng::seed_from_u64(0xdead_beef);
    let explicit = generate_maze(25, 17, &mut rng).expect("valid dimensions");
    assert_eq!(first.grid(), explicit.grid());
}

#[test]
fn seed_42_produces_the_recorded_maze() {
    let level = generate_seeded(7, 7, 42).expect("valid dimensions");

    assert_eq!(
        ascii::tile_rows(level.grid()),
        vec![
            "# #####",
            "# ### #",
            "#     #",
            "### # #",
            "# ### #",
            "#     #",
            "##### #",
        ]
    );
    assert_eq!(level.grid().walkable_count(), 18);

    let path = breadth_first(level.grid(), level.exits()[0], level.exits()[1]);
    assert_eq!(path.len(), 11);
    assert_eq!(path[0], Position::new(6, 5));
    assert_eq!(path[10], Position::new(0, 1));
}

#[test]
fn undersized_dimensions_are_rejected() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(
        generate_maze(7, 2, &mut rng).map(|_| ()),
        Err(GenerationError::TooSmall {
            width: 7,
            height: 2
        })
    );
}
