use maze_walkers_core::{Direction, Position, StepOutcome};
use maze_walkers_system_generation::generate_seeded;
use maze_walkers_system_shortest_path::{breadth_first, dijkstra, solve, Algorithm, ShortestPathWalker};

fn is_adjacent_chain(path: &[Position]) -> bool {
    path.windows(2)
        .all(|pair| Direction::between(pair[0], pair[1]).is_some())
}

#[test]
fn breadth_first_and_dijkstra_agree_on_length() {
    for seed in 0..30 {
        let level = generate_seeded(19, 15, seed).expect("valid dimensions");
        let [entry, exit] = [level.exits()[0], level.exits()[1]];

        let bfs = breadth_first(level.grid(), entry, exit);
        let weighted = dijkstra(level.grid(), entry, exit);

        assert_eq!(bfs.len(), weighted.len(), "seed {seed}");
        assert!(is_adjacent_chain(&bfs), "seed {seed}");
        assert!(is_adjacent_chain(&weighted), "seed {seed}");
        assert!(bfs.iter().all(|pos| level.grid().can_move(*pos)));
    }
}

#[test]
fn repeated_searches_are_identical() {
    let level = generate_seeded(21, 21, 8).expect("valid dimensions");
    let [entry, exit] = [level.exits()[0], level.exits()[1]];

    for algorithm in [Algorithm::BreadthFirst, Algorithm::Dijkstra] {
        let first = solve(level.grid(), entry, exit, algorithm);
        let second = solve(level.grid(), entry, exit, algorithm);
        assert_eq!(first, second, "{}", algorithm.name());
    }
}

#[test]
fn walker_crosses_generated_maze_in_path_length_steps() {
    let mut level = generate_seeded(15, 9, 42).expect("valid dimensions");
    let [entry, exit] = [level.exits()[0], level.exits()[1]];
    let expected = breadth_first(level.grid(), entry, exit).len();
    let id = level
        .add_walker('$', entry, exit, ShortestPathWalker::new(Algorithm::BreadthFirst))
        .expect("walker initializes");

    let (grid, actors) = level.split_mut();
    let actor = &mut actors[id.get() as usize];
    let mut steps = 0;
    while let StepOutcome::Advanced { .. } = actor.step(grid).expect("path step") {
        steps += 1;
    }

    assert_eq!(steps + 1, expected);
    assert!(actor.has_finished());
}
