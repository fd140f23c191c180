use std::process::Command;

fn maze_walkers(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_maze-walkers"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run maze-walkers");
    assert!(
        output.status.success(),
        "maze-walkers {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf-8 output")
}

#[test]
fn genmaze_prints_the_seeded_maze_with_its_shortest_path() {
    let output = maze_walkers(&["genmaze", "7", "7", "--seed", "42"]);

    assert_eq!(
        output,
        "Seed=42 Shortest path length=11.\n\
         █&█████\n\
         █.███ █\n\
         █.....█\n\
         ███ █.█\n\
         █ ███.█\n\
         █    .█\n\
         █████.█\n\
         \n"
    );
}

#[test]
fn sequential_race_announces_a_winner() {
    let output = maze_walkers(&[
        "race",
        "15",
        "9",
        "--seed",
        "3",
        "--sequential",
        "--delay-ms",
        "0",
        "--no-clear",
    ]);

    assert!(output.starts_with("render #1\n"));
    assert!(output.contains("Woohoo! Walker #"));
    assert!(output.contains("Seed=3"));
}

#[test]
fn static_level_reaches_its_exit() {
    let output = maze_walkers(&["static", "--delay-ms", "0", "--no-clear"]);

    assert!(output.starts_with("Iteration #1\n"));
    assert!(output.contains("Woohoo! Walker #0 arrived"));
}
