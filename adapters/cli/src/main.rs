#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates mazes and races walkers through them.

mod settings;

use std::{
    fs,
    io::{self, Stdout},
    ops::ControlFlow,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use maze_walkers_core::Position;
use maze_walkers_rendering::{RenderingBackend, Scene, StreamBackend};
use maze_walkers_system_generation::generate_maze;
use maze_walkers_system_line_walker::LineWalker;
use maze_walkers_system_race::{run_concurrently, Race, RaceStatus};
use maze_walkers_system_shortest_path::ShortestPathWalker;
use maze_walkers_world::{ascii, query, Level};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::settings::{SearchKind, Settings, WalkerKind};

const STATIC_LEVEL: &str = "\
#@#################
# #####           #
#     ## ######   #
##### #         # #
#     #  # #  # # #
# #####  # #### # #
#        #      # #
#################=#";

/// Maze generation and walker races rendered as text.
#[derive(Debug, Parser)]
#[command(name = "maze-walkers", version, about)]
struct Cli {
    /// TOML file providing defaults for every flag.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a maze and print its shortest exit-to-exit path.
    Genmaze(MazeArgs),
    /// Race two walkers between the exits of a generated maze.
    Race(RaceArgs),
    /// Walk the actors of an ASCII level to its first exit.
    Static(StaticArgs),
}

#[derive(Debug, Args)]
struct MazeArgs {
    /// Maze width in columns.
    width: Option<usize>,
    /// Maze height in rows.
    height: Option<usize>,
    /// Generator seed; derived from the clock when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Graph search used for shortest paths.
    #[arg(long, value_enum)]
    algorithm: Option<SearchKind>,
}

#[derive(Debug, Args)]
struct PacingArgs {
    /// Pause between frames in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,
    /// Maximum number of frames before giving up.
    #[arg(long)]
    max_frames: Option<u32>,
    /// Append frames instead of clearing the terminal.
    #[arg(long)]
    no_clear: bool,
}

#[derive(Debug, Args)]
struct RaceArgs {
    #[command(flatten)]
    maze: MazeArgs,
    #[command(flatten)]
    pacing: PacingArgs,
    /// Navigation strategy of both walkers.
    #[arg(long, value_enum)]
    walker: Option<WalkerKind>,
    /// Step all walkers in turn on one thread instead of one thread each.
    #[arg(long)]
    sequential: bool,
}

#[derive(Debug, Args)]
struct StaticArgs {
    /// ASCII level to load instead of the built-in one.
    #[arg(long)]
    level: Option<PathBuf>,
    #[command(flatten)]
    pacing: PacingArgs,
    /// Graph search used for shortest paths.
    #[arg(long, value_enum)]
    algorithm: Option<SearchKind>,
}

/// Entry point for the maze walkers command-line interface.
fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let mut backend = StreamBackend::new(io::stdout());
    match cli.command {
        Command::Genmaze(args) => {
            apply_maze_args(&mut settings, &args);
            genmaze(&settings, &mut backend)
        }
        Command::Race(args) => {
            apply_maze_args(&mut settings, &args.maze);
            apply_pacing_args(&mut settings, &args.pacing);
            if let Some(walker) = args.walker {
                settings.walker = walker;
            }
            race(&settings, args.sequential, backend)
        }
        Command::Static(args) => {
            apply_pacing_args(&mut settings, &args.pacing);
            if let Some(algorithm) = args.algorithm {
                settings.algorithm = algorithm;
            }
            let text = match &args.level {
                Some(path) => fs::read_to_string(path)
                    .with_context(|| format!("failed to read level from {}", path.display()))?,
                None => STATIC_LEVEL.to_owned(),
            };
            walk_static(&settings, &text, backend)
        }
    }
}

fn apply_maze_args(settings: &mut Settings, args: &MazeArgs) {
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if let Some(algorithm) = args.algorithm {
        settings.algorithm = algorithm;
    }
}

fn apply_pacing_args(settings: &mut Settings, args: &PacingArgs) {
    if let Some(delay) = args.delay_ms {
        settings.step_delay_ms = delay;
    }
    if let Some(max_frames) = args.max_frames {
        settings.max_frames = max_frames;
    }
    if args.no_clear {
        settings.clear_screen = false;
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn generate(settings: &Settings) -> Result<(Level, u64)> {
    let seed = settings.seed.unwrap_or_else(clock_seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let level = generate_maze(settings.width, settings.height, &mut rng)
        .with_context(|| format!("failed to generate maze with seed {seed}"))?;
    info!(
        "generated {}x{} maze with seed {seed}",
        settings.width, settings.height
    );
    Ok((level, seed))
}

fn exits(level: &Level) -> Result<[Position; 2]> {
    match level.exits() {
        [entry, exit, ..] => Ok([*entry, *exit]),
        _ => bail!("level needs two exits, found {}", level.exits().len()),
    }
}

fn present(backend: &mut StreamBackend<Stdout>, level: &Level, banner: String) -> Result<()> {
    let scene = Scene::capture(level.grid(), &query::actor_snapshots(level), banner);
    backend.present(&scene)
}

fn genmaze(settings: &Settings, backend: &mut StreamBackend<Stdout>) -> Result<()> {
    let (mut level, seed) = generate(settings)?;
    let [entry, exit] = exits(&level)?;
    // Initializing the walker plans its path; the actor is never stepped.
    let id = level
        .add_walker(
            '&',
            entry,
            exit,
            ShortestPathWalker::new(settings.algorithm.into()),
        )
        .context("failed to plan the shortest path")?;
    let length = level.actor(id).map_or(0, |actor| actor.path().len());

    present(
        backend,
        &level,
        format!("Seed={seed} Shortest path length={length}."),
    )
}

fn attach_walker(
    level: &mut Level,
    glyph: char,
    start: Position,
    target: Position,
    settings: &Settings,
) -> Result<()> {
    let _ = match settings.walker {
        WalkerKind::Line => level.add_walker(glyph, start, target, LineWalker::new()),
        WalkerKind::Shortest => level.add_walker(
            glyph,
            start,
            target,
            ShortestPathWalker::new(settings.algorithm.into()),
        ),
    }
    .with_context(|| format!("failed to start walker {glyph}"))?;
    Ok(())
}

fn race(settings: &Settings, sequential: bool, backend: StreamBackend<Stdout>) -> Result<()> {
    let (mut level, seed) = generate(settings)?;
    let [entry, exit] = exits(&level)?;
    attach_walker(&mut level, '@', entry, exit, settings)?;
    attach_walker(&mut level, '&', exit, entry, settings)?;

    let mut backend = backend.with_clear_screen(settings.clear_screen);
    let (status, frames) = if sequential {
        drive_sequential(&mut level, settings, &mut backend, "render")?
    } else {
        drive_concurrent(&mut level, settings, &mut backend)?
    };

    present(
        &mut backend,
        &level,
        format!("{} after {frames} iterations. Seed={seed}", verdict(status)),
    )
}

fn walk_static(settings: &Settings, text: &str, backend: StreamBackend<Stdout>) -> Result<()> {
    let mut level = ascii::parse(text).context("failed to parse ascii level")?;
    let Some(&exit) = level.exits().first() else {
        bail!("ascii level has no exit");
    };
    for actor in level.actors_mut() {
        actor.set_target(exit);
        actor.attach(Box::new(ShortestPathWalker::new(settings.algorithm.into())));
    }

    let mut backend = backend.with_clear_screen(settings.clear_screen);
    let (status, frames) = drive_sequential(&mut level, settings, &mut backend, "Iteration")?;
    present(
        &mut backend,
        &level,
        format!("{} after {frames} iterations.", verdict(status)),
    )
}

fn drive_sequential(
    level: &mut Level,
    settings: &Settings,
    backend: &mut StreamBackend<Stdout>,
    label: &str,
) -> Result<(RaceStatus, u32)> {
    let mut race = Race::new(settings.race_config());
    let mut failure = None;
    let status = race.run(level, |frame, _, level| {
        match present(backend, level, format!("{label} #{frame}")) {
            Ok(()) => ControlFlow::Continue(()),
            Err(error) => {
                failure = Some(error);
                ControlFlow::Break(())
            }
        }
    })?;
    if let Some(error) = failure {
        return Err(error);
    }
    Ok((status, race.frame()))
}

fn drive_concurrent(
    level: &mut Level,
    settings: &Settings,
    backend: &mut StreamBackend<Stdout>,
) -> Result<(RaceStatus, u32)> {
    let grid = level.grid().clone();
    let mut frames = 0_u32;
    let mut failure = None;
    let status = run_concurrently(level, &settings.race_config(), |_, snapshots| {
        frames += 1;
        let scene = Scene::capture(&grid, snapshots, format!("render #{frames}"));
        match backend.present(&scene) {
            Ok(()) => ControlFlow::Continue(()),
            Err(error) => {
                failure = Some(error);
                ControlFlow::Break(())
            }
        }
    })?;
    if let Some(error) = failure {
        return Err(error);
    }
    Ok((status, frames))
}

fn verdict(status: RaceStatus) -> String {
    match status {
        RaceStatus::Finished { actor } => format!("Woohoo! Walker {actor} arrived"),
        RaceStatus::Stalled => "Every walker gave up".to_owned(),
        RaceStatus::FrameLimit => "Out of frames".to_owned(),
        RaceStatus::Cancelled => "Cancelled".to_owned(),
        RaceStatus::Running => "Still running".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let cli = Cli::try_parse_from([
            "maze-walkers",
            "race",
            "31",
            "17",
            "--seed",
            "42",
            "--walker",
            "shortest",
            "--algorithm",
            "dijkstra",
            "--delay-ms",
            "0",
            "--no-clear",
        ])
        .expect("valid arguments");
        let Command::Race(args) = cli.command else {
            panic!("expected race command");
        };

        let mut settings = Settings::default();
        apply_maze_args(&mut settings, &args.maze);
        apply_pacing_args(&mut settings, &args.pacing);

        assert_eq!(settings.width, 31);
        assert_eq!(settings.height, 17);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.algorithm, SearchKind::Dijkstra);
        assert_eq!(settings.step_delay_ms, 0);
        assert!(!settings.clear_screen);
        assert_eq!(args.walker, Some(WalkerKind::Shortest));
        assert!(!args.sequential);
    }

    #[test]
    fn absent_flags_keep_settings() {
        let cli = Cli::try_parse_from(["maze-walkers", "genmaze"]).expect("valid arguments");
        let Command::Genmaze(args) = cli.command else {
            panic!("expected genmaze command");
        };

        let mut settings = Settings::from_toml("width = 9\nseed = 7").expect("valid settings");
        apply_maze_args(&mut settings, &args);

        assert_eq!(settings.width, 9);
        assert_eq!(settings.height, 20);
        assert_eq!(settings.seed, Some(7));
    }

    #[test]
    fn built_in_static_level_has_an_actor_and_an_exit() {
        let level = ascii::parse(STATIC_LEVEL).expect("valid level");
        assert_eq!(level.actors().len(), 1);
        assert_eq!(level.exits(), &[Position::new(7, 17)]);
    }
}
