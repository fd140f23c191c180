#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for maze walker adapters.

use std::{collections::HashMap, io::Write};

use anyhow::{Context, Result as AnyResult};
use maze_walkers_core::{ActorSnapshot, Position};
use maze_walkers_world::Grid;

/// Glyph drawn on cells that belong to an actor's path.
pub const TRAIL_GLYPH: char = '.';

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Text frame combining the tile glyphs, actor trails and actors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Status line drawn above the maze.
    pub banner: String,
    /// Maze rows from top to bottom.
    pub rows: Vec<String>,
}

impl Scene {
    /// Creates a scene from prepared rows.
    #[must_use]
    pub fn new<T>(banner: T, rows: Vec<String>) -> Self
    where
        T: Into<String>,
    {
        Self {
            banner: banner.into(),
            rows,
        }
    }

    /// Draws the grid with every actor and its path on top.
    ///
    /// Trails never cover an actor, regardless of the order in which the
    /// snapshots are given. Positions outside the grid are ignored.
    #[must_use]
    pub fn capture<T>(grid: &Grid, actors: &[ActorSnapshot], banner: T) -> Self
    where
        T: Into<String>,
    {
        let mut overlay: HashMap<Position, char> = HashMap::new();
        for actor in actors {
            for pos in &actor.path {
                let _ = overlay.entry(*pos).or_insert(TRAIL_GLYPH);
            }
        }
        for actor in actors {
            let _ = overlay.insert(actor.position, actor.glyph);
        }

        let mut rows = Vec::with_capacity(grid.height());
        for (row, tiles) in grid.rows().enumerate() {
            let line = tiles
                .iter()
                .enumerate()
                .map(|(col, tile)| {
                    let pos = Position::new(coord(row), coord(col));
                    overlay.get(&pos).copied().unwrap_or_else(|| tile.glyph())
                })
                .collect();
            rows.push(line);
        }

        Self::new(banner, rows)
    }
}

/// Rendering backend capable of presenting maze scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Backend that writes frames as plain text to any output stream.
#[derive(Debug)]
pub struct StreamBackend<W> {
    writer: W,
    clear_screen: bool,
}

impl<W: Write> StreamBackend<W> {
    /// Creates a backend that appends frames to `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            clear_screen: false,
        }
    }

    /// Makes every frame start by clearing an ANSI terminal.
    #[must_use]
    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for StreamBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        let mut frame = String::new();
        if self.clear_screen {
            frame.push_str(CLEAR_SCREEN);
        }
        frame.push_str(&scene.banner);
        frame.push('\n');
        for row in &scene.rows {
            frame.push_str(row);
            frame.push('\n');
        }
        frame.push('\n');

        self.writer
            .write_all(frame.as_bytes())
            .context("failed to write frame")?;
        self.writer.flush().context("failed to flush frame")?;
        Ok(())
    }
}

fn coord(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_walkers_core::ActorId;
    use maze_walkers_world::ascii;

    fn snapshot(id: u32, glyph: char, position: Position, path: Vec<Position>) -> ActorSnapshot {
        ActorSnapshot {
            id: ActorId::new(id),
            glyph,
            position,
            target: position,
            path,
        }
    }

    #[test]
    fn capture_draws_tile_glyphs() {
        let level = ascii::parse("#####\n#  =#\n#####").expect("valid level");
        let scene = Scene::capture(level.grid(), &[], "empty");

        assert_eq!(scene.banner, "empty");
        assert_eq!(scene.rows, vec!["█████", "█  =█", "█████"]);
    }

    #[test]
    fn actors_are_never_hidden_by_trails() {
        let grid = Grid::framed(5, 3);
        let walker = snapshot(
            0,
            '@',
            Position::new(1, 3),
            vec![Position::new(1, 3), Position::new(1, 2)],
        );
        let follower = snapshot(
            1,
            '&',
            Position::new(1, 1),
            vec![Position::new(1, 2), Position::new(1, 3)],
        );

        let scene = Scene::capture(&grid, &[follower, walker], "race");

        assert_eq!(scene.rows[1], "█&.@█");
    }

    #[test]
    fn capture_ignores_positions_outside_the_grid() {
        let grid = Grid::framed(3, 3);
        let lost = snapshot(0, '@', Position::new(7, 7), vec![Position::new(-1, 0)]);

        let scene = Scene::capture(&grid, &[lost], "");

        assert_eq!(scene.rows, vec!["███", "█ █", "███"]);
    }

    #[test]
    fn stream_backend_writes_banner_rows_and_blank_line() {
        let mut backend = StreamBackend::new(Vec::new());
        let scene = Scene::new("frame #1", vec!["# #".to_owned(), "#@#".to_owned()]);

        backend.present(&scene).expect("write to memory");

        let output = String::from_utf8(backend.into_inner()).expect("utf-8");
        assert_eq!(output, "frame #1\n# #\n#@#\n\n");
    }

    #[test]
    fn stream_backend_can_clear_the_terminal() {
        let mut backend = StreamBackend::new(Vec::new()).with_clear_screen(true);
        backend
            .present(&Scene::new("x", Vec::new()))
            .expect("write to memory");

        let output = String::from_utf8(backend.into_inner()).expect("utf-8");
        assert!(output.starts_with(CLEAR_SCREEN));
        assert!(output.ends_with("x\n\n"));
    }
}
