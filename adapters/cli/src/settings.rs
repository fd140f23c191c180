//! Optional TOML settings file supplying defaults for the command line.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use clap::ValueEnum;
use maze_walkers_system_race::Config;
use maze_walkers_system_shortest_path::Algorithm;
use serde::Deserialize;

/// Navigation strategy attached to generated walkers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WalkerKind {
    /// Local straight-line heuristic.
    Line,
    /// Precomputed shortest path.
    Shortest,
}

/// Graph search used by shortest-path walkers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SearchKind {
    /// Breadth-first search.
    Bfs,
    /// Dijkstra search.
    Dijkstra,
}

impl From<SearchKind> for Algorithm {
    fn from(kind: SearchKind) -> Self {
        match kind {
            SearchKind::Bfs => Self::BreadthFirst,
            SearchKind::Dijkstra => Self::Dijkstra,
        }
    }
}

/// Values every command falls back to when a flag is absent.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Maze width in columns.
    pub(crate) width: usize,
    /// Maze height in rows.
    pub(crate) height: usize,
    /// Fixed generator seed; a clock-derived seed is used when absent.
    pub(crate) seed: Option<u64>,
    /// Strategy attached to racing walkers.
    pub(crate) walker: WalkerKind,
    /// Search used by shortest-path walkers.
    pub(crate) algorithm: SearchKind,
    /// Pause between frames in milliseconds.
    pub(crate) step_delay_ms: u64,
    /// Maximum number of frames before a race is abandoned.
    pub(crate) max_frames: u32,
    /// Whether frames start by clearing the terminal.
    pub(crate) clear_screen: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 40,
            height: 20,
            seed: None,
            walker: WalkerKind::Line,
            algorithm: SearchKind::Bfs,
            step_delay_ms: 100,
            max_frames: 10_000,
            clear_screen: true,
        }
    }
}

impl Settings {
    /// Reads settings from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Parses settings from TOML text; missing keys keep their defaults.
    pub(crate) fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse settings toml contents")
    }

    /// Race driver limits derived from the settings.
    pub(crate) fn race_config(&self) -> Config {
        Config::new(self.max_frames, Duration::from_millis(self.step_delay_ms))
    }
}
