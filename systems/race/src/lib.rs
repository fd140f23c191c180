#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Drives every actor of a level towards its target.
//!
//! [`Race`] is the frame loop: each tick steps the actors one after another
//! in identifier order, which keeps replays deterministic.
//! [`run_concurrently`] walks every actor on its own thread and funnels the
//! resulting events to the caller.

mod concurrent;

use std::{ops::ControlFlow, thread, time::Duration};

use log::info;
use maze_walkers_core::{ActorId, Event, StepOutcome};
use maze_walkers_world::{Level, NavigationError};

pub use concurrent::run_concurrently;

/// Limits and pacing shared by both drivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    max_frames: u32,
    step_delay: Duration,
}

impl Config {
    /// Creates a new configuration.
    #[must_use]
    pub const fn new(max_frames: u32, step_delay: Duration) -> Self {
        Self {
            max_frames,
            step_delay,
        }
    }

    /// Maximum number of steps taken per actor.
    #[must_use]
    pub const fn max_frames(&self) -> u32 {
        self.max_frames
    }

    /// Pause inserted after every step.
    #[must_use]
    pub const fn step_delay(&self) -> Duration {
        self.step_delay
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(10_000, Duration::ZERO)
    }
}

/// State of a race after a driver step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RaceStatus {
    /// At least one actor still has work to do.
    Running,
    /// An actor reached its target, ending the race.
    Finished {
        /// First actor to arrive.
        actor: ActorId,
    },
    /// No actor moved.
    Stalled,
    /// The configured frame budget was used up.
    FrameLimit,
    /// The observer asked the driver to stop.
    Cancelled,
}

impl RaceStatus {
    /// Reports whether the race ended.
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Sequential frame-loop controller.
#[derive(Debug)]
pub struct Race {
    config: Config,
    frame: u32,
}

impl Race {
    /// Creates a controller that has not run any frame yet.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, frame: 0 }
    }

    /// Number of ticks run since the last [`Race::start`].
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Initializes the navigator of every actor and rewinds the frame count.
    pub fn start(&mut self, level: &mut Level) -> Result<(), NavigationError> {
        self.frame = 0;
        let (grid, actors) = level.split_mut();
        for actor in actors.iter_mut() {
            actor.initialize(grid)?;
        }
        Ok(())
    }

    /// Steps every unfinished actor once, in identifier order.
    ///
    /// One event is appended per actor, followed by an
    /// [`Event::ActorFinished`] for every actor that arrived during the tick.
    /// An actor already on its target is not stepped again.
    pub fn tick(
        &mut self,
        level: &mut Level,
        out: &mut Vec<Event>,
    ) -> Result<RaceStatus, NavigationError> {
        if self.frame >= self.config.max_frames {
            return Ok(RaceStatus::FrameLimit);
        }
        self.frame += 1;

        let (grid, actors) = level.split_mut();
        let mut winner = None;
        let mut moved = false;
        for actor in actors.iter_mut() {
            let id = actor.id();
            if actor.has_finished() {
                out.push(Event::ActorFinished { actor: id });
                let _ = winner.get_or_insert(id);
                continue;
            }

            let outcome = actor.step(grid)?;
            moved |= matches!(outcome, StepOutcome::Advanced { .. });
            out.push(Event::from_step(id, outcome));
            if actor.has_finished() {
                out.push(Event::ActorFinished { actor: id });
                let _ = winner.get_or_insert(id);
            }
        }

        Ok(match winner {
            Some(actor) => RaceStatus::Finished { actor },
            None if !moved => RaceStatus::Stalled,
            None if self.frame >= self.config.max_frames => RaceStatus::FrameLimit,
            None => RaceStatus::Running,
        })
    }

    /// Starts the race and ticks until it ends.
    ///
    /// The observer sees the frame number, the events of that frame and the
    /// level after every tick. Returning [`ControlFlow::Break`] stops the race
    /// with [`RaceStatus::Cancelled`].
    pub fn run<F>(&mut self, level: &mut Level, mut observer: F) -> Result<RaceStatus, NavigationError>
    where
        F: FnMut(u32, &[Event], &Level) -> ControlFlow<()>,
    {
        self.start(level)?;
        let mut events = Vec::new();
        loop {
            events.clear();
            let mut status = self.tick(level, &mut events)?;
            if observer(self.frame, &events, level).is_break() {
                status = RaceStatus::Cancelled;
            }
            if status.is_over() {
                info!("race ended after {} frames: {status:?}", self.frame);
                return Ok(status);
            }
            if !self.config.step_delay.is_zero() {
                thread::sleep(self.config.step_delay);
            }
        }
    }
}
