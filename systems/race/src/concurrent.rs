//! Threaded walk-through driver.
//!
//! Every actor walks on its own scoped thread borrowing the shared grid.
//! Steps are reported over a channel to the calling thread, which keeps the
//! latest snapshot of every actor and forwards each event to the observer.
//! A report carries only the path entries recorded since the previous one.

use std::{
    ops::ControlFlow,
    panic,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Sender},
    },
    thread,
};

use log::{debug, info};
use maze_walkers_core::{ActorSnapshot, Event, Position, StepOutcome};
use maze_walkers_world::{query, Actor, Grid, Level, NavigationError};

use crate::{Config, RaceStatus};

struct Report {
    event: Event,
    position: Position,
    trail: Trail,
}

enum Trail {
    Extended(Vec<Position>),
    Replaced(Vec<Position>),
}

impl Report {
    fn apply(self, snapshot: &mut ActorSnapshot) {
        snapshot.position = self.position;
        match self.trail {
            Trail::Extended(cells) => snapshot.path.extend(cells),
            Trail::Replaced(cells) => snapshot.path = cells,
        }
    }
}

/// Tracks how much of an actor's path the aggregator already holds.
struct Reporter<'a> {
    reports: &'a Sender<Report>,
    sent: usize,
    last: Option<Position>,
}

impl<'a> Reporter<'a> {
    fn new(reports: &'a Sender<Report>, actor: &Actor) -> Self {
        Self {
            reports,
            sent: actor.path().len(),
            last: actor.path().last().copied(),
        }
    }

    fn send(&mut self, event: Event, actor: &Actor) -> bool {
        let path = actor.path();
        let kept = self.sent <= path.len()
            && self.last == self.sent.checked_sub(1).and_then(|i| path.get(i)).copied();
        let trail = if kept {
            Trail::Extended(path[self.sent..].to_vec())
        } else {
            Trail::Replaced(path.to_vec())
        };
        self.sent = path.len();
        self.last = path.last().copied();
        self.reports
            .send(Report {
                event,
                position: actor.position(),
                trail,
            })
            .is_ok()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WorkerExit {
    Finished,
    Idle,
    FrameLimit,
    Cancelled,
}

/// Walks every actor concurrently until one arrives or all of them stop.
///
/// Navigators are initialized on the calling thread before any walker
/// starts. The observer receives each event together with the most recent
/// snapshot of every actor; snapshots of other actors may lag behind by a
/// step. Returning [`ControlFlow::Break`] cancels the remaining walkers and
/// the race reports [`RaceStatus::Cancelled`].
///
/// The first navigation failure, in actor order, cancels the race and is
/// returned once every walker has stopped.
pub fn run_concurrently<F>(
    level: &mut Level,
    config: &Config,
    mut observer: F,
) -> Result<RaceStatus, NavigationError>
where
    F: FnMut(&Event, &[ActorSnapshot]) -> ControlFlow<()>,
{
    {
        let (grid, actors) = level.split_mut();
        for actor in actors.iter_mut() {
            actor.initialize(grid)?;
        }
    }

    let mut snapshots = query::actor_snapshots(level);
    let cancel = AtomicBool::new(false);
    let mut winner = None;
    let mut interrupted = false;
    let (grid, actors) = level.split_mut();

    let exits = thread::scope(|scope| {
        let (reports, inbox) = mpsc::channel();
        let handles: Vec<_> = actors
            .iter_mut()
            .map(|actor| {
                let reports = reports.clone();
                let cancel = &cancel;
                scope.spawn(move || walk_through(grid, actor, config, cancel, &reports))
            })
            .collect();
        drop(reports);

        for report in inbox {
            let event = report.event;
            if let Some(slot) = snapshots.get_mut(event.actor().get() as usize) {
                report.apply(slot);
            }
            if let Event::ActorFinished { actor } = event {
                let _ = winner.get_or_insert(actor);
            }
            if interrupted {
                continue;
            }
            if observer(&event, &snapshots).is_break() {
                debug!("observer cancelled the race");
                interrupted = true;
                cancel.store(true, Ordering::Relaxed);
            }
        }

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(exit) => exit,
                Err(payload) => panic::resume_unwind(payload),
            })
            .collect::<Vec<_>>()
    });

    let mut stopped = Vec::with_capacity(exits.len());
    for exit in exits {
        stopped.push(exit?);
    }

    let status = if interrupted {
        RaceStatus::Cancelled
    } else if let Some(actor) = winner {
        RaceStatus::Finished { actor }
    } else if stopped.iter().all(|exit| *exit == WorkerExit::Idle) {
        RaceStatus::Stalled
    } else if stopped.contains(&WorkerExit::FrameLimit) {
        RaceStatus::FrameLimit
    } else {
        RaceStatus::Cancelled
    };
    info!("concurrent race of {} walkers ended: {status:?}", stopped.len());
    Ok(status)
}

fn walk_through(
    grid: &Grid,
    actor: &mut Actor,
    config: &Config,
    cancel: &AtomicBool,
    reports: &Sender<Report>,
) -> Result<WorkerExit, NavigationError> {
    let id = actor.id();
    let mut reporter = Reporter::new(reports, actor);
    if actor.has_finished() {
        cancel.store(true, Ordering::Relaxed);
        let _ = reporter.send(Event::ActorFinished { actor: id }, actor);
        return Ok(WorkerExit::Finished);
    }

    for _ in 0..config.max_frames() {
        if cancel.load(Ordering::Relaxed) {
            return Ok(WorkerExit::Cancelled);
        }

        let outcome = match actor.step(grid) {
            Ok(outcome) => outcome,
            Err(error) => {
                cancel.store(true, Ordering::Relaxed);
                return Err(error);
            }
        };

        if !reporter.send(Event::from_step(id, outcome), actor) {
            return Ok(WorkerExit::Cancelled);
        }

        match outcome {
            StepOutcome::Idle => return Ok(WorkerExit::Idle),
            StepOutcome::Advanced { .. } if actor.has_finished() => {
                cancel.store(true, Ordering::Relaxed);
                let _ = reporter.send(Event::ActorFinished { actor: id }, actor);
                return Ok(WorkerExit::Finished);
            }
            StepOutcome::Advanced { .. } => {}
        }

        if !config.step_delay().is_zero() {
            thread::sleep(config.step_delay());
        }
    }

    Ok(WorkerExit::FrameLimit)
}
