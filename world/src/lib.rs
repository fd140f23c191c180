#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for the maze walkers.
//!
//! A [`Level`] owns the tile [`Grid`], the canonical list of [`Actor`]s and
//! the exit cells. The grid is immutable once the level exists; navigation
//! systems only ever receive `&Grid` together with the [`ActorState`] of the
//! actor they drive.

pub mod ascii;
mod grid;
mod navigation;

use log::debug;
use maze_walkers_core::{ActorId, ActorSnapshot, Position, StepOutcome};

pub use grid::{Grid, GridError};
pub use navigation::{NavigationError, Navigator};

/// Mutable state of an actor that navigators read and update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorState {
    id: ActorId,
    glyph: char,
    position: Position,
    target: Position,
    path: Vec<Position>,
}

impl ActorState {
    fn new(glyph: char, position: Position, target: Position) -> Self {
        Self {
            id: ActorId::default(),
            glyph,
            position,
            target,
            path: Vec::new(),
        }
    }

    /// Identifier assigned by the owning level.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Character drawn at the actor's position.
    #[must_use]
    pub const fn glyph(&self) -> char {
        self.glyph
    }

    /// Cell currently occupied by the actor.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Cell the actor is heading for.
    #[must_use]
    pub const fn target(&self) -> Position {
        self.target
    }

    /// Visited or planned cells, in the order the navigator recorded them.
    #[must_use]
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    /// Reports whether the actor stands on its target.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.position == self.target
    }

    /// Moves the actor to a new cell and reports the step.
    pub fn move_to(&mut self, destination: Position) -> StepOutcome {
        let from = self.position;
        self.position = destination;
        StepOutcome::Advanced {
            from,
            to: destination,
        }
    }

    /// Replaces the destination the actor heads for.
    pub fn set_target(&mut self, target: Position) {
        self.target = target;
    }

    /// Appends a cell to the recorded path.
    pub fn record(&mut self, pos: Position) {
        self.path.push(pos);
    }

    /// Replaces the recorded path wholesale.
    pub fn replace_path(&mut self, path: Vec<Position>) {
        self.path = path;
    }

    /// Forgets every recorded cell.
    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    /// Captures a read-only snapshot for presentation.
    #[must_use]
    pub fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            id: self.id,
            glyph: self.glyph,
            position: self.position,
            target: self.target,
            path: self.path.clone(),
        }
    }
}

/// Something that moves around on the level, driven by an attached navigator.
#[derive(Debug)]
pub struct Actor {
    state: ActorState,
    navigator: Option<Box<dyn Navigator>>,
}

impl Actor {
    /// Creates an actor without a navigator.
    #[must_use]
    pub fn new(glyph: char, start: Position, target: Position) -> Self {
        Self {
            state: ActorState::new(glyph, start, target),
            navigator: None,
        }
    }

    /// Attaches a navigator, consuming and returning the actor.
    #[must_use]
    pub fn with_navigator<N>(mut self, navigator: N) -> Self
    where
        N: Navigator + 'static,
    {
        self.attach(Box::new(navigator));
        self
    }

    /// Replaces the attached navigator. The new navigator still needs
    /// [`Actor::initialize`].
    pub fn attach(&mut self, navigator: Box<dyn Navigator>) {
        self.navigator = Some(navigator);
    }

    /// Identifier assigned by the owning level.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.state.id
    }

    /// Character drawn at the actor's position.
    #[must_use]
    pub const fn glyph(&self) -> char {
        self.state.glyph
    }

    /// Cell currently occupied by the actor.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.state.position
    }

    /// Cell the actor is heading for.
    #[must_use]
    pub const fn target(&self) -> Position {
        self.state.target
    }

    /// Replaces the destination the actor heads for.
    pub fn set_target(&mut self, target: Position) {
        self.state.set_target(target);
    }

    /// Visited or planned cells recorded by the navigator.
    #[must_use]
    pub fn path(&self) -> &[Position] {
        self.state.path()
    }

    /// Reports whether the actor stands on its target.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.state.has_finished()
    }

    /// Read-only view of the navigated state.
    #[must_use]
    pub const fn state(&self) -> &ActorState {
        &self.state
    }

    /// Prepares the attached navigator for a fresh walk.
    pub fn initialize(&mut self, grid: &Grid) -> Result<(), NavigationError> {
        let actor = self.state.id;
        let navigator = self
            .navigator
            .as_mut()
            .ok_or(NavigationError::Unattached { actor })?;
        navigator.initialize(grid, &mut self.state)
    }

    /// Advances the actor by one step using the attached navigator.
    pub fn step(&mut self, grid: &Grid) -> Result<StepOutcome, NavigationError> {
        let actor = self.state.id;
        let navigator = self
            .navigator
            .as_mut()
            .ok_or(NavigationError::Unattached { actor })?;
        navigator.next_position(grid, &mut self.state)
    }

    /// Captures a read-only snapshot for presentation.
    #[must_use]
    pub fn snapshot(&self) -> ActorSnapshot {
        self.state.snapshot()
    }
}

/// Level map, the actors walking it and its exits.
#[derive(Debug)]
pub struct Level {
    grid: Grid,
    actors: Vec<Actor>,
    exits: Vec<Position>,
}

impl Level {
    /// Creates a level without actors.
    #[must_use]
    pub fn new(grid: Grid, exits: Vec<Position>) -> Self {
        Self {
            grid,
            actors: Vec::new(),
            exits,
        }
    }

    /// Read-only access to the tile grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Exit cells carved into the level border.
    #[must_use]
    pub fn exits(&self) -> &[Position] {
        &self.exits
    }

    /// Actors in identifier order.
    #[must_use]
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Mutable access to the actors in identifier order.
    pub fn actors_mut(&mut self) -> &mut [Actor] {
        &mut self.actors
    }

    /// Looks up an actor by identifier.
    #[must_use]
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id() == id)
    }

    /// Lends the grid and the actors at the same time.
    pub fn split_mut(&mut self) -> (&Grid, &mut [Actor]) {
        (&self.grid, &mut self.actors)
    }

    /// Adds an actor and returns the identifier assigned to it.
    pub fn add_actor(&mut self, mut actor: Actor) -> ActorId {
        let id = self.next_actor_id();
        actor.state.id = id;
        self.actors.push(actor);
        id
    }

    /// Creates an actor, attaches and initializes its navigator, then adds it.
    pub fn add_walker<N>(
        &mut self,
        glyph: char,
        start: Position,
        target: Position,
        navigator: N,
    ) -> Result<ActorId, NavigationError>
    where
        N: Navigator + 'static,
    {
        let mut actor = Actor::new(glyph, start, target).with_navigator(navigator);
        actor.state.id = self.next_actor_id();
        actor.initialize(&self.grid)?;
        debug!("added walker {} heading from {start} to {target}", actor.id());
        Ok(self.add_actor(actor))
    }

    fn next_actor_id(&self) -> ActorId {
        ActorId::new(u32::try_from(self.actors.len()).unwrap_or(u32::MAX))
    }
}

/// Query functions that provide read-only access to the level state.
pub mod query {
    use maze_walkers_core::{ActorId, ActorSnapshot, Position};

    use super::Level;

    /// Captures snapshots of every actor in identifier order.
    #[must_use]
    pub fn actor_snapshots(level: &Level) -> Vec<ActorSnapshot> {
        level.actors.iter().map(super::Actor::snapshot).collect()
    }

    /// Identifiers of the actors standing on their targets.
    #[must_use]
    pub fn finished_actors(level: &Level) -> Vec<ActorId> {
        level
            .actors
            .iter()
            .filter(|actor| actor.has_finished())
            .map(super::Actor::id)
            .collect()
    }

    /// Cells occupied by actors other than `except`.
    #[must_use]
    pub fn occupied_cells(level: &Level, except: Option<ActorId>) -> Vec<Position> {
        level
            .actors
            .iter()
            .filter(|actor| Some(actor.id()) != except)
            .map(super::Actor::position)
            .collect()
    }
}
