//! Contract implemented by the pluggable navigation strategies.

use std::fmt;

use maze_walkers_core::{ActorId, Position, StepOutcome};
use thiserror::Error;

use crate::{ActorState, Grid};

/// Failures raised while an actor navigates a level.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    /// Every direction out of the cell has already been tried.
    ///
    /// On a connected level this signals that the actor was placed off the
    /// walkable component or that the level violates its connectivity
    /// invariant.
    #[error("navigator is stuck at {position}")]
    Stuck {
        /// Cell the navigator could not leave.
        position: Position,
    },
    /// The navigator was stepped before it was initialized.
    #[error("navigator stepped before initialization")]
    NotInitialized,
    /// The actor has no navigator attached.
    #[error("actor {actor} has no navigator attached")]
    Unattached {
        /// Identifier of the actor lacking a navigator.
        actor: ActorId,
    },
}

/// Strategy that walks an actor through a level one step at a time.
///
/// Implementations hold only their own working state. The grid and the
/// actor are lent to every call, so a navigator never outlives or aliases
/// the level it walks.
pub trait Navigator: Send + fmt::Debug {
    /// Prepares internal state for a fresh walk.
    ///
    /// Must be called exactly once before [`Navigator::next_position`].
    fn initialize(&mut self, grid: &Grid, actor: &mut ActorState) -> Result<(), NavigationError>;

    /// Advances the actor by exactly one step.
    fn next_position(
        &mut self,
        grid: &Grid,
        actor: &mut ActorState,
    ) -> Result<StepOutcome, NavigationError>;
}
