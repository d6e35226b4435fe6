//! # Input Module
//!
//! The command vocabulary a frontend feeds into a session.
//!
//! Key bindings, menus, and input devices live with the caller; the
//! engine only understands these commands, dispatched through
//! [`GameSession::execute`](crate::GameSession::execute).

use crate::game::{Direction, Position};
use serde::{Deserialize, Serialize};

/// One player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Act in a direction: a step, or a jump or wall break while the
    /// matching mode is armed
    Move(Direction),
    /// Arm jump mode, or disarm it if already armed
    ToggleJumpMode,
    /// Arm wall-break mode, or disarm it if already armed
    ToggleWallBreakerMode,
    /// Abandon the run; counts as a loss
    GiveUp,
}

impl Command {
    /// Translates a raw movement delta into a command.
    ///
    /// Frontends that track pointer or key input as deltas can use this
    /// instead of mapping to [`Direction`] themselves. Returns `None`
    /// for anything but a unit cardinal step.
    ///
    /// # Examples
    ///
    /// ```
    /// use oubliette::{Command, Direction, Position};
    ///
    /// let command = Command::from_delta(Position::new(0, -1));
    /// assert_eq!(command, Some(Command::Move(Direction::North)));
    /// assert_eq!(Command::from_delta(Position::new(1, 1)), None);
    /// ```
    pub fn from_delta(delta: Position) -> Option<Command> {
        Direction::from_delta(delta).map(Command::Move)
    }
}
