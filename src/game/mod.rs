//! # Game Module
//!
//! Core game state for the maze engine.
//!
//! This module contains the fundamental building blocks of Oubliette:
//! - Grid geometry (positions and cardinal directions)
//! - The maze cell matrix
//! - Player state and limited-use abilities
//! - Movement resolution and the game session

pub mod leaderboard;
pub mod maze;
pub mod player;
pub mod resolver;
pub mod session;

pub use leaderboard::*;
pub use maze::*;
pub use player::*;
pub use resolver::*;
pub use session::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a 2D coordinate in the maze grid.
///
/// `x` is the column and `y` the row; `(0, 0)` is the top-left corner and
/// `y` grows downward.
///
/// # Examples
///
/// ```
/// use oubliette::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let adjacent = pos.cardinal_adjacent_positions();
/// assert_eq!(adjacent.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use oubliette::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Returns the 4 cardinal adjacent positions (no diagonals; maze
    /// movement is cardinal-only).
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        vec![
            Position::new(self.x, self.y - 1), // N
            Position::new(self.x - 1, self.y), // W
            Position::new(self.x + 1, self.y), // E
            Position::new(self.x, self.y + 1), // S
        ]
    }

    /// Returns the position `distance` cells away in the given direction.
    pub fn stepped(self, direction: Direction, distance: u32) -> Position {
        let delta = direction.to_delta();
        Position::new(
            self.x + delta.x * distance as i32,
            self.y + delta.y * distance as i32,
        )
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Directions for movement. The maze is 4-connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use oubliette::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// Converts a position delta to a direction.
    ///
    /// Returns None if the delta doesn't correspond to a unit cardinal
    /// step.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    /// Returns the four cardinal directions.
    pub fn cardinal() -> Vec<Direction> {
        vec![
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }
}

/// Unique identifier for game sessions.
pub type SessionId = Uuid;

/// Creates a new unique session ID.
pub fn new_session_id() -> SessionId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.x, 5);
        assert_eq!(pos.y, 10);
    }

    #[test]
    fn test_position_manhattan_distance() {
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, 4);
        assert_eq!(pos1.manhattan_distance(pos2), 7);
    }

    #[test]
    fn test_position_cardinal_adjacent() {
        let pos = Position::new(5, 5);
        let adjacent = pos.cardinal_adjacent_positions();
        assert_eq!(adjacent.len(), 4);
        assert!(adjacent.contains(&Position::new(5, 4))); // North
        assert!(adjacent.contains(&Position::new(4, 5))); // West
        assert!(!adjacent.contains(&Position::new(4, 4))); // No diagonal
    }

    #[test]
    fn test_position_arithmetic() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, 2);
        assert_eq!(pos1 + pos2, Position::new(8, 12));
        assert_eq!(pos1 - pos2, Position::new(2, 8));
    }

    #[test]
    fn test_position_stepped() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.stepped(Direction::North, 1), Position::new(5, 4));
        assert_eq!(pos.stepped(Direction::East, 2), Position::new(7, 5));
        assert_eq!(pos.stepped(Direction::South, 2), Position::new(5, 7));
    }

    #[test]
    fn test_direction_to_delta() {
        assert_eq!(Direction::North.to_delta(), Position::new(0, -1));
        assert_eq!(Direction::South.to_delta(), Position::new(0, 1));
        assert_eq!(Direction::East.to_delta(), Position::new(1, 0));
        assert_eq!(Direction::West.to_delta(), Position::new(-1, 0));
    }

    #[test]
    fn test_direction_delta_round_trip() {
        for dir in Direction::cardinal() {
            assert_eq!(Direction::from_delta(dir.to_delta()), Some(dir));
        }
        assert_eq!(Direction::from_delta(Position::new(1, 1)), None);
        assert_eq!(Direction::from_delta(Position::new(0, 2)), None);
    }

    #[test]
    fn test_session_id_uniqueness() {
        let id1 = new_session_id();
        let id2 = new_session_id();
        assert_ne!(id1, id2);
    }
}
