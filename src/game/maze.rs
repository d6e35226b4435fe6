//! # Maze Module
//!
//! The cell matrix the whole game plays on.
//!
//! A [`Maze`] is a square grid of [`Cell`]s. Generation carves corridors
//! into an all-wall grid and stations traps, portals, a key, and the
//! treasure on carved cells; the movement resolver then reads and mutates
//! the same grid during play.

use crate::{OublietteError, OublietteResult, Position};
use serde::{Deserialize, Serialize};

/// Identifier linking the portals of one teleport network.
pub type PortalGroupId = u32;

/// Identifier tying a key pickup to the portal group it unlocks.
pub type KeyId = u32;

/// Contents of a single maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// Solid wall; bumping into it costs a hit point
    Wall,
    /// Open corridor the player has not stepped on yet
    Path,
    /// Open corridor the player has already stepped on
    TakenPath,
    /// Costs a hit point on entry, then turns into path
    Trap,
    /// Reaching this cell wins the game
    Treasure,
    /// Teleporter; usable only while holding the matching key
    Portal { group: PortalGroupId, key: KeyId },
    /// Key pickup; unlocks the portals demanding `id`
    Key { id: KeyId },
}

impl Cell {
    /// Whether this cell is solid.
    pub fn is_wall(self) -> bool {
        matches!(self, Cell::Wall)
    }

    /// Whether the cell is part of the carved corridor network. Traps,
    /// portals, keys, and the treasure all sit on carved cells.
    pub fn is_passable(self) -> bool {
        !self.is_wall()
    }
}

/// A square grid of cells.
///
/// Indexed by [`Position`] with `x` as the column and `y` as the row;
/// `(0, 0)` is the top-left corner.
///
/// # Examples
///
/// ```
/// use oubliette::{Cell, Maze, Position};
///
/// let maze = Maze::filled(9, Cell::Wall).unwrap();
/// assert_eq!(maze.get(Position::new(4, 4)), Some(Cell::Wall));
/// assert_eq!(maze.get(Position::new(9, 0)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    /// Side length in cells
    pub size: u32,
    /// Cell matrix, indexed `cells[y][x]`
    pub cells: Vec<Vec<Cell>>,
}

impl Maze {
    /// Creates a maze with every cell set to `fill`.
    ///
    /// The side length must be odd and at least 5: corridors are carved on
    /// the odd-coordinate lattice, which only tiles an odd-sized grid with
    /// an intact border ring.
    pub fn filled(size: u32, fill: Cell) -> OublietteResult<Self> {
        if size < 5 || size % 2 == 0 {
            return Err(OublietteError::InvalidState(format!(
                "maze size must be odd and at least 5, got {}",
                size
            )));
        }
        Ok(Self {
            size,
            cells: vec![vec![fill; size as usize]; size as usize],
        })
    }

    /// Whether the position lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.size as i32 && pos.y < self.size as i32
    }

    /// Whether the position lies strictly inside the border ring.
    pub fn is_inner(&self, pos: Position) -> bool {
        pos.x > 0 && pos.y > 0 && pos.x < self.size as i32 - 1 && pos.y < self.size as i32 - 1
    }

    /// Returns the cell at `pos`, or `None` outside the grid.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if self.in_bounds(pos) {
            Some(self.cells[pos.y as usize][pos.x as usize])
        } else {
            None
        }
    }

    /// Replaces the cell at `pos`.
    pub fn set(&mut self, pos: Position, cell: Cell) -> OublietteResult<()> {
        if !self.in_bounds(pos) {
            return Err(OublietteError::InvalidState(format!(
                "position ({}, {}) is outside the {}x{} grid",
                pos.x, pos.y, self.size, self.size
            )));
        }
        self.cells[pos.y as usize][pos.x as usize] = cell;
        Ok(())
    }

    /// The fixed cell the player starts on: one column in from the left
    /// border, one row up from the bottom border.
    pub fn start_position(&self) -> Position {
        Position::new(1, self.size as i32 - 2)
    }

    /// All positions whose cell satisfies `predicate`, scanned row-major.
    pub fn positions_of(&self, predicate: impl Fn(Cell) -> bool) -> Vec<Position> {
        let mut positions = Vec::new();
        for (y, row) in self.cells.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if predicate(cell) {
                    positions.push(Position::new(x as i32, y as i32));
                }
            }
        }
        positions
    }

    /// Number of cells satisfying `predicate`.
    pub fn count(&self, predicate: impl Fn(Cell) -> bool) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| predicate(cell))
            .count()
    }

    /// Positions of every portal belonging to `group`.
    pub fn portal_positions(&self, group: PortalGroupId) -> Vec<Position> {
        self.positions_of(|cell| matches!(cell, Cell::Portal { group: g, .. } if g == group))
    }

    /// In-bounds cardinal neighbors of `pos` that are not walls.
    pub fn passable_neighbors(&self, pos: Position) -> Vec<Position> {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|&neighbor| matches!(self.get(neighbor), Some(cell) if cell.is_passable()))
            .collect()
    }
}
