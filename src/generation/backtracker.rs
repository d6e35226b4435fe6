//! # Maze Generation
//!
//! Recursive-backtracking maze carving plus entity placement.
//!
//! The carve walks the odd-coordinate lattice two cells at a time from the
//! fixed start, opening the wall cell in between, which yields a perfect
//! maze: every carved cell is reachable and the corridor graph is a tree.
//! Entities are then rejection-sampled onto carved cells, with every
//! sampling loop bounded by the configured attempt cap.

use crate::game::Direction;
use crate::{Cell, GameConfig, Generator, Maze, OublietteError, OublietteResult, Position};
use pathfinding::directed::bfs::bfs_reach;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Primary maze generator using randomized recursive backtracking.
///
/// The generator:
/// 1. Carves corridors from the fixed start cell with a depth-first walk,
///    driven by an explicit stack rather than call-stack recursion
/// 2. Rejection-samples positions for traps, the linked portal groups,
///    their keys, and the treasure
/// 3. Validates the border ring, the entity counts, and the
///    spanning-tree property of the corridor graph
#[derive(Debug, Clone)]
pub struct BacktrackerGenerator {
    /// Whether to verify the perfect-maze property after generation
    pub ensure_perfect: bool,
}

/// One level of the depth-first carve: a lattice cell and the shuffled
/// directions still to try from it.
struct CarveFrame {
    cell: Position,
    directions: Vec<Direction>,
    next: usize,
}

impl CarveFrame {
    fn new(cell: Position, rng: &mut StdRng) -> Self {
        let mut directions = Direction::cardinal();
        directions.shuffle(rng);
        Self {
            cell,
            directions,
            next: 0,
        }
    }
}

impl BacktrackerGenerator {
    /// Creates a new maze generator with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use oubliette::BacktrackerGenerator;
    ///
    /// let generator = BacktrackerGenerator::new();
    /// assert!(generator.ensure_perfect);
    /// ```
    pub fn new() -> Self {
        Self {
            ensure_perfect: true,
        }
    }

    /// Carves the corridor network, starting from `start`.
    ///
    /// Each step picks the next unvisited lattice cell two cells away in a
    /// shuffled direction order and opens the wall between. A frame whose
    /// directions are exhausted backtracks to its parent.
    fn carve_passages(
        &self,
        maze: &mut Maze,
        start: Position,
        rng: &mut StdRng,
    ) -> OublietteResult<()> {
        let size = maze.size as usize;
        let mut visited = vec![vec![false; size]; size];
        visited[start.y as usize][start.x as usize] = true;
        maze.set(start, Cell::Path)?;

        let mut stack = vec![CarveFrame::new(start, rng)];
        while let Some(frame) = stack.last_mut() {
            if frame.next >= frame.directions.len() {
                stack.pop();
                continue;
            }
            let direction = frame.directions[frame.next];
            frame.next += 1;

            let cell = frame.cell;
            let candidate = cell.stepped(direction, 2);
            if !maze.is_inner(candidate) || visited[candidate.y as usize][candidate.x as usize] {
                continue;
            }

            visited[candidate.y as usize][candidate.x as usize] = true;
            maze.set(cell.stepped(direction, 1), Cell::Path)?;
            maze.set(candidate, Cell::Path)?;
            stack.push(CarveFrame::new(candidate, rng));
        }

        Ok(())
    }

    /// Samples inner positions until `accept` approves one, bounded by the
    /// configured attempt cap.
    fn sample_position<F>(
        &self,
        maze: &Maze,
        config: &GameConfig,
        rng: &mut StdRng,
        entity: &'static str,
        accept: F,
    ) -> OublietteResult<Position>
    where
        F: Fn(&Maze, Position) -> bool,
    {
        for _ in 0..config.max_placement_attempts {
            let x = rng.gen_range(1..maze.size as i32 - 1);
            let y = rng.gen_range(1..maze.size as i32 - 1);
            let pos = Position::new(x, y);
            if accept(maze, pos) {
                return Ok(pos);
            }
        }
        Err(OublietteError::PlacementExhausted {
            entity,
            attempts: config.max_placement_attempts,
        })
    }

    /// Places the configured number of traps on carved cells away from the
    /// start.
    fn place_traps(
        &self,
        maze: &mut Maze,
        start: Position,
        config: &GameConfig,
        rng: &mut StdRng,
    ) -> OublietteResult<()> {
        for _ in 0..config.trap_count() {
            let pos = self.sample_position(maze, config, rng, "trap", |maze, pos| {
                maze.get(pos) == Some(Cell::Path) && pos != start
            })?;
            maze.set(pos, Cell::Trap)?;
        }
        Ok(())
    }

    /// Places the linked portal groups and one key per group.
    ///
    /// Portals and keys avoid the whole row and column of the start cell,
    /// not just the cell itself, so the player never begins in line with a
    /// teleporter.
    fn place_portals_and_keys(
        &self,
        maze: &mut Maze,
        start: Position,
        config: &GameConfig,
        rng: &mut StdRng,
    ) -> OublietteResult<()> {
        let off_start_cross = |maze: &Maze, pos: Position| {
            maze.get(pos) == Some(Cell::Path)
                && pos != start
                && pos.x != start.x
                && pos.y != start.y
        };

        for group in 0..config.portal_group_count {
            for _ in 0..config.portals_per_group {
                let pos = self.sample_position(maze, config, rng, "portal", off_start_cross)?;
                maze.set(pos, Cell::Portal { group, key: group })?;
            }
            let pos = self.sample_position(maze, config, rng, "key", off_start_cross)?;
            maze.set(pos, Cell::Key { id: group })?;
        }
        Ok(())
    }

    /// Places the treasure on a carved cell away from the start.
    fn place_treasure(
        &self,
        maze: &mut Maze,
        start: Position,
        config: &GameConfig,
        rng: &mut StdRng,
    ) -> OublietteResult<()> {
        let pos = self.sample_position(maze, config, rng, "treasure", |maze, pos| {
            maze.get(pos) == Some(Cell::Path) && pos != start
        })?;
        maze.set(pos, Cell::Treasure)?;
        Ok(())
    }

    /// Checks that the border ring is intact.
    fn validate_border(&self, maze: &Maze) -> OublietteResult<()> {
        let edge = maze.size as i32 - 1;
        let border_broken = maze
            .positions_of(Cell::is_passable)
            .into_iter()
            .any(|pos| pos.x == 0 || pos.y == 0 || pos.x == edge || pos.y == edge);
        if border_broken {
            return Err(OublietteError::GenerationFailed(
                "maze border ring is not solid wall".to_string(),
            ));
        }
        Ok(())
    }

    /// Checks that every entity landed in the configured quantity and the
    /// start cell stayed clear.
    fn validate_entities(&self, maze: &Maze, config: &GameConfig) -> OublietteResult<()> {
        if maze.get(maze.start_position()) != Some(Cell::Path) {
            return Err(OublietteError::GenerationFailed(
                "start cell is not an open path".to_string(),
            ));
        }

        let traps = maze.count(|cell| cell == Cell::Trap);
        let portals = maze.count(|cell| matches!(cell, Cell::Portal { .. }));
        let keys = maze.count(|cell| matches!(cell, Cell::Key { .. }));
        let treasures = maze.count(|cell| cell == Cell::Treasure);

        let expected_portals = (config.portal_group_count * config.portals_per_group) as usize;
        if traps != config.trap_count() as usize
            || portals != expected_portals
            || keys != config.portal_group_count as usize
            || treasures != 1
        {
            return Err(OublietteError::GenerationFailed(format!(
                "entity counts off: {} traps, {} portals, {} keys, {} treasures",
                traps, portals, keys, treasures
            )));
        }
        Ok(())
    }

    /// Checks the perfect-maze property: every passable cell reachable
    /// from the start, and exactly one fewer passable adjacency than
    /// passable cells (a spanning tree).
    fn validate_structure(&self, maze: &Maze) -> OublietteResult<()> {
        let passable = maze.positions_of(Cell::is_passable);
        let reachable: HashSet<Position> =
            bfs_reach(maze.start_position(), |&pos| maze.passable_neighbors(pos)).collect();

        if reachable.len() != passable.len() {
            return Err(OublietteError::GenerationFailed(format!(
                "{} of {} passable cells reachable from the start",
                reachable.len(),
                passable.len()
            )));
        }

        // Count each undirected adjacency once via its east/south endpoint.
        let edges: usize = passable
            .iter()
            .map(|&pos| {
                [Direction::East, Direction::South]
                    .iter()
                    .filter(|&&dir| {
                        matches!(maze.get(pos.stepped(dir, 1)), Some(cell) if cell.is_passable())
                    })
                    .count()
            })
            .sum();

        if edges != passable.len() - 1 {
            return Err(OublietteError::GenerationFailed(format!(
                "corridor graph has {} adjacencies over {} cells; not a tree",
                edges,
                passable.len()
            )));
        }
        Ok(())
    }
}

impl Generator<Maze> for BacktrackerGenerator {
    fn generate(&self, config: &GameConfig, rng: &mut StdRng) -> OublietteResult<Maze> {
        let mut maze = Maze::filled(config.maze_size, Cell::Wall)?;
        let start = maze.start_position();

        self.carve_passages(&mut maze, start, rng)?;
        self.place_traps(&mut maze, start, config, rng)?;
        self.place_portals_and_keys(&mut maze, start, config, rng)?;
        self.place_treasure(&mut maze, start, config, rng)?;

        if self.ensure_perfect {
            self.validate(&maze, config)?;
        }

        log::debug!(
            "generated {}x{} maze: {} carved cells, {} traps, {} portals (seed {})",
            maze.size,
            maze.size,
            maze.count(Cell::is_passable),
            maze.count(|cell| cell == Cell::Trap),
            maze.count(|cell| matches!(cell, Cell::Portal { .. })),
            config.seed
        );
        Ok(maze)
    }

    fn validate(&self, maze: &Maze, config: &GameConfig) -> OublietteResult<()> {
        self.validate_border(maze)?;
        self.validate_entities(maze, config)?;
        self.validate_structure(maze)
    }

    fn generator_type(&self) -> &'static str {
        "BacktrackerGenerator"
    }
}

impl Default for BacktrackerGenerator {
    fn default() -> Self {
        Self::new()
    }
}
