//! # Movement Resolver
//!
//! Resolves one attempted move by chaining cell interactions.
//!
//! A single move can touch several cells before it settles: stepping onto
//! a trap hurts and clears it, a key is pocketed in passing, and a portal
//! restarts the resolution next to another portal of its group. The
//! resolver drives these transitions as an explicit state machine with a
//! frame stack for nested teleports, so resolution depth is bounded and
//! observable instead of hiding in call-stack recursion.
//!
//! The resolver mutates the maze and the player; win/loss detection,
//! observers, and the leaderboard belong to the session layer.

use crate::{config, Cell, KeyId, Maze, OublietteResult, Player, PortalGroupId, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// States of one move resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveState {
    /// Inspect the cell at `dest` and pick the next transition
    Checking { dest: Position },
    /// Spend a hit point, clear the trap, re-check the same destination
    ConsumeTrap { dest: Position },
    /// Pocket the key, clear the cell, re-check the same destination
    ConsumeKey { dest: Position, id: KeyId },
    /// Try the next queued teleport exit candidate, innermost chain first
    Teleporting,
    /// Settle the player on `dest`
    Arrived { dest: Position },
    /// The move failed; the player stays put
    Blocked,
}

/// Terminal result of one resolved move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player now stands on this position
    Arrived(Position),
    /// The move was blocked; position and step count unchanged
    Blocked,
}

/// Exit candidates for one teleport hop, tried in shuffled order.
struct TeleportFrame {
    candidates: Vec<Position>,
    next: usize,
}

/// Resolves one attempted move of `player` to `dest`.
///
/// On arrival the player's position moves, the step counter increments
/// once, and the cell the move started from turns from path into taken
/// path. A blocked move leaves position and steps untouched, though hit
/// points may have been spent along the way.
pub fn resolve_move(
    maze: &mut Maze,
    player: &mut Player,
    dest: Position,
    rng: &mut StdRng,
) -> OublietteResult<MoveOutcome> {
    let origin = player.position;
    Resolution {
        maze,
        player,
        rng,
        origin,
        frames: Vec::new(),
    }
    .run(dest)
}

/// Working state of a single `resolve_move` call.
struct Resolution<'a> {
    maze: &'a mut Maze,
    player: &'a mut Player,
    rng: &'a mut StdRng,
    origin: Position,
    frames: Vec<TeleportFrame>,
}

impl Resolution<'_> {
    fn run(mut self, dest: Position) -> OublietteResult<MoveOutcome> {
        let mut state = MoveState::Checking { dest };
        loop {
            state = match state {
                MoveState::Checking { dest } => self.check(dest),
                MoveState::ConsumeTrap { dest } => {
                    self.player.take_damage();
                    self.maze.set(dest, Cell::Path)?;
                    log::debug!(
                        "trap at ({}, {}) sprung; hp now {}",
                        dest.x,
                        dest.y,
                        self.player.hp
                    );
                    MoveState::Checking { dest }
                }
                MoveState::ConsumeKey { dest, id } => {
                    self.player.grant_key(id);
                    self.maze.set(dest, Cell::Path)?;
                    log::debug!("picked up key {} at ({}, {})", id, dest.x, dest.y);
                    MoveState::Checking { dest }
                }
                MoveState::Teleporting => self.advance_teleport(),
                MoveState::Arrived { dest } => {
                    if self.maze.get(self.origin) == Some(Cell::Path) {
                        self.maze.set(self.origin, Cell::TakenPath)?;
                    }
                    self.player.position = dest;
                    self.player.record_step();
                    return Ok(MoveOutcome::Arrived(dest));
                }
                MoveState::Blocked => return Ok(MoveOutcome::Blocked),
            };
        }
    }

    /// Inspects the destination cell and picks the next state.
    fn check(&mut self, dest: Position) -> MoveState {
        let cell = match self.maze.get(dest) {
            Some(cell) => cell,
            // Outside the grid: a silent no-op, no hit point spent.
            None => return self.fail_branch(),
        };

        match cell {
            Cell::Wall => {
                self.player.take_damage();
                log::debug!(
                    "bumped the wall at ({}, {}); hp now {}",
                    dest.x,
                    dest.y,
                    self.player.hp
                );
                self.fail_branch()
            }
            Cell::Trap => MoveState::ConsumeTrap { dest },
            Cell::Key { id } => MoveState::ConsumeKey { dest, id },
            Cell::Portal { group, key } => {
                if self.player.has_key(key) {
                    self.enter_portal(dest, group)
                } else {
                    log::debug!(
                        "portal at ({}, {}) refused entry: key {} not held",
                        dest.x,
                        dest.y,
                        key
                    );
                    self.fail_branch()
                }
            }
            Cell::Path | Cell::TakenPath | Cell::Treasure => MoveState::Arrived { dest },
        }
    }

    /// Queues the exit candidates of a random other portal in the group.
    fn enter_portal(&mut self, at: Position, group: PortalGroupId) -> MoveState {
        if self.frames.len() as u32 >= config::MAX_TELEPORT_HOPS {
            log::debug!(
                "teleport chain from ({}, {}) exceeded {} hops",
                at.x,
                at.y,
                config::MAX_TELEPORT_HOPS
            );
            return self.fail_branch();
        }

        let exits: Vec<Position> = self
            .maze
            .portal_positions(group)
            .into_iter()
            .filter(|&pos| pos != at)
            .collect();
        let exit = match exits.choose(self.rng) {
            Some(&exit) => exit,
            // A lone portal teleports nowhere.
            None => return self.fail_branch(),
        };

        // Wall neighbors are filtered out up front; trying one costs
        // nothing. Anything else becomes a full re-check.
        let mut candidates = self.maze.passable_neighbors(exit);
        candidates.shuffle(self.rng);
        log::debug!(
            "teleporting via portal group {} to ({}, {}) with {} exit candidates",
            group,
            exit.x,
            exit.y,
            candidates.len()
        );

        self.frames.push(TeleportFrame {
            candidates,
            next: 0,
        });
        MoveState::Teleporting
    }

    /// Takes the next exit candidate, unwinding exhausted frames.
    fn advance_teleport(&mut self) -> MoveState {
        while let Some(frame) = self.frames.last_mut() {
            if let Some(&candidate) = frame.candidates.get(frame.next) {
                frame.next += 1;
                return MoveState::Checking { dest: candidate };
            }
            self.frames.pop();
        }
        MoveState::Blocked
    }

    /// Fails the current branch: backtrack into the teleport stack if one
    /// is open, otherwise the whole move is blocked.
    fn fail_branch(&mut self) -> MoveState {
        if self.frames.is_empty() {
            MoveState::Blocked
        } else {
            MoveState::Teleporting
        }
    }
}
