//! # Player Module
//!
//! Player state: position, hit points, limited-use abilities, and the
//! keys collected so far.
//!
//! Every counter moves in one direction during a game: hit points and
//! ability charges only go down, steps only go up, and the key list only
//! grows. Nothing here drives a counter below zero.

use crate::config;
use crate::game::{KeyId, Position};
use serde::{Deserialize, Serialize};

/// The player of one game session.
///
/// # Examples
///
/// ```
/// use oubliette::{Player, Position};
///
/// let player = Player::new("alice", Position::new(1, 7));
/// assert_eq!(player.hp, 3);
/// assert_eq!(player.jump_ability_count, 2);
/// assert!(player.keys.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display name; also the leaderboard identity
    pub username: String,
    /// Current cell
    pub position: Position,
    /// Resolved moves so far
    pub steps: u32,
    /// Remaining hit points; the game is lost at zero
    pub hp: i32,
    /// Remaining jump charges
    pub jump_ability_count: u32,
    /// Remaining wall-break charges
    pub wall_breaker_ability_count: u32,
    /// Keys collected this game, in pickup order
    pub keys: Vec<KeyId>,
}

impl Player {
    /// Creates a player with the default starting stats.
    pub fn new(username: impl Into<String>, start: Position) -> Self {
        Self::with_stats(
            username,
            start,
            config::DEFAULT_STARTING_HP,
            config::DEFAULT_STARTING_ABILITY_COUNT,
        )
    }

    /// Creates a player with explicit starting hit points and ability
    /// charges.
    pub fn with_stats(
        username: impl Into<String>,
        start: Position,
        hp: i32,
        ability_count: u32,
    ) -> Self {
        Self {
            username: username.into(),
            position: start,
            steps: 0,
            hp,
            jump_ability_count: ability_count,
            wall_breaker_ability_count: ability_count,
            keys: Vec::new(),
        }
    }

    /// Whether the player still has hit points left.
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Applies one point of damage. Hit points stop at zero.
    pub fn take_damage(&mut self) {
        self.hp = (self.hp - 1).max(0);
    }

    /// Counts one resolved move.
    pub fn record_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    /// Pockets a key. Keys are never dropped during a game.
    pub fn grant_key(&mut self, id: KeyId) {
        self.keys.push(id);
    }

    /// Whether the player holds a key with the given id.
    pub fn has_key(&self, id: KeyId) -> bool {
        self.keys.contains(&id)
    }

    /// Spends one jump charge. Returns false (and spends nothing) when
    /// none are left.
    pub fn consume_jump(&mut self) -> bool {
        if self.jump_ability_count > 0 {
            self.jump_ability_count -= 1;
            true
        } else {
            false
        }
    }

    /// Spends one wall-break charge. Returns false (and spends nothing)
    /// when none are left.
    pub fn consume_wall_breaker(&mut self) -> bool {
        if self.wall_breaker_ability_count > 0 {
            self.wall_breaker_ability_count -= 1;
            true
        } else {
            false
        }
    }
}
