//! # Generation Module
//!
//! Procedural maze generation.
//!
//! This module provides the configuration surface and the generator trait;
//! the carving and entity-placement algorithm lives in [`backtracker`].
//! Generation is fully deterministic for a fixed seed.

pub mod backtracker;

pub use backtracker::*;

use crate::{config, OublietteResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a game and its maze.
///
/// Controls the board dimensions, entity densities, player starting
/// stats, and where the leaderboard file lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Maze side length in cells; must be odd
    pub maze_size: u32,
    /// Player starting hit points
    pub starting_hp: i32,
    /// Starting charge count for each limited-use ability
    pub starting_ability_count: u32,
    /// Fraction of the side length converted into trap placements
    pub trap_ratio: f64,
    /// Number of linked portal groups
    pub portal_group_count: u32,
    /// Portals per linked group
    pub portals_per_group: u32,
    /// Cells covered by a jump move
    pub jump_distance: u32,
    /// Sampling attempts allowed per placed entity
    pub max_placement_attempts: u32,
    /// Leaderboard file location
    pub leaderboard_path: PathBuf,
}

impl GameConfig {
    /// Creates the production configuration for the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use oubliette::GameConfig;
    ///
    /// let config = GameConfig::new(12345);
    /// assert_eq!(config.maze_size, 49);
    /// assert_eq!(config.maze_size % 2, 1);
    /// assert_eq!(config.trap_count(), 16);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            maze_size: config::DEFAULT_MAZE_SIZE,
            starting_hp: config::DEFAULT_STARTING_HP,
            starting_ability_count: config::DEFAULT_STARTING_ABILITY_COUNT,
            trap_ratio: config::DEFAULT_TRAP_RATIO,
            portal_group_count: 1,
            portals_per_group: config::PORTALS_PER_GROUP,
            jump_distance: config::JUMP_DISTANCE,
            max_placement_attempts: config::DEFAULT_MAX_PLACEMENT_ATTEMPTS,
            leaderboard_path: PathBuf::from(config::DEFAULT_LEADERBOARD_PATH),
        }
    }

    /// Creates a configuration for testing: a small board with a lighter
    /// trap load.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            maze_size: 15,
            starting_hp: config::DEFAULT_STARTING_HP,
            starting_ability_count: config::DEFAULT_STARTING_ABILITY_COUNT,
            trap_ratio: 0.2,
            portal_group_count: 1,
            portals_per_group: config::PORTALS_PER_GROUP,
            jump_distance: config::JUMP_DISTANCE,
            max_placement_attempts: 200,
            leaderboard_path: PathBuf::from(config::DEFAULT_LEADERBOARD_PATH),
        }
    }

    /// Number of traps the generator will place. The fractional part of
    /// `maze_size * trap_ratio` is dropped.
    pub fn trap_count(&self) -> u32 {
        (self.maze_size as f64 * self.trap_ratio) as u32
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
///
/// All generation systems implement this trait so configuration,
/// validation, and logging flow through one interface.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random
    /// number generator.
    fn generate(&self, config: &GameConfig, rng: &mut StdRng) -> OublietteResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GameConfig) -> OublietteResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GameConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config_creation() {
        let config = GameConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.maze_size % 2, 1);
        assert_eq!(config.starting_hp, 3);
        assert_eq!(config.starting_ability_count, 2);
        assert_eq!(config.portals_per_group, 4);
    }

    #[test]
    fn test_trap_count_truncates() {
        let config = GameConfig::new(1);
        // 49 * 0.33 = 16.17.
        assert_eq!(config.trap_count(), 16);

        let testing = GameConfig::for_testing(1);
        // 15 * 0.2 = 3.
        assert_eq!(testing.trap_count(), 3);

        // The fractional part is dropped, never rounded up.
        let mut dense = GameConfig::for_testing(1);
        dense.trap_ratio = 0.33;
        // 15 * 0.33 = 4.95.
        assert_eq!(dense.trap_count(), 4);

        let mut sparse = GameConfig::new(1);
        sparse.maze_size = 25;
        sparse.trap_ratio = 0.1;
        // 25 * 0.1 = 2.5.
        assert_eq!(sparse.trap_count(), 2);
    }

    #[test]
    fn test_testing_config_is_smaller() {
        let config = GameConfig::for_testing(5);
        assert!(config.maze_size < GameConfig::new(5).maze_size);
        assert_eq!(config.maze_size % 2, 1);
    }

    #[test]
    fn test_utils_rng_determinism() {
        use rand::Rng;

        let config = GameConfig::new(12345);
        let mut a = utils::create_rng(&config);
        let mut b = utils::create_rng(&config);
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }
}
