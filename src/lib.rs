//! # Oubliette
//!
//! A single-player maze game engine with procedural generation and a
//! file-backed leaderboard.
//!
//! ## Architecture Overview
//!
//! Oubliette is an engine, not a frontend. The core pieces:
//!
//! - **Grid Model**: A square cell matrix holding walls, paths, traps,
//!   portals, keys, and the treasure
//! - **Generation System**: Recursive-backtracking maze carving plus
//!   rejection-sampled entity placement, deterministic per seed
//! - **Movement Resolver**: An explicit state machine that chains cell
//!   interactions (damage, pickups, teleports) for one attempted move
//! - **Game Session**: Player state, limited-use abilities, observers,
//!   win/loss detection, and leaderboard updates
//!
//! Rendering, input devices, audio, and networking are out of scope; a
//! caller drives sessions through [`GameSession`] and the [`Command`]
//! vocabulary. The bundled binary is a headless demo walker.

pub mod game;
pub mod generation;
pub mod input;

// Core module re-exports
pub use game::*;
pub use generation::*;

// Explicit re-exports for commonly used types
pub use game::{
    // From leaderboard
    Leaderboard,
    LeaderboardRecord,
    // From maze
    Cell,
    Direction,
    GameCompletionState,
    // From session
    GameSession,
    KeyId,
    Maze,
    ModeChange,
    ModeKind,
    ModeListener,
    MoveOutcome,
    // From player
    Player,
    PortalGroupId,
    Position,
    SessionId,
    SessionObserver,
};

pub use generation::{BacktrackerGenerator, GameConfig, Generator};

pub use input::Command;

/// Core error type for the Oubliette game engine.
#[derive(thiserror::Error, Debug)]
pub enum OublietteError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Entity placement ran out of sampling attempts
    #[error("Placement of {entity} exhausted after {attempts} attempts")]
    PlacementExhausted { entity: &'static str, attempts: u32 },
}

/// Result type used throughout the Oubliette codebase.
pub type OublietteResult<T> = Result<T, OublietteError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default maze side length in cells (must be odd)
    pub const DEFAULT_MAZE_SIZE: u32 = 49;

    /// Default player starting hit points
    pub const DEFAULT_STARTING_HP: i32 = 3;

    /// Default charge count for each limited-use ability
    pub const DEFAULT_STARTING_ABILITY_COUNT: u32 = 2;

    /// Fraction of the maze side length converted into trap placements
    pub const DEFAULT_TRAP_RATIO: f64 = 0.33;

    /// Portals per linked group
    pub const PORTALS_PER_GROUP: u32 = 4;

    /// Cells covered by a jump move
    pub const JUMP_DISTANCE: u32 = 2;

    /// Upper bound on chained portal hops in one resolution
    pub const MAX_TELEPORT_HOPS: u32 = 8;

    /// Sampling attempts allowed per placed entity
    pub const DEFAULT_MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

    /// Fog-of-war radius for frontends, in cells. The engine itself does
    /// not consume this; it is published for renderers.
    pub const VIEW_RADIUS: u32 = DEFAULT_MAZE_SIZE / 10;

    /// Default leaderboard file location
    pub const DEFAULT_LEADERBOARD_PATH: &str = "resources/leaderboard.txt";
}
