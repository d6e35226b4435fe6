//! # Game Session Module
//!
//! One running game: the maze, the player, ability modes, observers, and
//! win/loss detection.
//!
//! A [`GameSession`] is self-contained; several sessions can run side by
//! side without shared state. Callers drive it one action at a time
//! through [`GameSession::perform`] or the [`Command`] vocabulary, and
//! watch it through registered observers.

use crate::game::resolver::{self, MoveOutcome};
use crate::game::{
    new_session_id, Cell, Direction, Leaderboard, LeaderboardRecord, Maze, Player, Position,
    SessionId,
};
use crate::generation::{utils, BacktrackerGenerator, GameConfig, Generator};
use crate::input::Command;
use crate::{OublietteError, OublietteResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// How a session ended, if it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// Player reached the treasure
    Won,
    /// Player ran out of hit points or gave up
    Lost,
}

/// The two limited-use ability modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeKind {
    Jump,
    WallBreaker,
}

/// One ability-mode transition, as reported to the mode listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeChange {
    pub kind: ModeKind,
    pub enabled: bool,
}

/// Receives a fresh player snapshot after every completed action.
pub trait SessionObserver {
    fn player_updated(&mut self, snapshot: &Player);
}

/// Receives ability-mode transitions, including the automatic switch-off
/// after an ability is used or found exhausted.
pub trait ModeListener {
    fn mode_changed(&mut self, change: ModeChange);
}

/// What a single call to [`GameSession::perform`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The player moved to this position
    Moved(Position),
    /// The move was blocked; position unchanged
    Blocked,
    /// A wall-break attempt resolved; `destroyed` tells whether the
    /// target actually was a wall
    WallBroken { target: Position, destroyed: bool },
    /// The armed ability had no charges left; the mode reverted and
    /// nothing else happened
    AbilityExhausted,
}

/// One running game.
pub struct GameSession {
    /// Unique id, for log correlation across sessions
    pub id: SessionId,
    /// The configuration this session was started with
    pub config: GameConfig,
    maze: Maze,
    player: Player,
    rng: StdRng,
    jump_mode: bool,
    wall_breaker_mode: bool,
    completion: GameCompletionState,
    started_at: Instant,
    observers: Vec<Box<dyn SessionObserver>>,
    mode_listener: Option<Box<dyn ModeListener>>,
}

impl GameSession {
    /// Generates a fresh maze from the config and starts a session on it.
    pub fn new(username: impl Into<String>, config: &GameConfig) -> OublietteResult<Self> {
        let generator = BacktrackerGenerator::new();
        let mut rng = utils::create_rng(config);
        let maze = generator.generate(config, &mut rng)?;
        Ok(Self::with_maze(username, maze, config, rng))
    }

    /// Starts a session on a prepared maze.
    ///
    /// The RNG drives portal exit selection during play; sessions started
    /// through [`GameSession::new`] carry the generation RNG forward.
    pub fn with_maze(
        username: impl Into<String>,
        maze: Maze,
        config: &GameConfig,
        rng: StdRng,
    ) -> Self {
        let player = Player::with_stats(
            username,
            maze.start_position(),
            config.starting_hp,
            config.starting_ability_count,
        );
        let id = new_session_id();
        log::info!(
            "session {}: {} enters a {}x{} maze",
            id,
            player.username,
            maze.size,
            maze.size
        );
        Self {
            id,
            config: config.clone(),
            maze,
            player,
            rng,
            jump_mode: false,
            wall_breaker_mode: false,
            completion: GameCompletionState::Playing,
            started_at: Instant::now(),
            observers: Vec::new(),
            mode_listener: None,
        }
    }

    /// The maze as it currently stands.
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// The player as they currently stand.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// How the session has ended, or `Playing`.
    pub fn completion_state(&self) -> GameCompletionState {
        self.completion
    }

    /// Whether the session has ended.
    pub fn is_game_over(&self) -> bool {
        self.completion != GameCompletionState::Playing
    }

    /// Whether jump mode is armed.
    pub fn jump_mode(&self) -> bool {
        self.jump_mode
    }

    /// Whether wall-break mode is armed.
    pub fn wall_breaker_mode(&self) -> bool {
        self.wall_breaker_mode
    }

    /// Whole seconds since the session started. Read-only; safe to poll
    /// from a display tick.
    pub fn elapsed_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Registers an observer. Observers are notified in registration
    /// order after every completed action.
    pub fn register_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Installs the single mode listener, replacing any previous one.
    pub fn set_mode_listener(&mut self, listener: Box<dyn ModeListener>) {
        self.mode_listener = Some(listener);
    }

    /// Arms or disarms jump mode. Arming forces wall-break mode off
    /// first. With no jump charges left the toggle does nothing and the
    /// listener hears nothing.
    pub fn toggle_jump_mode(&mut self) {
        if self.player.jump_ability_count == 0 {
            log::debug!("session {}: jump toggle refused, no charges left", self.id);
            return;
        }
        if self.jump_mode {
            self.jump_mode = false;
            self.notify_mode_change(ModeKind::Jump, false);
            return;
        }
        if self.wall_breaker_mode {
            self.wall_breaker_mode = false;
            self.notify_mode_change(ModeKind::WallBreaker, false);
        }
        self.jump_mode = true;
        self.notify_mode_change(ModeKind::Jump, true);
    }

    /// Arms or disarms wall-break mode. Arming forces jump mode off
    /// first. With no wall-break charges left the toggle does nothing.
    pub fn toggle_wall_breaker_mode(&mut self) {
        if self.player.wall_breaker_ability_count == 0 {
            log::debug!(
                "session {}: wall breaker toggle refused, no charges left",
                self.id
            );
            return;
        }
        if self.wall_breaker_mode {
            self.wall_breaker_mode = false;
            self.notify_mode_change(ModeKind::WallBreaker, false);
            return;
        }
        if self.jump_mode {
            self.jump_mode = false;
            self.notify_mode_change(ModeKind::Jump, false);
        }
        self.wall_breaker_mode = true;
        self.notify_mode_change(ModeKind::WallBreaker, true);
    }

    /// Executes one player action in the given direction.
    ///
    /// Depending on the armed mode this is a normal single-cell move, a
    /// two-cell jump, or a wall break. Afterwards every observer gets a
    /// player snapshot and the win/loss conditions are checked. Returns
    /// an error once the game is over.
    pub fn perform(&mut self, direction: Direction) -> OublietteResult<ActionOutcome> {
        if self.is_game_over() {
            return Err(OublietteError::InvalidAction(
                "the game is over; no further actions are accepted".to_string(),
            ));
        }

        let outcome = if self.jump_mode {
            self.perform_jump(direction)?
        } else if self.wall_breaker_mode {
            self.perform_wall_break(direction)?
        } else {
            let dest = self.player.position.stepped(direction, 1);
            self.resolve(dest)?
        };

        if outcome == ActionOutcome::AbilityExhausted {
            return Ok(outcome);
        }

        self.notify_observers();
        self.check_game_condition();
        Ok(outcome)
    }

    /// Dispatches one command from the input vocabulary.
    pub fn execute(&mut self, command: Command) -> OublietteResult<Option<ActionOutcome>> {
        match command {
            Command::Move(direction) => self.perform(direction).map(Some),
            Command::ToggleJumpMode => {
                self.toggle_jump_mode();
                Ok(None)
            }
            Command::ToggleWallBreakerMode => {
                self.toggle_wall_breaker_mode();
                Ok(None)
            }
            Command::GiveUp => {
                self.abandon();
                Ok(None)
            }
        }
    }

    /// The player gives up: the session ends as a loss and no leaderboard
    /// entry is written. Does nothing once the game is over.
    pub fn abandon(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.completion = GameCompletionState::Lost;
        log::info!(
            "session {}: {} gave up after {} steps",
            self.id,
            self.player.username,
            self.player.steps
        );
    }

    fn resolve(&mut self, dest: Position) -> OublietteResult<ActionOutcome> {
        let outcome =
            resolver::resolve_move(&mut self.maze, &mut self.player, dest, &mut self.rng)?;
        Ok(match outcome {
            MoveOutcome::Arrived(pos) => ActionOutcome::Moved(pos),
            MoveOutcome::Blocked => ActionOutcome::Blocked,
        })
    }

    fn perform_jump(&mut self, direction: Direction) -> OublietteResult<ActionOutcome> {
        if !self.player.consume_jump() {
            log::debug!("session {}: jump armed with no charges left", self.id);
            self.jump_mode = false;
            self.notify_mode_change(ModeKind::Jump, false);
            return Ok(ActionOutcome::AbilityExhausted);
        }

        // The skipped-over cell is never examined; only the landing cell
        // resolves. Landing on a wall still bumps, and the charge stays
        // spent either way.
        let dest = self
            .player
            .position
            .stepped(direction, self.config.jump_distance);
        let outcome = self.resolve(dest)?;

        self.jump_mode = false;
        self.notify_mode_change(ModeKind::Jump, false);
        Ok(outcome)
    }

    fn perform_wall_break(&mut self, direction: Direction) -> OublietteResult<ActionOutcome> {
        if !self.player.consume_wall_breaker() {
            log::debug!(
                "session {}: wall breaker armed with no charges left",
                self.id
            );
            self.wall_breaker_mode = false;
            self.notify_mode_change(ModeKind::WallBreaker, false);
            return Ok(ActionOutcome::AbilityExhausted);
        }

        let target = self.player.position.stepped(direction, 1);
        let destroyed = match self.maze.get(target) {
            Some(Cell::Wall) => {
                self.maze.set(target, Cell::Path)?;
                log::debug!(
                    "session {}: wall at ({}, {}) broken",
                    self.id,
                    target.x,
                    target.y
                );
                true
            }
            // Anything else, including an out-of-grid target, consumes
            // the charge without changing the board.
            _ => false,
        };

        self.wall_breaker_mode = false;
        self.notify_mode_change(ModeKind::WallBreaker, false);
        Ok(ActionOutcome::WallBroken { target, destroyed })
    }

    fn notify_observers(&mut self) {
        let snapshot = self.player.clone();
        for observer in &mut self.observers {
            observer.player_updated(&snapshot);
        }
    }

    fn notify_mode_change(&mut self, kind: ModeKind, enabled: bool) {
        if let Some(listener) = self.mode_listener.as_mut() {
            listener.mode_changed(ModeChange { kind, enabled });
        }
    }

    /// Settles the session outcome after an action.
    ///
    /// Running out of hit points takes priority over standing on the
    /// treasure. The state latches: once decided, later calls return
    /// without re-running any side effect, so a win writes the
    /// leaderboard exactly once.
    fn check_game_condition(&mut self) {
        if self.is_game_over() {
            return;
        }

        if !self.player.is_alive() {
            self.completion = GameCompletionState::Lost;
            log::info!(
                "session {}: {} ran out of hit points after {} steps",
                self.id,
                self.player.username,
                self.player.steps
            );
            return;
        }

        if self.maze.get(self.player.position) == Some(Cell::Treasure) {
            self.completion = GameCompletionState::Won;
            let elapsed = self.elapsed_seconds();
            log::info!(
                "session {}: {} found the treasure in {} s and {} steps",
                self.id,
                self.player.username,
                elapsed,
                self.player.steps
            );
            self.update_leaderboard(elapsed);
        }
    }

    /// Best-effort leaderboard write; a failure is logged and the win
    /// stands regardless.
    fn update_leaderboard(&self, elapsed: u64) {
        let record =
            LeaderboardRecord::new(self.player.username.clone(), self.player.steps, elapsed);
        let result = Leaderboard::load(&self.config.leaderboard_path).and_then(|mut board| {
            board.submit(record);
            board.save(&self.config.leaderboard_path)
        });
        if let Err(err) = result {
            log::error!("session {}: leaderboard update failed: {}", self.id, err);
        }
    }
}
