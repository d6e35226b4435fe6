//! # Oubliette Demo Entry Point
//!
//! Headless demo: generates a maze, walks it with a seeded random walker,
//! and prints the outcome plus the leaderboard standings. No window and no
//! real-time input; the engine is driven purely through commands.

use clap::Parser;
use log::{debug, info, warn};
use oubliette::{
    Cell, Command, Direction, GameCompletionState, GameConfig, GameSession, Leaderboard,
    OublietteResult,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::PathBuf;

/// Upper bound on walker actions before the run is abandoned.
const WALK_LIMIT: u32 = 5_000;

/// Command line arguments for the Oubliette demo.
#[derive(Parser, Debug)]
#[command(name = "oubliette")]
#[command(about = "A single-player maze game engine with a demo walker")]
#[command(version)]
struct Args {
    /// Random seed for maze generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maze side length in cells (odd, at least 5)
    #[arg(long)]
    size: Option<u32>,

    /// Name recorded on the leaderboard if the walker wins
    #[arg(short, long, default_value = "wanderer")]
    username: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Leaderboard file location
    #[arg(long)]
    leaderboard: Option<PathBuf>,
}

fn main() -> OublietteResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting Oubliette v{}", oubliette::VERSION);

    let seed = args.seed.unwrap_or(12345);
    let mut config = GameConfig::new(seed);
    if let Some(size) = args.size {
        config.maze_size = size;
    }
    if let Some(path) = args.leaderboard.clone() {
        config.leaderboard_path = path;
    }

    info!(
        "Generating a {}x{} maze with seed {}",
        config.maze_size, config.maze_size, seed
    );
    let mut session = GameSession::new(args.username.clone(), &config)?;

    run_walker(&mut session, seed)?;
    report(&session);
    print_standings(&config);

    Ok(())
}

/// Initializes env_logger at the requested level.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_secs()
        .init();
}

/// Drives the session with a random walker until the game ends or the
/// walk limit runs out.
fn run_walker(session: &mut GameSession, seed: u64) -> OublietteResult<()> {
    // A separate stream from the session RNG, so portal exits stay
    // deterministic per seed no matter how the walker is changed.
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut actions = 0u32;

    while !session.is_game_over() && actions < WALK_LIMIT {
        let direction = pick_direction(session, &mut rng);
        let outcome = session.execute(Command::Move(direction))?;
        actions += 1;
        debug!(
            "t={}s step {}: {:?} -> {:?}, hp {}",
            session.elapsed_seconds(),
            actions,
            direction,
            outcome,
            session.player().hp
        );
    }

    if !session.is_game_over() {
        warn!("walk limit of {} actions reached; giving up", WALK_LIMIT);
        session.execute(Command::GiveUp)?;
    }
    Ok(())
}

/// Picks the next walking direction: fresh ground first, then already
/// visited corridor, never a known wall.
fn pick_direction(session: &GameSession, rng: &mut StdRng) -> Direction {
    let position = session.player().position;
    let maze = session.maze();

    let mut fresh = Vec::new();
    let mut visited = Vec::new();
    for direction in Direction::cardinal() {
        match maze.get(position.stepped(direction, 1)) {
            Some(Cell::TakenPath) => visited.push(direction),
            Some(cell) if cell.is_passable() => fresh.push(direction),
            _ => {}
        }
    }

    // Carved corridors never close up, so at least one side is open.
    fresh
        .choose(rng)
        .or_else(|| visited.choose(rng))
        .copied()
        .unwrap_or(Direction::North)
}

/// Logs how the run ended.
fn report(session: &GameSession) {
    let player = session.player();
    match session.completion_state() {
        GameCompletionState::Won => info!(
            "{} found the treasure: {} steps in {} s",
            player.username,
            player.steps,
            session.elapsed_seconds()
        ),
        GameCompletionState::Lost => info!(
            "{} did not make it out: {} steps, {} hp left",
            player.username, player.steps, player.hp
        ),
        GameCompletionState::Playing => warn!("session still marked as playing"),
    }
}

/// Prints the current leaderboard standings.
fn print_standings(config: &GameConfig) {
    match Leaderboard::load(&config.leaderboard_path) {
        Ok(board) if board.records().is_empty() => {
            println!("Leaderboard is empty.");
        }
        Ok(board) => {
            println!("Leaderboard:");
            for (rank, record) in board.records().iter().enumerate() {
                println!(
                    "  {}. {} | {} steps | {} s",
                    rank + 1,
                    record.username,
                    record.steps,
                    record.time_seconds
                );
            }
        }
        Err(err) => warn!("could not read the leaderboard: {}", err),
    }
}
