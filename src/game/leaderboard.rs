//! # Leaderboard Module
//!
//! The standings board for finished games, persisted as a flat text file.
//!
//! One line per player, `username | <steps> steps | <time> s`, sorted by
//! completion time with step count as the tiebreak. A player's record is
//! replaced only by a strictly better result. The file is kept read-only
//! between writes; saving flips it writable, rewrites every line, and
//! flips it back.

use crate::OublietteResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One finished game on the standings board.
///
/// # Examples
///
/// ```
/// use oubliette::LeaderboardRecord;
///
/// let record = LeaderboardRecord::new("alice", 120, 35);
/// assert_eq!(record.to_line(), "alice | 120 steps | 35 s");
/// assert_eq!(LeaderboardRecord::parse_line("alice | 120 steps | 35 s"), Some(record));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRecord {
    pub username: String,
    pub steps: u32,
    pub time_seconds: u64,
}

impl LeaderboardRecord {
    /// Creates a record for a finished game.
    pub fn new(username: impl Into<String>, steps: u32, time_seconds: u64) -> Self {
        Self {
            username: username.into(),
            steps,
            time_seconds,
        }
    }

    /// Whether this result outranks `other`: faster, or equally fast in
    /// fewer steps.
    pub fn is_strictly_better_than(&self, other: &Self) -> bool {
        self.time_seconds < other.time_seconds
            || (self.time_seconds == other.time_seconds && self.steps < other.steps)
    }

    /// Whether both records belong to the same player. Usernames are
    /// compared case-insensitively on the full name.
    pub fn same_player(&self, other: &Self) -> bool {
        self.username.to_lowercase() == other.username.to_lowercase()
    }

    /// Formats the record as one board line.
    pub fn to_line(&self) -> String {
        format!("{} | {} steps | {} s", self.username, self.steps, self.time_seconds)
    }

    /// Parses one board line. Returns `None` for anything that does not
    /// match the format exactly.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut parts = line.split(" | ");
        let username = parts.next()?;
        let steps_part = parts.next()?;
        let time_part = parts.next()?;
        if parts.next().is_some() || username.is_empty() {
            return None;
        }

        let steps = steps_part.strip_suffix(" steps")?.parse().ok()?;
        let time_seconds = time_part.strip_suffix(" s")?.parse().ok()?;
        Some(Self {
            username: username.to_string(),
            steps,
            time_seconds,
        })
    }
}

/// The standings board: at most one record per player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    records: Vec<LeaderboardRecord>,
}

impl Leaderboard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// The records in display order: ascending time, then ascending steps.
    pub fn records(&self) -> &[LeaderboardRecord] {
        &self.records
    }

    /// Merges one finished game into the board.
    ///
    /// A player's existing record survives unless the new result is
    /// strictly better. Returns true when the board changed.
    pub fn submit(&mut self, record: LeaderboardRecord) -> bool {
        match self.records.iter().position(|r| r.same_player(&record)) {
            Some(idx) => {
                if !record.is_strictly_better_than(&self.records[idx]) {
                    return false;
                }
                self.records[idx] = record;
            }
            None => self.records.push(record),
        }
        self.sort();
        true
    }

    fn sort(&mut self) {
        self.records.sort_by_key(|r| (r.time_seconds, r.steps));
    }

    /// Loads the board from `path`.
    ///
    /// A missing file is created empty (and marked read-only), yielding an
    /// empty board. Malformed lines are skipped with a warning instead of
    /// aborting the load.
    pub fn load(path: impl AsRef<Path>) -> OublietteResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            create_parent_dirs(path)?;
            fs::write(path, "")?;
            set_readonly(path, true);
            log::debug!("created empty leaderboard at {}", path.display());
            return Ok(Self::new());
        }

        let contents = fs::read_to_string(path)?;
        let mut board = Self::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match LeaderboardRecord::parse_line(line) {
                Some(record) => board.records.push(record),
                None => log::warn!(
                    "skipping malformed leaderboard line {} in {}: {:?}",
                    index + 1,
                    path.display(),
                    line
                ),
            }
        }
        board.sort();
        Ok(board)
    }

    /// Writes the board to `path`, one sorted record per line, restoring
    /// the read-only marker afterwards.
    pub fn save(&self, path: impl AsRef<Path>) -> OublietteResult<()> {
        let path = path.as_ref();
        create_parent_dirs(path)?;
        if path.exists() {
            set_readonly(path, false);
        }

        let mut contents = String::new();
        for record in &self.records {
            contents.push_str(&record.to_line());
            contents.push('\n');
        }

        let written = fs::write(path, contents);
        set_readonly(path, true);
        written?;
        Ok(())
    }
}

fn create_parent_dirs(path: &Path) -> OublietteResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Best-effort permission flip; a refusal is logged, not fatal.
fn set_readonly(path: &Path, readonly: bool) {
    let attempt = fs::metadata(path).and_then(|metadata| {
        let mut permissions = metadata.permissions();
        permissions.set_readonly(readonly);
        fs::set_permissions(path, permissions)
    });
    if let Err(err) = attempt {
        log::warn!(
            "could not update permissions on {}: {}",
            path.display(),
            err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_round_trip() {
        let record = LeaderboardRecord::new("alice", 120, 35);
        let line = record.to_line();
        assert_eq!(line, "alice | 120 steps | 35 s");
        assert_eq!(LeaderboardRecord::parse_line(&line), Some(record));
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert_eq!(LeaderboardRecord::parse_line(""), None);
        assert_eq!(LeaderboardRecord::parse_line("alice"), None);
        assert_eq!(LeaderboardRecord::parse_line("alice | 120 steps"), None);
        assert_eq!(
            LeaderboardRecord::parse_line("alice | 120 steps | 35 s | extra"),
            None
        );
        assert_eq!(
            LeaderboardRecord::parse_line("alice | steps 120 | 35 s"),
            None
        );
        assert_eq!(
            LeaderboardRecord::parse_line("alice | 120 steps | 35 seconds"),
            None
        );
        assert_eq!(
            LeaderboardRecord::parse_line(" | 120 steps | 35 s"),
            None
        );
        assert_eq!(
            LeaderboardRecord::parse_line("alice | -3 steps | 35 s"),
            None
        );
    }

    #[test]
    fn test_strictly_better_ordering() {
        let base = LeaderboardRecord::new("alice", 100, 30);

        assert!(LeaderboardRecord::new("alice", 150, 29).is_strictly_better_than(&base));
        assert!(LeaderboardRecord::new("alice", 99, 30).is_strictly_better_than(&base));
        assert!(!LeaderboardRecord::new("alice", 100, 30).is_strictly_better_than(&base));
        assert!(!LeaderboardRecord::new("alice", 101, 30).is_strictly_better_than(&base));
        assert!(!LeaderboardRecord::new("alice", 50, 31).is_strictly_better_than(&base));
    }

    #[test]
    fn test_submit_new_player() {
        let mut board = Leaderboard::new();
        assert!(board.submit(LeaderboardRecord::new("alice", 100, 30)));
        assert!(board.submit(LeaderboardRecord::new("bob", 80, 25)));

        assert_eq!(board.records().len(), 2);
        // Bob was faster, so he leads.
        assert_eq!(board.records()[0].username, "bob");
    }

    #[test]
    fn test_submit_replaces_only_strictly_better() {
        let mut board = Leaderboard::new();
        board.submit(LeaderboardRecord::new("alice", 100, 30));

        assert!(!board.submit(LeaderboardRecord::new("alice", 100, 30)));
        assert!(!board.submit(LeaderboardRecord::new("alice", 90, 31)));
        assert_eq!(board.records()[0].steps, 100);

        assert!(board.submit(LeaderboardRecord::new("alice", 90, 30)));
        assert_eq!(board.records()[0].steps, 90);
        assert_eq!(board.records().len(), 1);
    }

    #[test]
    fn test_usernames_match_case_insensitively() {
        let mut board = Leaderboard::new();
        board.submit(LeaderboardRecord::new("Alice", 100, 30));
        assert!(board.submit(LeaderboardRecord::new("ALICE", 100, 20)));

        assert_eq!(board.records().len(), 1);
        assert_eq!(board.records()[0].username, "ALICE");
        assert_eq!(board.records()[0].time_seconds, 20);
    }

    #[test]
    fn test_distinct_names_stay_distinct() {
        // A username that merely prefixes another is a different player.
        let mut board = Leaderboard::new();
        board.submit(LeaderboardRecord::new("al", 100, 30));
        board.submit(LeaderboardRecord::new("alice", 100, 20));
        assert_eq!(board.records().len(), 2);
    }

    #[test]
    fn test_sorted_by_time_then_steps() {
        let mut board = Leaderboard::new();
        board.submit(LeaderboardRecord::new("slow", 50, 90));
        board.submit(LeaderboardRecord::new("fast", 200, 10));
        board.submit(LeaderboardRecord::new("tied_many_steps", 80, 40));
        board.submit(LeaderboardRecord::new("tied_few_steps", 60, 40));

        let names: Vec<&str> = board
            .records()
            .iter()
            .map(|r| r.username.as_str())
            .collect();
        assert_eq!(names, vec!["fast", "tied_few_steps", "tied_many_steps", "slow"]);
    }

    #[test]
    fn test_load_missing_file_creates_empty_readonly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.txt");

        let board = Leaderboard::load(&path).unwrap();
        assert!(board.records().is_empty());
        assert!(path.exists());
        assert!(fs::metadata(&path).unwrap().permissions().readonly());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.txt");

        let mut board = Leaderboard::new();
        board.submit(LeaderboardRecord::new("alice", 120, 35));
        board.submit(LeaderboardRecord::new("bob", 80, 25));
        board.save(&path).unwrap();

        // The file is parked read-only between writes.
        assert!(fs::metadata(&path).unwrap().permissions().readonly());

        let loaded = Leaderboard::load(&path).unwrap();
        assert_eq!(loaded, board);
    }

    #[test]
    fn test_save_overwrites_readonly_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.txt");

        let mut board = Leaderboard::new();
        board.submit(LeaderboardRecord::new("alice", 120, 35));
        board.save(&path).unwrap();

        board.submit(LeaderboardRecord::new("bob", 80, 25));
        board.save(&path).unwrap();

        let loaded = Leaderboard::load(&path).unwrap();
        assert_eq!(loaded.records().len(), 2);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.txt");
        fs::write(
            &path,
            "alice | 120 steps | 35 s\ngarbage line\nbob | 80 steps | 25 s\n",
        )
        .unwrap();

        let board = Leaderboard::load(&path).unwrap();
        assert_eq!(board.records().len(), 2);
        assert_eq!(board.records()[0].username, "bob");
        assert_eq!(board.records()[1].username, "alice");
    }
}
