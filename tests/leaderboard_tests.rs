//! Integration tests for the file-backed leaderboard: merge rules,
//! ordering, persistence, and tolerance of damaged files.

use oubliette::{Leaderboard, LeaderboardRecord};
use proptest::prelude::*;
use std::fs;

/// Usernames match case-insensitively, and only a strictly better run
/// replaces the stored record.
#[test]
fn test_case_insensitive_merge_keeps_the_best_run() {
    let mut board = Leaderboard::new();

    assert!(board.submit(LeaderboardRecord::new("Alice", 50, 100)));
    // Same player, faster run: replaces the record, newest spelling wins.
    assert!(board.submit(LeaderboardRecord::new("alice", 60, 90)));
    // Same player, slower run: ignored even with far fewer steps.
    assert!(!board.submit(LeaderboardRecord::new("ALICE", 10, 95)));

    assert_eq!(board.records().len(), 1);
    assert_eq!(board.records()[0], LeaderboardRecord::new("alice", 60, 90));
}

/// On equal times the step count breaks the tie, in both the merge rule
/// and the display order.
#[test]
fn test_equal_time_fewer_steps_wins() {
    let mut board = Leaderboard::new();

    assert!(board.submit(LeaderboardRecord::new("bob", 80, 120)));
    assert!(board.submit(LeaderboardRecord::new("Bob", 70, 120)));
    // An exactly equal run is not strictly better.
    assert!(!board.submit(LeaderboardRecord::new("BOB", 70, 120)));

    assert_eq!(board.records().len(), 1);
    assert_eq!(board.records()[0].steps, 70);
}

/// "al" and "alice" are different players; prefixes do not match.
#[test]
fn test_prefix_names_are_different_players() {
    let mut board = Leaderboard::new();
    board.submit(LeaderboardRecord::new("al", 10, 30));
    board.submit(LeaderboardRecord::new("alice", 10, 20));

    assert_eq!(board.records().len(), 2);
}

/// Records come back fastest first, steps breaking ties.
#[test]
fn test_display_order_is_time_then_steps() {
    let mut board = Leaderboard::new();
    board.submit(LeaderboardRecord::new("slow", 5, 60));
    board.submit(LeaderboardRecord::new("steady", 10, 45));
    board.submit(LeaderboardRecord::new("sprinter", 5, 45));
    board.submit(LeaderboardRecord::new("quick", 99, 30));

    let names: Vec<&str> = board
        .records()
        .iter()
        .map(|r| r.username.as_str())
        .collect();
    assert_eq!(names, vec!["quick", "sprinter", "steady", "slow"]);
}

/// Saving and reloading preserves the board, and the file stays
/// read-only between writes.
#[test]
fn test_round_trip_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("board.txt");

    let mut board = Leaderboard::new();
    board.submit(LeaderboardRecord::new("alice", 120, 35));
    board.submit(LeaderboardRecord::new("bob", 90, 50));
    board.save(&path).expect("save");

    let readonly = fs::metadata(&path).expect("metadata").permissions().readonly();
    assert!(readonly, "saved board should be marked read-only");

    let reloaded = Leaderboard::load(&path).expect("load");
    assert_eq!(reloaded.records(), board.records());
}

/// Loading a missing file leaves an empty, read-only board file behind.
#[test]
fn test_missing_file_is_created_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested/board.txt");

    let board = Leaderboard::load(&path).expect("load");

    assert!(board.records().is_empty());
    assert!(path.exists(), "load should create the file");
    let readonly = fs::metadata(&path).expect("metadata").permissions().readonly();
    assert!(readonly);
}

/// A second save succeeds even though the first left the file read-only.
#[test]
fn test_saving_over_a_readonly_board() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("board.txt");

    let mut board = Leaderboard::new();
    board.submit(LeaderboardRecord::new("alice", 120, 35));
    board.save(&path).expect("first save");

    board.submit(LeaderboardRecord::new("bob", 90, 50));
    board.save(&path).expect("second save");

    let reloaded = Leaderboard::load(&path).expect("load");
    assert_eq!(reloaded.records().len(), 2);
}

/// Damaged lines are dropped on load; intact lines survive.
#[test]
fn test_malformed_lines_are_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("board.txt");
    fs::write(
        &path,
        "alice | 120 steps | 35 s\n\
         not a record at all\n\
         bob | twelve steps | 9 s\n\
         carol | 5 steps | 9 s | extra\n\
         | 5 steps | 9 s\n\
         dave | 5 steps | 9\n\
         \n\
         erin | 7 steps | 35 s\n",
    )
    .expect("seed file");

    let board = Leaderboard::load(&path).expect("load");

    let names: Vec<&str> = board
        .records()
        .iter()
        .map(|r| r.username.as_str())
        .collect();
    assert_eq!(names, vec!["erin", "alice"]);
}

proptest! {
    /// However submissions arrive, the board keeps at most one record
    /// per player and stays sorted by time then steps.
    #[test]
    fn prop_board_stays_sorted_with_one_record_per_player(
        entries in proptest::collection::vec(
            ("[a-dA-D]{1,2}", 0u32..500, 0u64..500),
            0..40,
        )
    ) {
        let mut board = Leaderboard::new();
        for (name, steps, time) in entries {
            board.submit(LeaderboardRecord::new(name, steps, time));
        }

        let records = board.records();
        for pair in records.windows(2) {
            prop_assert!(
                (pair[0].time_seconds, pair[0].steps) <= (pair[1].time_seconds, pair[1].steps)
            );
        }
        for (i, a) in records.iter().enumerate() {
            for b in &records[i + 1..] {
                prop_assert!(!a.same_player(b));
            }
        }
    }
}
