//! Whole-session flows through the public library API: name entry, a scoring
//! round, the game-over handoff to the leaderboard, and the reset back to the
//! welcome screen.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use flapjack::config::Config;
use flapjack::game::{Game, InputEvent, Mode, Pipe};
use flapjack::scores::ScoreBoard;

fn unique_scores_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("flapjack-flow-{tag}-{nanos}.json"))
}

fn enter_name(game: &mut Game, board: &ScoreBoard, name: &str) {
    for c in name.chars() {
        game.handle(InputEvent::Typed(c), board);
    }
    game.handle(InputEvent::Confirm, board);
}

/// Starts a round, clears exactly one pipe, then lets gravity end it.
fn play_one_scoring_round(game: &mut Game, board: &ScoreBoard) {
    game.handle(InputEvent::Activate, board);
    assert_eq!(game.mode, Mode::Playing);

    // A pipe already behind the bird scores on the next step.
    let c = game.config.clone();
    game.pipes.push(Pipe {
        x: game.bird.x - c.pipe_width - 1.0,
        top: 200.0,
        bottom: 200.0 + c.pipe_gap,
        scored: false,
    });
    game.update();
    assert_eq!(game.score, 1);

    let mut frames = 0;
    while game.mode == Mode::Playing {
        game.update();
        frames += 1;
        assert!(frames < 10_000, "round should end by falling");
    }
    assert_eq!(game.mode, Mode::GameOver);
}

#[test]
fn full_session_records_the_round() {
    let path = unique_scores_path("session");
    let board = ScoreBoard::at(&path);
    let mut game = Game::new(Config::standard(), board.load());

    assert_eq!(game.mode, Mode::NameEntry);
    enter_name(&mut game, &board, "Joy");
    assert_eq!(game.mode, Mode::Welcome);

    play_one_scoring_round(&mut game, &board);

    game.handle(InputEvent::Activate, &board);
    assert_eq!(game.mode, Mode::Welcome);
    assert_eq!(game.score, 0);
    assert!(game.pipes.is_empty());
    assert_eq!(game.bird.y, game.config.height / 2.0);

    let saved = board.load();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "Joy");
    assert_eq!(saved[0].score, 1);
    assert_eq!(game.high_scores, saved);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn replaying_accumulates_leaderboard_entries() {
    let path = unique_scores_path("replay");
    let board = ScoreBoard::at(&path);
    let mut game = Game::new(Config::standard(), board.load());

    enter_name(&mut game, &board, "Joy");
    for _ in 0..3 {
        play_one_scoring_round(&mut game, &board);
        game.handle(InputEvent::Activate, &board);
        assert_eq!(game.mode, Mode::Welcome);
    }

    let saved = board.load();
    assert_eq!(saved.len(), 3);
    assert!(saved.iter().all(|e| e.name == "Joy" && e.score == 1));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn compact_profile_plays_the_same_flow() {
    let path = unique_scores_path("compact");
    let board = ScoreBoard::at(&path);
    let mut game = Game::new(Config::compact(), board.load());

    enter_name(&mut game, &board, "Kai");
    play_one_scoring_round(&mut game, &board);
    game.handle(InputEvent::Activate, &board);

    let saved = board.load();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "Kai");
    assert_eq!(saved[0].score, 1);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn store_is_untouched_until_a_round_is_recorded() {
    let path = unique_scores_path("untouched");
    let board = ScoreBoard::at(&path);
    let mut game = Game::new(Config::standard(), board.load());

    enter_name(&mut game, &board, "Joy");
    game.handle(InputEvent::Activate, &board);
    game.update();

    assert!(!path.exists());
    assert!(board.load().is_empty());
}
