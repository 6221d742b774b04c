//! A Flappy Bird clone for the terminal: half-block pixel graphics, a
//! four-mode session state machine, synthesized sound effects and a local
//! JSON leaderboard.

pub mod audio;
pub mod config;
pub mod game;
pub mod render;
pub mod scores;
pub mod sprites;
pub mod ui;
