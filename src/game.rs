//! Core session state: the four-mode state machine, the per-frame physics
//! step and the obstacle spawner. Everything here runs in logical playfield
//! units and knows nothing about the terminal.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::config::{Config, NAME_MAX_CHARS};
use crate::scores::{ScoreBoard, ScoreEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    NameEntry,
    Welcome,
    Playing,
    GameOver,
}

/// Input already translated out of terminal terms. The loop driver decides
/// which keys and clicks map to which event; the game only sees these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Typed(char),
    Backspace,
    Confirm,
    Activate,
}

#[derive(Debug, Clone)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
}

/// An obstacle pair. `top` is the bottom edge of the upper pipe, `bottom`
/// the top edge of the lower pipe; the gap between them is the safe lane.
#[derive(Debug, Clone)]
pub struct Pipe {
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
    pub scored: bool,
}

/// A "+1" that floats up from the bird and fades out.
#[derive(Debug, Clone)]
pub struct ScoreEffect {
    pub x: f32,
    pub y: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct Game {
    pub config: Config,
    pub mode: Mode,
    pub bird: Bird,
    pub pipes: Vec<Pipe>,
    pub score: u32,
    pub player_name: String,
    pub effects: Vec<ScoreEffect>,
    pub ground_offset: f32,
    pub high_scores: Vec<ScoreEntry>,
}

impl Game {
    pub fn new(config: Config, high_scores: Vec<ScoreEntry>) -> Game {
        let bird = Bird {
            x: config.bird_x,
            y: config.height / 2.0,
            vy: 0.0,
            width: config.bird_size,
            height: config.bird_size,
        };
        Game {
            mode: Mode::NameEntry,
            bird,
            pipes: Vec::new(),
            score: 0,
            player_name: String::new(),
            effects: Vec::new(),
            ground_offset: 0.0,
            high_scores,
            config,
        }
    }

    /// Drives the state machine. Mode transitions are the only place the
    /// score is reset and the only trigger for leaderboard writes.
    pub fn handle(&mut self, event: InputEvent, board: &ScoreBoard) {
        match (self.mode, event) {
            (Mode::NameEntry, InputEvent::Typed(c)) => {
                if self.player_name.chars().count() < NAME_MAX_CHARS {
                    self.player_name.push(c);
                }
            }
            (Mode::NameEntry, InputEvent::Backspace) => {
                self.player_name.pop();
            }
            (Mode::NameEntry, InputEvent::Confirm) => {
                if !self.player_name.trim().is_empty() {
                    self.mode = Mode::Welcome;
                }
            }
            (Mode::Welcome, InputEvent::Activate) => {
                self.mode = Mode::Playing;
            }
            (Mode::Playing, InputEvent::Activate) => {
                self.flap();
            }
            (Mode::GameOver, InputEvent::Activate) => {
                if self.score > 0 {
                    self.high_scores = board.save(&self.player_name, self.score);
                }
                self.reset_round();
                self.mode = Mode::Welcome;
            }
            _ => {}
        }
    }

    pub fn flap(&mut self) {
        self.bird.vy = self.config.flap_speed;
    }

    /// One physics frame. A no-op outside of play.
    pub fn update(&mut self) {
        if self.mode != Mode::Playing {
            return;
        }

        self.ground_offset =
            (self.ground_offset + self.config.ground_speed) % self.config.width;

        self.bird.vy += self.config.gravity;
        self.bird.y += self.bird.vy;

        // Hitting the ground ends the round before obstacles move.
        let ground_y = self.config.ground_y();
        if self.bird.y + self.bird.height > ground_y {
            self.bird.y = ground_y - self.bird.height;
            self.mode = Mode::GameOver;
            return;
        }

        if self.bird.y < 0.0 {
            self.bird.y = 0.0;
            self.bird.vy = 0.0;
        }

        for pipe in &mut self.pipes {
            pipe.x -= self.config.pipe_speed;

            let overlaps_x = self.bird.x + self.bird.width > pipe.x
                && self.bird.x < pipe.x + self.config.pipe_width;
            let exits_gap =
                self.bird.y < pipe.top || self.bird.y + self.bird.height > pipe.bottom;
            if overlaps_x && exits_gap {
                // Terminal, but the rest of this frame's obstacles still advance.
                self.mode = Mode::GameOver;
            }

            if pipe.x + self.config.pipe_width < self.bird.x && !pipe.scored {
                pipe.scored = true;
                self.score += 1;
                self.effects.push(ScoreEffect {
                    x: self.bird.x + self.bird.width + 20.0,
                    y: self.bird.y,
                    opacity: 1.0,
                });
            }
        }

        let pipe_width = self.config.pipe_width;
        self.pipes.retain(|pipe| pipe.x > -pipe_width);
    }

    /// Materializes one obstacle pair at the right edge, gap placed uniformly
    /// at random. Only meaningful while playing; other modes ignore the
    /// spawn timer entirely.
    pub fn spawn_pipe(&mut self, rng: &mut impl Rng) {
        if self.mode != Mode::Playing {
            return;
        }
        let c = &self.config;
        let top = rng.gen_range(c.spawn_margin..c.height - c.pipe_gap - c.spawn_margin);
        self.pipes.push(Pipe {
            x: c.width,
            top,
            bottom: top + c.pipe_gap,
            scored: false,
        });
    }

    /// Moves each score effect up and fades it; spent effects are dropped.
    pub fn age_effects(&mut self) {
        let rise = self.config.effect_rise;
        let fade = self.config.effect_fade;
        for effect in &mut self.effects {
            effect.y -= rise;
            effect.opacity -= fade;
        }
        self.effects.retain(|effect| effect.opacity > 0.0);
    }

    fn reset_round(&mut self) {
        self.bird.y = self.config.height / 2.0;
        self.bird.vy = 0.0;
        self.pipes.clear();
        self.score = 0;
    }
}

/// Free-running wall-clock deadline for the obstacle spawner. Armed once at
/// startup, never per round. Periods missed while the process is stalled
/// collapse into a single tick and the deadline re-phases to the next period
/// boundary, so obstacles cannot pile up at the right edge.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    period: Duration,
    deadline: Instant,
}

impl SpawnTimer {
    pub fn new(period: Duration, now: Instant) -> SpawnTimer {
        SpawnTimer {
            period,
            deadline: now + period,
        }
    }

    /// True once the deadline has passed, at most once per elapsed stretch.
    pub fn due(&mut self, now: Instant) -> bool {
        if now < self.deadline {
            return false;
        }
        while self.deadline <= now {
            self.deadline += self.period;
        }
        true
    }
}
