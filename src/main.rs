use std::io::{self, Write, stdout};
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
    },
    execute, terminal,
};

use flapjack::audio::AudioOutput;
use flapjack::config::{Config, Profile};
use flapjack::game::{Game, InputEvent, Mode, SpawnTimer};
use flapjack::render::{PixelBuf, Viewport, draw_scene};
use flapjack::scores::ScoreBoard;
use flapjack::sprites::Assets;
use flapjack::ui;

/// What a terminal event means for the session.
enum Action {
    None,
    Quit,
    Game(InputEvent),
}

/// Name entry wants raw characters; every other mode treats the keyboard as
/// a big activate button, with q and Esc reserved for quitting.
fn translate_key(mode: Mode, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if mode == Mode::NameEntry {
        return match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Enter => Action::Game(InputEvent::Confirm),
            KeyCode::Backspace => Action::Game(InputEvent::Backspace),
            KeyCode::Char(c)
                if !c.is_control()
                    && !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Action::Game(InputEvent::Typed(c))
            }
            _ => Action::None,
        };
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => Action::Game(InputEvent::Activate),
        _ => Action::None,
    }
}

/// Feeds one translated event to the game, sounding the wing beat when the
/// event will flap.
fn feed(game: &mut Game, ev: InputEvent, board: &ScoreBoard, audio: Option<&AudioOutput>) {
    if let Some(audio) = audio {
        if ev == InputEvent::Activate && game.mode == Mode::Playing {
            audio.flap();
        }
    }
    game.handle(ev, board);
}

fn main() -> io::Result<()> {
    // Everything that may write to stdout/stderr happens before raw mode.
    let assets = Assets::load(Path::new("assets"));
    let board = ScoreBoard::from_env();
    let audio = AudioOutput::open();

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        event::EnableMouseCapture,
    )?;

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let (cols, rows) = terminal::size()?;
    let pw = cols as usize;
    let ph = rows as usize * 2;

    let config = Config::for_profile(Profile::for_terminal(pw, ph));
    let mut buf = PixelBuf::new(pw, ph);
    let mut vp = Viewport::fit(&config, pw, ph);
    let mut game = Game::new(config, board.load());
    let mut rng = rand::thread_rng();

    let frame_dur = Duration::from_millis(16); // ~60 fps
    let mut spawn_timer = SpawnTimer::new(game.config.spawn_interval, Instant::now());

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    match translate_key(game.mode, key) {
                        Action::Quit => {
                            cleanup(&mut out)?;
                            if let Some(note) = board.take_save_error() {
                                eprintln!("flapjack: {note}");
                            }
                            return Ok(());
                        }
                        Action::Game(ev) => feed(&mut game, ev, &board, audio.as_ref()),
                        Action::None => {}
                    }
                }
                Event::Mouse(mouse) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                        && game.mode != Mode::NameEntry
                    {
                        feed(&mut game, InputEvent::Activate, &board, audio.as_ref());
                    }
                }
                Event::Resize(c, r) => {
                    let npw = c as usize;
                    let nph = r as usize * 2;
                    buf.resize(npw, nph);
                    vp = Viewport::fit(&game.config, npw, nph);
                }
                _ => {}
            }
        }

        // Obstacle spawning runs on its own wall-clock cadence, independent
        // of the frame rate.
        if spawn_timer.due(Instant::now()) {
            game.spawn_pipe(&mut rng);
        }

        // Physics, with sound cues derived from what changed.
        let was_playing = game.mode == Mode::Playing;
        let score_before = game.score;
        game.update();
        if let Some(audio) = &audio {
            if game.score > score_before {
                audio.score();
            }
            if was_playing && game.mode == Mode::GameOver {
                audio.death();
            }
        }

        // Render
        draw_scene(&mut game, &assets, &vp, &mut buf);
        buf.render(&mut out)?;
        ui::draw(&mut out, &game, &buf, &vp)?;
        out.flush()?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
