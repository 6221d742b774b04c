//! Mode-specific text overlay.
//!
//! Prompts, the typed name and the leaderboard are drawn as real terminal
//! cells on top of the pixel scene, so they stay readable at scales where
//! pixel lettering would not. Each cell's background is sampled from the two
//! scene pixels it covers.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use crate::game::{Game, Mode};
use crate::render::{PixelBuf, Rgb, Viewport};

const TEXT: CColor = CColor::Rgb {
    r: 255,
    g: 255,
    b: 255,
};
const TEXT_DIM: CColor = CColor::Rgb {
    r: 205,
    g: 205,
    b: 205,
};
const TEXT_NAME: CColor = CColor::Rgb {
    r: 255,
    g: 215,
    b: 0,
};

pub fn draw(out: &mut impl Write, game: &Game, buf: &PixelBuf, vp: &Viewport) -> io::Result<()> {
    match game.mode {
        Mode::NameEntry => name_entry(out, game, buf, vp),
        Mode::Welcome => welcome(out, game, buf, vp),
        Mode::Playing => playing(out, game, buf, vp),
        Mode::GameOver => game_over(out, game, buf, vp),
    }
}

fn name_entry(out: &mut impl Write, game: &Game, buf: &PixelBuf, vp: &Viewport) -> io::Result<()> {
    let c = &game.config;
    put_centered(out, buf, row_at(buf, vp, c.height / 3.0), "Welcome to Flapjack!", TEXT)?;
    put_centered(
        out,
        buf,
        row_at(buf, vp, c.height / 2.0 - 30.0),
        "Please enter your name:",
        TEXT,
    )?;
    let typed = format!("{}|", game.player_name);
    put_centered(out, buf, row_at(buf, vp, c.height / 2.0 + 5.0), &typed, TEXT_NAME)?;
    put_centered(
        out,
        buf,
        row_at(buf, vp, c.height / 2.0 + 45.0),
        "Press Enter to start",
        TEXT_DIM,
    )?;
    Ok(())
}

fn welcome(out: &mut impl Write, game: &Game, buf: &PixelBuf, vp: &Viewport) -> io::Result<()> {
    let c = &game.config;
    let greeting = format!("Welcome {}!", game.player_name);
    put_centered(out, buf, row_at(buf, vp, c.height / 3.0), &greeting, TEXT)?;
    put_centered(
        out,
        buf,
        row_at(buf, vp, c.height / 2.0),
        "Click or press Space to start",
        TEXT,
    )?;
    put_centered(
        out,
        buf,
        row_at(buf, vp, c.height - 30.0),
        "Q or Esc quits",
        TEXT_DIM,
    )?;
    Ok(())
}

fn playing(out: &mut impl Write, game: &Game, buf: &PixelBuf, vp: &Viewport) -> io::Result<()> {
    let label = format!("Player: {}", game.player_name);
    let col = vp.x(10.0).max(0) as u16;
    put_text(out, buf, col, row_at(buf, vp, 30.0), &label, TEXT)
}

fn game_over(out: &mut impl Write, game: &Game, buf: &PixelBuf, vp: &Viewport) -> io::Result<()> {
    let c = &game.config;
    put_centered(out, buf, row_at(buf, vp, c.height / 4.0), "Game over!", TEXT)?;
    let summary = format!("{}'s final score: {}", game.player_name, game.score);
    put_centered(out, buf, row_at(buf, vp, c.height / 3.0), &summary, TEXT)?;

    if !game.high_scores.is_empty() {
        let base = row_at(buf, vp, c.height / 2.0);
        let step = (row_at(buf, vp, c.height / 2.0 + 30.0).saturating_sub(base)).max(1);
        put_centered(out, buf, base, "High scores:", TEXT)?;
        for (i, entry) in game.high_scores.iter().enumerate() {
            let line = format!("{}. {} - {} ({})", i + 1, entry.name, entry.score, entry.date);
            put_centered(out, buf, base + step * (i as u16 + 1), &line, TEXT)?;
        }
    }

    put_centered(
        out,
        buf,
        row_at(buf, vp, c.height - 50.0),
        "Click or press Space to restart",
        TEXT_DIM,
    )?;
    Ok(())
}

fn row_at(buf: &PixelBuf, vp: &Viewport, ly: f32) -> u16 {
    let rows = (buf.height() / 2).max(1);
    ((vp.y(ly).max(0) as usize / 2).min(rows - 1)) as u16
}

fn put_centered(
    out: &mut impl Write,
    buf: &PixelBuf,
    row: u16,
    text: &str,
    fg: CColor,
) -> io::Result<()> {
    let col = buf.width().saturating_sub(text.chars().count()) / 2;
    put_text(out, buf, col as u16, row, text, fg)
}

fn put_text(
    out: &mut impl Write,
    buf: &PixelBuf,
    col: u16,
    row: u16,
    text: &str,
    fg: CColor,
) -> io::Result<()> {
    if row as usize >= buf.height() / 2 {
        return Ok(());
    }
    queue!(out, cursor::MoveTo(col, row), style::SetForegroundColor(fg))?;
    let mut prev_bg: Option<Rgb> = None;
    for (i, ch) in text.chars().enumerate() {
        let x = col as usize + i;
        if x >= buf.width() {
            break;
        }
        let top = buf.get(x, row as usize * 2);
        let bot = buf.get(x, row as usize * 2 + 1);
        let bg = Rgb(
            ((top.0 as u16 + bot.0 as u16) / 2) as u8,
            ((top.1 as u16 + bot.1 as u16) / 2) as u8,
            ((top.2 as u16 + bot.2 as u16) / 2) as u8,
        );
        if prev_bg != Some(bg) {
            queue!(
                out,
                style::SetBackgroundColor(CColor::Rgb {
                    r: bg.0,
                    g: bg.1,
                    b: bg.2
                })
            )?;
            prev_bg = Some(bg);
        }
        queue!(out, style::Print(ch))?;
    }
    queue!(out, style::ResetColor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::scores::ScoreEntry;

    fn overlay_for(mode: Mode) -> String {
        let mut game = Game::new(
            Config::standard(),
            vec![ScoreEntry {
                name: "Joy".to_string(),
                score: 9,
                date: "2026-08-23".to_string(),
            }],
        );
        game.player_name = "Joy".to_string();
        game.score = 4;
        game.mode = mode;

        let buf = PixelBuf::new(120, 80);
        let vp = Viewport::fit(&game.config, 120, 80);
        let mut out = Vec::new();
        draw(&mut out, &game, &buf, &vp).expect("writing to a Vec cannot fail");
        String::from_utf8_lossy(&out).into_owned()
    }

    #[test]
    fn name_entry_shows_prompt_and_typed_name() {
        let text = overlay_for(Mode::NameEntry);
        assert!(text.contains("Please enter your name:"));
        assert!(text.contains("Joy|"));
    }

    #[test]
    fn welcome_greets_the_player() {
        let text = overlay_for(Mode::Welcome);
        assert!(text.contains("Welcome Joy!"));
        assert!(text.contains("Space to start"));
    }

    #[test]
    fn playing_shows_name_hud() {
        let text = overlay_for(Mode::Playing);
        assert!(text.contains("Player: Joy"));
    }

    #[test]
    fn game_over_lists_the_leaderboard() {
        let text = overlay_for(Mode::GameOver);
        assert!(text.contains("Game over!"));
        assert!(text.contains("Joy's final score: 4"));
        assert!(text.contains("High scores:"));
        assert!(text.contains("1. Joy - 9 (2026-08-23)"));
    }

    #[test]
    fn text_rows_below_the_screen_are_dropped() {
        let buf = PixelBuf::new(10, 4);
        let mut out = Vec::new();
        put_text(&mut out, &buf, 0, 99, "offscreen", TEXT).expect("vec write");
        assert!(out.is_empty());
    }
}
