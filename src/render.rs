//! Half-block pixel rendering.
//!
//! The scene is drawn into an RGB pixel buffer at two pixels per terminal
//! cell row, then queued as U+2580 upper-half-block cells, changing colors
//! only when a run ends. The playfield keeps its logical aspect ratio and is
//! letterboxed inside the terminal.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use crate::config::Config;
use crate::game::{Game, Mode, Pipe};
use crate::sprites::{Art, Assets, Sprite};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }
}

pub const BACKDROP: Rgb = Rgb(24, 26, 30);
const SKY_TOP: Rgb = Rgb(75, 182, 239);
const SKY_BOT: Rgb = Rgb(137, 207, 240);
const GRASS_TOP: Rgb = Rgb(144, 238, 144);
const GRASS_BOT: Rgb = Rgb(34, 139, 34);
const TUFT: Rgb = Rgb(0, 100, 0);
const PIPE_EDGE: Rgb = Rgb(32, 136, 56);
const PIPE_MID: Rgb = Rgb(48, 192, 64);
const PIPE_CAP: Rgb = Rgb(20, 88, 40);
const BIRD_FALLBACK: Rgb = Rgb(255, 255, 0);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![BACKDROP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, BACKDROP);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Mixes `c` over the existing pixel at the given opacity.
    pub fn blend(&mut self, x: i32, y: i32, c: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let i = y as usize * self.w + x as usize;
        let old = self.px[i];
        let mix = |o: u8, n: u8| (o as f32 + (n as f32 - o as f32) * a) as u8;
        self.px[i] = Rgb(mix(old.0, c.0), mix(old.1, c.1), mix(old.2, c.2));
    }

    /// Darkens the whole frame; sits under the game-over overlay.
    pub fn dim(&mut self) {
        for p in &mut self.px {
            *p = Rgb(p.0 / 2, p.1 / 2, p.2 / 2);
        }
    }

    /// Queues the buffer as half-block cells. The caller composites the text
    /// overlay on top and flushes once per frame.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(
                            out,
                            style::SetBackgroundColor(CColor::Rgb {
                                r: top.0,
                                g: top.1,
                                b: top.2
                            })
                        )?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(
                            out,
                            style::SetForegroundColor(CColor::Rgb {
                                r: top.0,
                                g: top.1,
                                b: top.2
                            })
                        )?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(
                            out,
                            style::SetBackgroundColor(CColor::Rgb {
                                r: bot.0,
                                g: bot.1,
                                b: bot.2
                            })
                        )?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row < rows - 1 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        Ok(())
    }
}

// ── Viewport ────────────────────────────────────────────────────────────────

/// Uniform mapping from logical playfield units to buffer pixels: scaled to
/// fit, centered, capped by the profile's fill factor.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    scale: f32,
    ox: f32,
    oy: f32,
}

impl Viewport {
    pub fn fit(config: &Config, pixel_w: usize, pixel_h: usize) -> Viewport {
        let sx = pixel_w as f32 / config.width;
        let sy = pixel_h as f32 / config.height;
        let scale = sx.min(sy) * config.view_fill;
        Viewport {
            scale,
            ox: (pixel_w as f32 - config.width * scale) / 2.0,
            oy: (pixel_h as f32 - config.height * scale) / 2.0,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn x(&self, lx: f32) -> i32 {
        (self.ox + lx * self.scale).round() as i32
    }

    pub fn y(&self, ly: f32) -> i32 {
        (self.oy + ly * self.scale).round() as i32
    }

    /// Maps a logical rect to pixels, keeping at least one pixel per axis so
    /// thin features stay visible at small scales.
    pub fn rect(&self, lx: f32, ly: f32, lw: f32, lh: f32) -> (i32, i32, i32, i32) {
        let x0 = self.x(lx);
        let y0 = self.y(ly);
        let w = (self.x(lx + lw) - x0).max(1);
        let h = (self.y(ly + lh) - y0).max(1);
        (x0, y0, w, h)
    }
}

// ── 3x5 bitmap digits ───────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const GLYPH_PLUS: [u8; 15] = [
    0,0,0, 0,1,0, 1,1,1, 0,1,0, 0,0,0,
];

fn draw_digit(buf: &mut PixelBuf, x: i32, y: i32, d: u8, size: i32, fg: Rgb, shadow: bool) {
    let glyph = &DIGITS[d as usize];
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32 * size;
                let py = y + row as i32 * size;
                if shadow {
                    buf.fill_rect(px + size, py + size, size, size, SHADOW);
                }
                buf.fill_rect(px, py, size, size, fg);
            }
        }
    }
}

fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, size: i32, fg: Rgb) {
    let s = n.to_string();
    // 3px per digit + 1px spacing, scaled.
    let total_w = (s.len() as i32 * 4 - 1) * size;
    let start_x = cx - total_w / 2;
    for (i, ch) in s.chars().enumerate() {
        let d = ch as u8 - b'0';
        draw_digit(buf, start_x + i as i32 * 4 * size, y, d, size, fg, true);
    }
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Draws one frame into the pixel buffer: sky, ground, score effects, bird,
/// pipes, then the in-scene parts of the mode overlay. Ages the score
/// effects as it draws them; everything else is read-only.
pub fn draw_scene(game: &mut Game, assets: &Assets, vp: &Viewport, buf: &mut PixelBuf) {
    game.age_effects();

    buf.fill(BACKDROP);
    draw_sky(buf, vp, &game.config);
    draw_ground(buf, vp, &game.config, game.ground_offset);

    for effect in &game.effects {
        draw_effect(buf, vp.x(effect.x), vp.y(effect.y), effect.opacity);
    }

    draw_bird(buf, vp, game, &assets.bird);
    for pipe in &game.pipes {
        draw_pipe(buf, vp, &game.config, pipe, &assets.pipe);
    }

    match game.mode {
        Mode::Playing => {
            let size = ((48.0 * vp.scale()) / 5.0).round().max(1.0) as i32;
            draw_number(buf, vp.x(game.config.width / 2.0), vp.y(30.0), game.score, size, WHITE);
        }
        Mode::NameEntry => draw_input_box(buf, vp, &game.config),
        Mode::GameOver => buf.dim(),
        Mode::Welcome => {}
    }
}

fn draw_sky(buf: &mut PixelBuf, vp: &Viewport, config: &Config) {
    let x0 = vp.x(0.0);
    let x1 = vp.x(config.width);
    let y0 = vp.y(0.0);
    let y1 = vp.y(config.height);
    let span = (y1 - y0).max(1);
    for y in y0..y1 {
        let t = ((y - y0) * 256 / span) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in x0..x1 {
            buf.set(x, y, c);
        }
    }
}

fn draw_ground(buf: &mut PixelBuf, vp: &Viewport, config: &Config, offset: f32) {
    let x0 = vp.x(0.0);
    let x1 = vp.x(config.width);
    let gy = vp.y(config.ground_y());
    let y1 = vp.y(config.height);
    let span = (y1 - gy).max(1);
    for y in gy..y1 {
        let t = ((y - gy) * 256 / span) as u16;
        let c = Rgb::lerp(GRASS_TOP, GRASS_BOT, t);
        for x in x0..x1 {
            buf.set(x, y, c);
        }
    }

    // Grass tufts tile every 30 logical units and scroll with the ground.
    let mut gx = -(offset % 30.0);
    while gx < config.width {
        draw_tuft(buf, vp, config, gx, x0, x1);
        gx += 30.0;
    }
}

/// One triangular tuft: 30 units wide at the ground line, apex 10 above it.
fn draw_tuft(buf: &mut PixelBuf, vp: &Viewport, config: &Config, gx: f32, x_min: i32, x_max: i32) {
    let (px, py, w, h) = vp.rect(gx, config.ground_y() - 10.0, 30.0, 10.0);
    let cx = px as f32 + w as f32 / 2.0;
    for dy in 0..h {
        let half = w as f32 * (dy as f32 + 1.0) / h as f32 / 2.0;
        let xs = ((cx - half).round() as i32).max(x_min);
        let xe = ((cx + half).round() as i32).min(x_max);
        for x in xs..xe {
            buf.set(x, py + dy, TUFT);
        }
    }
}

fn draw_effect(buf: &mut PixelBuf, x: i32, y: i32, opacity: f32) {
    for (x_off, glyph) in [(0, &GLYPH_PLUS), (4, &DIGITS[1])] {
        for row in 0..5 {
            for col in 0..3 {
                if glyph[row * 3 + col] == 1 {
                    buf.blend(x + x_off + col as i32, y + row as i32, WHITE, opacity);
                }
            }
        }
    }
}

fn draw_bird(buf: &mut PixelBuf, vp: &Viewport, game: &Game, art: &Art) {
    let b = &game.bird;
    let (x, y, w, h) = vp.rect(b.x, b.y, b.width, b.height);
    match art {
        Art::Sprite(sprite) => blit(buf, sprite, x, y, w, h, false),
        Art::Procedural => buf.fill_rect(x, y, w, h, BIRD_FALLBACK),
    }
}

fn draw_pipe(buf: &mut PixelBuf, vp: &Viewport, config: &Config, pipe: &Pipe, art: &Art) {
    let top_rect = vp.rect(pipe.x, 0.0, config.pipe_width, pipe.top);
    let bottom_rect = vp.rect(
        pipe.x,
        pipe.bottom,
        config.pipe_width,
        config.height - pipe.bottom,
    );
    match art {
        Art::Sprite(sprite) => {
            let (x, y, w, h) = bottom_rect;
            blit(buf, sprite, x, y, w, h, false);
            // The upper pipe is the same sprite drawn upside down.
            let (x, y, w, h) = top_rect;
            blit(buf, sprite, x, y, w, h, true);
        }
        Art::Procedural => {
            draw_pipe_body(buf, top_rect);
            draw_pipe_body(buf, bottom_rect);
            // End caps overhang the column by 3 units on each side.
            let (x, y, w, h) = vp.rect(
                pipe.x - 3.0,
                pipe.top - config.pipe_cap_height,
                config.pipe_width + 6.0,
                config.pipe_cap_height,
            );
            buf.fill_rect(x, y, w, h, PIPE_CAP);
            let (x, y, w, h) = vp.rect(
                pipe.x - 3.0,
                pipe.bottom,
                config.pipe_width + 6.0,
                config.pipe_cap_height,
            );
            buf.fill_rect(x, y, w, h, PIPE_CAP);
        }
    }
}

fn draw_pipe_body(buf: &mut PixelBuf, (x, y, w, h): (i32, i32, i32, i32)) {
    for dx in 0..w {
        let c = pipe_shade(dx, w);
        for dy in 0..h {
            buf.set(x + dx, y + dy, c);
        }
    }
}

/// Symmetric shading across the pipe column: dark edges, bright center.
fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_MID;
    }
    let t = x * 512 / (total_w - 1);
    if t < 256 {
        Rgb::lerp(PIPE_EDGE, PIPE_MID, t.min(256) as u16)
    } else {
        Rgb::lerp(PIPE_MID, PIPE_EDGE, (t - 256).min(256) as u16)
    }
}

fn draw_input_box(buf: &mut PixelBuf, vp: &Viewport, config: &Config) {
    let (x, y, w, h) = vp.rect(
        config.width / 2.0 - 100.0,
        config.height / 2.0 - 10.0,
        200.0,
        30.0,
    );
    for dx in 0..w {
        buf.set(x + dx, y, WHITE);
        buf.set(x + dx, y + h - 1, WHITE);
    }
    for dy in 0..h {
        buf.set(x, y + dy, WHITE);
        buf.set(x + w - 1, y + dy, WHITE);
    }
}

/// Nearest-neighbour sprite stretch with alpha blending. `flip_y` draws the
/// sprite upside down.
fn blit(buf: &mut PixelBuf, sprite: &Sprite, x: i32, y: i32, w: i32, h: i32, flip_y: bool) {
    if w <= 0 || h <= 0 || sprite.width() == 0 || sprite.height() == 0 {
        return;
    }
    for dy in 0..h {
        let src_row = if flip_y { h - 1 - dy } else { dy };
        let sy = src_row as usize * sprite.height() / h as usize;
        for dx in 0..w {
            let sx = dx as usize * sprite.width() / w as usize;
            let [r, g, b, a] = sprite.pixel(sx, sy);
            if a > 0 {
                buf.blend(x + dx, y + dy, Rgb(r, g, b), a as f32 / 255.0);
            }
        }
    }
}
