/// Half-block pixel canvas.
///
/// Every terminal cell holds two vertically stacked pixels: the upper one is
/// drawn as the foreground of '▀' and the lower one as the background.  One
/// canvas pixel covers `WORLD_PER_PIXEL` world pixels on both axes.  Text is
/// a separate overlay of whole cells that wins over the pixels beneath it.

use std::io::Write;

use crossterm::{
    cursor,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use glam::Vec2;

use starfall::assets::Picture;

pub type Rgb = [u8; 3];

/// World pixels per canvas pixel.
pub const WORLD_PER_PIXEL: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    /// Source over destination by alpha.
    Normal,
    /// Source added to destination, saturating.  Used for glows.
    Additive,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Glyph {
    ch: char,
    color: Rgb,
}

pub struct Canvas {
    cols: u16,
    rows: u16,
    pixels: Vec<Rgb>,
    text: Vec<Option<Glyph>>,
    /// World-space offset added to every shape and blit (screen shake).
    pub offset: Vec2,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let mut canvas = Canvas {
            cols: 0,
            rows: 0,
            pixels: Vec::new(),
            text: Vec::new(),
            offset: Vec2::ZERO,
        };
        canvas.resize(cols, rows);
        canvas
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols == self.cols && rows == self.rows {
            return;
        }
        self.cols = cols;
        self.rows = rows;
        self.pixels = vec![[0; 3]; cols as usize * rows as usize * 2];
        self.text = vec![None; cols as usize * rows as usize];
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn width_px(&self) -> i32 {
        self.cols as i32
    }

    fn height_px(&self) -> i32 {
        self.rows as i32 * 2
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
        self.text.fill(None);
        self.offset = Vec2::ZERO;
    }

    // ── Pixels ────────────────────────────────────────────────────────────────

    fn paint(&mut self, x: i32, y: i32, color: Rgb, alpha: f32, blend: Blend) {
        if x < 0 || y < 0 || x >= self.width_px() || y >= self.height_px() {
            return;
        }
        let idx = y as usize * self.cols as usize + x as usize;
        let dst = self.pixels[idx];
        let alpha = alpha.clamp(0.0, 1.0);
        self.pixels[idx] = match blend {
            Blend::Normal => mix(dst, color, alpha),
            Blend::Additive => add(dst, color, alpha),
        };
    }

    /// World position to canvas pixel, shake offset included.
    fn to_pixel(&self, world: Vec2) -> Vec2 {
        (world + self.offset) / WORLD_PER_PIXEL
    }

    fn circle(
        &mut self,
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
        blend: Blend,
        ring: bool,
    ) {
        let c = self.to_pixel(center);
        let r = (radius / WORLD_PER_PIXEL).max(0.5);
        let inner = (r - 1.0).max(0.0);
        let (x0, x1) = ((c.x - r).floor() as i32, (c.x + r).ceil() as i32);
        let (y0, y1) = ((c.y - r).floor() as i32, (c.y + r).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(c);
                if d <= r && (!ring || d >= inner) {
                    self.paint(x, y, color, alpha, blend);
                }
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.circle(center, radius, color, 1.0, Blend::Normal, false);
    }

    /// One-pixel outline.
    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.circle(center, radius, color, 1.0, Blend::Normal, true);
    }

    /// Additive filled circle.
    pub fn glow(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.circle(center, radius, color, alpha, Blend::Additive, false);
    }

    /// Axis-aligned rectangle from its top-left corner, in world pixels.
    pub fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgb, alpha: f32) {
        let a = self.to_pixel(min);
        let b = self.to_pixel(min + size);
        for y in a.y.round() as i32..b.y.round() as i32 {
            for x in a.x.round() as i32..b.x.round() as i32 {
                self.paint(x, y, color, alpha, Blend::Normal);
            }
        }
    }

    /// Darken the whole canvas toward black.
    pub fn shade(&mut self, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        for px in self.pixels.iter_mut() {
            *px = mix(*px, [0, 0, 0], alpha);
        }
    }

    /// Draw `picture` scaled to `size` world pixels, centred on `center`.
    /// Nearest-neighbour sampling; the picture's own alpha is multiplied by
    /// `alpha`.
    pub fn blit(&mut self, picture: &Picture, center: Vec2, size: Vec2, alpha: f32, blend: Blend) {
        let min = self.to_pixel(center - size / 2.0);
        let span = size / WORLD_PER_PIXEL;
        if span.x <= 0.0 || span.y <= 0.0 {
            return;
        }
        let (x0, x1) = (min.x.floor() as i32, (min.x + span.x).ceil() as i32);
        let (y0, y1) = (min.y.floor() as i32, (min.y + span.y).ceil() as i32);
        for y in y0.max(0)..y1.min(self.height_px()) {
            let v = (y as f32 + 0.5 - min.y) / span.y;
            for x in x0.max(0)..x1.min(self.width_px()) {
                let u = (x as f32 + 0.5 - min.x) / span.x;
                let sx = (u * picture.width as f32).floor() as i64;
                let sy = (v * picture.height as f32).floor() as i64;
                if let Some([r, g, b, a]) = picture.pixel(sx, sy) {
                    if a > 0 {
                        self.paint(x, y, [r, g, b], alpha * a as f32 / 255.0, blend);
                    }
                }
            }
        }
    }

    // ── Text overlay ──────────────────────────────────────────────────────────

    pub fn text(&mut self, col: i32, row: i32, s: &str, color: Rgb) {
        if row < 0 || row >= self.rows as i32 {
            return;
        }
        for (i, ch) in s.chars().enumerate() {
            let c = col + i as i32;
            if c < 0 || c >= self.cols as i32 {
                continue;
            }
            self.text[row as usize * self.cols as usize + c as usize] = Some(Glyph { ch, color });
        }
    }

    pub fn text_centered(&mut self, row: i32, s: &str, color: Rgb) {
        let col = (self.cols as i32 - s.chars().count() as i32) / 2;
        self.text(col, row, s, color);
    }

    /// Text centred on a world position.
    pub fn label(&mut self, world: Vec2, s: &str, color: Rgb) {
        let p = self.to_pixel(world);
        let col = p.x as i32 - s.chars().count() as i32 / 2;
        self.text(col, (p.y / 2.0) as i32, s, color);
    }

    // ── Output ────────────────────────────────────────────────────────────────

    /// Write the whole canvas, skipping colour changes that would repeat the
    /// current terminal colour.
    pub fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;
        let cols = self.cols as usize;

        for row in 0..self.rows as usize {
            out.queue(cursor::MoveTo(0, row as u16))?;
            for col in 0..cols {
                let top = self.pixels[row * 2 * cols + col];
                let bottom = self.pixels[(row * 2 + 1) * cols + col];
                let (ch, want_fg, want_bg) = match self.text[row * cols + col] {
                    Some(g) => (g.ch, g.color, mix(top, bottom, 0.5)),
                    None => ('▀', top, bottom),
                };
                if fg != Some(want_fg) {
                    out.queue(SetForegroundColor(rgb(want_fg)))?;
                    fg = Some(want_fg);
                }
                if bg != Some(want_bg) {
                    out.queue(SetBackgroundColor(rgb(want_bg)))?;
                    bg = Some(want_bg);
                }
                out.queue(Print(ch))?;
            }
        }
        Ok(())
    }
}

fn rgb([r, g, b]: Rgb) -> Color {
    Color::Rgb { r, g, b }
}

fn mix(dst: Rgb, src: Rgb, alpha: f32) -> Rgb {
    let ch = |d: u8, s: u8| (d as f32 + (s as f32 - d as f32) * alpha).round() as u8;
    [ch(dst[0], src[0]), ch(dst[1], src[1]), ch(dst[2], src[2])]
}

fn add(dst: Rgb, src: Rgb, alpha: f32) -> Rgb {
    let ch = |d: u8, s: u8| (d as f32 + s as f32 * alpha).min(255.0) as u8;
    [ch(dst[0], src[0]), ch(dst[1], src[1]), ch(dst[2], src[2])]
}
