//! Terminal `Surface`: rasterises world-unit primitives into a grid of
//! character cells, then writes the grid out with crossterm.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    QueueableCommand,
};

use super::{Align, GradientStop, Surface};
use crate::assets::Art;

/// World units covered by one terminal cell.  Cells are roughly twice as
/// tall as they are wide.
pub const CELL_W: f32 = 8.0;
pub const CELL_H: f32 = 16.0;

/// Font sizes at or above this are drawn bold.
const BOLD_FONT: f32 = 40.0;

type Rgb = (u8, u8, u8);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: (255, 255, 255),
            bg: (0, 0, 0),
            bold: false,
        }
    }
}

pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols as usize * rows as usize],
        }
    }

    /// Play-field size in world units.
    pub fn viewport(&self) -> (f32, f32) {
        (self.cols as f32 * CELL_W, self.rows as f32 * CELL_H)
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get(row as usize * self.cols as usize + col as usize)
        } else {
            None
        }
    }

    fn cell_mut(&mut self, col: i64, row: i64) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
            return None;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells.get_mut(idx)
    }

    /// Inclusive-exclusive cell ranges covered by a world-unit rectangle.
    fn span(&self, x: f32, y: f32, w: f32, h: f32) -> (i64, i64, i64, i64) {
        let c0 = (x / CELL_W).floor() as i64;
        let r0 = (y / CELL_H).floor() as i64;
        let c1 = ((x + w) / CELL_W).ceil() as i64;
        let r1 = ((y + h) / CELL_H).ceil() as i64;
        (
            c0.max(0),
            r0.max(0),
            c1.min(self.cols as i64),
            r1.min(self.rows as i64),
        )
    }

    /// Write the whole grid and flush.  Colour changes are only emitted
    /// when a cell differs from its left neighbour.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let mut last: Option<Cell> = None;
            for col in 0..self.cols {
                let Some(&cell) = self.cell(col, row) else { continue };
                if last.map_or(true, |p| p.bg != cell.bg) {
                    out.queue(style::SetBackgroundColor(to_color(cell.bg)))?;
                }
                if last.map_or(true, |p| p.fg != cell.fg) {
                    out.queue(style::SetForegroundColor(to_color(cell.fg)))?;
                }
                if last.map_or(true, |p| p.bold != cell.bold) {
                    let attr = if cell.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                    out.queue(style::SetAttribute(attr))?;
                }
                out.queue(Print(cell.ch))?;
                last = Some(cell);
            }
        }
        out.queue(style::SetAttribute(Attribute::Reset))?;
        out.queue(style::ResetColor)?;
        out.flush()?;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let rgb = to_rgb(color);
        let (c0, r0, c1, r1) = self.span(x, y, w, h);
        for row in r0..r1 {
            for col in c0..c1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    *cell = Cell { ch: ' ', bg: rgb, ..*cell };
                }
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let rgb = to_rgb(color);
        let (c0, r0, c1, r1) = self.span(cx - radius, cy - radius, radius * 2.0, radius * 2.0);
        let mut painted = false;
        for row in r0..r1 {
            for col in c0..c1 {
                let (px, py) = cell_center(col, row);
                if (px - cx).hypot(py - cy) <= radius {
                    if let Some(cell) = self.cell_mut(col, row) {
                        *cell = Cell { ch: ' ', bg: rgb, ..*cell };
                        painted = true;
                    }
                }
            }
        }
        // Small circles can miss every cell centre; mark the one they sit in.
        if !painted {
            let (col, row) = ((cx / CELL_W).floor() as i64, (cy / CELL_H).floor() as i64);
            if let Some(cell) = self.cell_mut(col, row) {
                *cell = Cell { ch: '●', fg: rgb, ..*cell };
            }
        }
    }

    fn radial_gradient(&mut self, cx: f32, cy: f32, radius: f32, stops: &[GradientStop]) {
        if radius <= 0.0 || stops.is_empty() {
            return;
        }
        let (c0, r0, c1, r1) = self.span(cx - radius, cy - radius, radius * 2.0, radius * 2.0);
        for row in r0..r1 {
            for col in c0..c1 {
                let (px, py) = cell_center(col, row);
                let t = (px - cx).hypot(py - cy) / radius;
                if t > 1.0 {
                    continue;
                }
                let (rgb, alpha) = sample_gradient(stops, t);
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.bg = blend(cell.bg, rgb, alpha);
                }
            }
        }
    }

    fn blit(&mut self, art: &Art, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (art_w, art_h) = (art.width(), art.height());
        if art_w == 0 || art_h == 0 {
            return;
        }
        let rgb = to_rgb(color);
        let (c0, r0, c1, r1) = self.span(x, y, w, h);
        let (cols, rows) = ((c1 - c0).max(1) as usize, (r1 - r0).max(1) as usize);
        for row in r0..r1 {
            let line = &art.lines[(row - r0) as usize * art_h / rows];
            for col in c0..c1 {
                let idx = (col - c0) as usize * art_w / cols;
                let Some(ch) = line.chars().nth(idx).filter(|c| *c != ' ') else { continue };
                if let Some(cell) = self.cell_mut(col, row) {
                    *cell = Cell { ch, fg: rgb, ..*cell };
                }
            }
        }
    }

    fn text(&mut self, x: f32, y: f32, size: f32, align: Align, text: &str, color: Color) {
        let rgb = to_rgb(color);
        let len = text.chars().count() as i64;
        let anchor = (x / CELL_W).floor() as i64;
        let start = match align {
            Align::Left => anchor,
            Align::Center => anchor - len / 2,
        };
        // `y` is a baseline; the glyphs sit in the row just above it.
        let row = ((y - 1.0) / CELL_H).floor() as i64;
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(start + i as i64, row) {
                *cell = Cell { ch, fg: rgb, bold: size >= BOLD_FONT, ..*cell };
            }
        }
    }
}

// ── Colour helpers ────────────────────────────────────────────────────────────

fn cell_center(col: i64, row: i64) -> (f32, f32) {
    ((col as f32 + 0.5) * CELL_W, (row as f32 + 0.5) * CELL_H)
}

fn sample_gradient(stops: &[GradientStop], t: f32) -> (Rgb, f32) {
    let first = stops[0];
    if t <= first.offset {
        return (to_rgb(first.color), first.alpha);
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            let k = (t - a.offset) / span;
            let rgb = lerp_rgb(to_rgb(a.color), to_rgb(b.color), k);
            return (rgb, a.alpha + (b.alpha - a.alpha) * k);
        }
    }
    let last = stops[stops.len() - 1];
    (to_rgb(last.color), last.alpha)
}

fn lerp_rgb(a: Rgb, b: Rgb, k: f32) -> Rgb {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * k).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn blend(under: Rgb, over: Rgb, alpha: f32) -> Rgb {
    lerp_rgb(under, over, alpha.clamp(0.0, 1.0))
}

fn to_rgb(color: Color) -> Rgb {
    match color {
        Color::Rgb { r, g, b } => (r, g, b),
        Color::Black => (0, 0, 0),
        Color::Red | Color::DarkRed => (255, 0, 0),
        Color::Yellow | Color::DarkYellow => (255, 255, 0),
        Color::Cyan | Color::DarkCyan => (0, 255, 255),
        Color::Grey | Color::DarkGrey => (128, 128, 128),
        _ => (255, 255, 255),
    }
}

fn to_color((r, g, b): Rgb) -> Color {
    Color::Rgb { r, g, b }
}
