//! Rendering layer.
//!
//! `render` reads the world and paints it onto any `Surface`; it never
//! mutates simulation state and may be skipped or throttled freely.  The
//! terminal implementation of `Surface` lives in `terminal`.

mod terminal;

pub use terminal::{Cell, TerminalSurface, CELL_H, CELL_W};

use crossterm::style::Color;

use crate::assets::{Art, Assets};
use crate::entities::World;
use crate::share::{share_url, GAME_URL};

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_BACKGROUND: Color = Color::Rgb { r: 0, g: 0, b: 0 };
pub const C_BACKDROP_ART: Color = Color::Rgb { r: 70, g: 70, b: 110 };
pub const C_SHIP: Color = Color::Rgb { r: 0, g: 255, b: 255 };
pub const C_PROJECTILE: Color = Color::Rgb { r: 255, g: 255, b: 0 };
pub const C_HAZARD: Color = Color::Rgb { r: 255, g: 0, b: 0 };
pub const C_HUD: Color = Color::Rgb { r: 255, g: 255, b: 255 };
pub const C_GAME_OVER: Color = Color::Rgb { r: 255, g: 255, b: 0 };
pub const C_HINT: Color = Color::Rgb { r: 128, g: 128, b: 128 };

const EXPLOSION_CORE: Color = Color::Rgb { r: 255, g: 255, b: 0 };
const EXPLOSION_MID: Color = Color::Rgb { r: 255, g: 100, b: 0 };
const EXPLOSION_EDGE: Color = Color::Rgb { r: 255, g: 0, b: 0 };

const HUD_FONT: f32 = 24.0;
const BANNER_FONT: f32 = 48.0;

// ── Drawing capability ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Align {
    Left,
    Center,
}

/// One colour stop of a radial gradient; `offset` runs 0.0 (centre) to 1.0 (rim).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
    pub alpha: f32,
}

/// Primitive drawing operations, all in world units.
pub trait Surface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color);
    fn radial_gradient(&mut self, cx: f32, cy: f32, radius: f32, stops: &[GradientStop]);
    /// Stretch `art` over the given rectangle.
    fn blit(&mut self, art: &Art, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn text(&mut self, x: f32, y: f32, size: f32, align: Align, text: &str, color: Color);
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Paint one complete frame.
pub fn render<S: Surface>(surface: &mut S, world: &World, assets: &Assets) {
    draw_background(surface, world, assets);
    draw_ship(surface, world, assets);

    for p in &world.projectiles {
        surface.fill_rect(p.x, p.y, p.w, p.h, C_PROJECTILE);
    }
    for h in &world.hazards {
        let (cx, cy) = h.center();
        surface.fill_circle(cx, cy, h.w.min(h.h) / 2.0, C_HAZARD);
    }
    draw_explosions(surface, world);
    draw_hud(surface, world);

    if world.is_terminal() {
        draw_game_over(surface, world);
    }
}

// ── Layers ────────────────────────────────────────────────────────────────────

fn draw_background<S: Surface>(surface: &mut S, world: &World, assets: &Assets) {
    surface.fill_rect(0.0, 0.0, world.width, world.height, C_BACKGROUND);
    if let Some(art) = &assets.background {
        surface.blit(art, 0.0, 0.0, world.width, world.height, C_BACKDROP_ART);
    }
}

fn draw_ship<S: Surface>(surface: &mut S, world: &World, assets: &Assets) {
    let s = &world.ship;
    match &assets.ship {
        Some(art) => surface.blit(art, s.x, s.y, s.w, s.h, C_SHIP),
        None => surface.fill_rect(s.x, s.y, s.w, s.h, C_SHIP),
    }
}

fn draw_explosions<S: Surface>(surface: &mut S, world: &World) {
    for e in &world.explosions {
        let alpha = e.alpha().max(0.0);
        let stops = [
            GradientStop { offset: 0.0, color: EXPLOSION_CORE, alpha },
            GradientStop { offset: 0.5, color: EXPLOSION_MID, alpha },
            GradientStop { offset: 1.0, color: EXPLOSION_EDGE, alpha: 0.0 },
        ];
        surface.radial_gradient(e.x, e.y, e.radius, &stops);
    }
}

fn draw_hud<S: Surface>(surface: &mut S, world: &World) {
    surface.text(20.0, 40.0, HUD_FONT, Align::Left, &format!("Score: {}", world.score), C_HUD);
    surface.text(
        20.0,
        70.0,
        HUD_FONT,
        Align::Left,
        &format!("Time: {}s", world.time_remaining),
        C_HUD,
    );
}

// ── Session-ended overlay ─────────────────────────────────────────────────────

fn draw_game_over<S: Surface>(surface: &mut S, world: &World) {
    let cx = world.width / 2.0;
    let cy = world.height / 2.0;

    surface.text(cx, cy - 50.0, BANNER_FONT, Align::Center, "Congratulations!", C_GAME_OVER);
    surface.text(
        cx,
        cy + 10.0,
        BANNER_FONT,
        Align::Center,
        &format!("Your Score: {}", world.score),
        C_GAME_OVER,
    );
    surface.text(cx, cy + 70.0, HUD_FONT, Align::Center, "R - Play Again  Q - Quit", C_HUD);
    surface.text(
        cx,
        cy + 110.0,
        HUD_FONT,
        Align::Center,
        &share_url(world.score, GAME_URL),
        C_HINT,
    );
}
