//! All game entity types — pure data, no logic.
//!
//! Positions and sizes are in world units ("pixels"); the top-left corner of
//! the viewport is (0, 0) and y grows downward.

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionPhase {
    Active,
    /// Time ran out.  Only an explicit restart leaves this phase.
    Terminal,
}

// ── Player ship ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

// ── Projectiles & hazards ─────────────────────────────────────────────────────

/// A player shot travelling straight up.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Units per frame, applied upward.
    pub speed: f32,
}

/// A falling meteor.  Drawn as a circle inscribed in its bounding box.
#[derive(Clone, Debug, PartialEq)]
pub struct Hazard {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Units per frame, applied downward.  Fixed at spawn time.
    pub speed: f32,
}

impl Hazard {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

// ── Visual effects ────────────────────────────────────────────────────────────

/// Expanding, fading burst left behind by a destroyed hazard.
///
/// Opacity is kept in hundredths so a fixed number of aging steps always
/// lands exactly on zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha_pct: i32,
}

impl Explosion {
    /// Opacity in `[0.0, 1.0]` (may dip below zero for one frame before removal).
    pub fn alpha(&self) -> f32 {
        self.alpha_pct as f32 / 100.0
    }
}

// ── Master world state ────────────────────────────────────────────────────────

/// The entire simulation state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct World {
    pub ship: Ship,
    /// Creation order; only matters for first-match collision lookup.
    pub projectiles: Vec<Projectile>,
    pub hazards: Vec<Hazard>,
    pub explosions: Vec<Explosion>,
    pub score: u32,
    /// Whole seconds left on the session clock.
    pub time_remaining: u32,
    pub phase: SessionPhase,
    pub width: f32,
    pub height: f32,
}

impl World {
    pub fn is_terminal(&self) -> bool {
        self.phase == SessionPhase::Terminal
    }
}
