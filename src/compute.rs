//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `World` (plus the session `Tuning` and, where needed, an RNG handle) and
//! returns a brand-new `World`.  Side effects are limited to the injected RNG
//! and log output.

use log::{debug, info};
use rand::Rng;

use crate::config::Tuning;
use crate::entities::{Explosion, Hazard, Projectile, SessionPhase, Ship, World};
use crate::input::Steering;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh Active world: ship centred at the bottom, empty collections,
/// full clock.
pub fn init_world(tuning: &Tuning) -> World {
    let (ship_w, ship_h) = tuning.ship_size;
    World {
        ship: Ship {
            x: (tuning.viewport_width - ship_w) / 2.0,
            y: tuning.viewport_height - tuning.ship_lift,
            w: ship_w,
            h: ship_h,
        },
        projectiles: Vec::new(),
        hazards: Vec::new(),
        explosions: Vec::new(),
        score: 0,
        time_remaining: tuning.session_seconds,
        phase: SessionPhase::Active,
        width: tuning.viewport_width,
        height: tuning.viewport_height,
    }
}

/// Terminal → Active.  Everything is rebuilt from the tuning; nothing from
/// the old world survives.
pub fn restart(state: &World, tuning: &Tuning) -> World {
    info!("session restarted (previous score {})", state.score);
    init_world(tuning)
}

// ── Event-driven transitions (pure) ──────────────────────────────────────────

/// Launch one projectile from the ship's nose.  Called once per fire-key
/// press edge, never per frame.
pub fn fire(state: &World, tuning: &Tuning) -> World {
    if state.is_terminal() {
        return state.clone();
    }
    let (w, h) = tuning.projectile_size;
    let shot = Projectile {
        x: state.ship.x + state.ship.w / 2.0 - w / 2.0,
        y: state.ship.y,
        w,
        h,
        speed: tuning.projectile_speed,
    };
    let mut projectiles = state.projectiles.clone();
    projectiles.push(shot);
    World {
        projectiles,
        ..state.clone()
    }
}

/// Spawner tick: drop a batch of hazards just above the top edge.
pub fn spawn_hazards(state: &World, tuning: &Tuning, rng: &mut impl Rng) -> World {
    if state.is_terminal() {
        return state.clone();
    }
    let (w, h) = tuning.hazard_size;
    let (min, max) = tuning.spawn_batch;
    let count = rng.gen_range(min..=max);
    let span = (state.width - w).max(0.0);

    let mut hazards = state.hazards.clone();
    for _ in 0..count {
        hazards.push(Hazard {
            x: rng.gen::<f32>() * span,
            y: -h,
            w,
            h,
            speed: tuning.hazard_base_speed + rng.gen::<f32>() * tuning.hazard_speed_spread,
        });
    }
    debug!("spawned {} hazards ({} live)", count, hazards.len());

    World {
        hazards,
        ..state.clone()
    }
}

/// Session-clock tick: one second off the clock.  Reaching zero flips the
/// world into the terminal phase exactly once.
pub fn clock_tick(state: &World) -> World {
    if state.is_terminal() {
        return state.clone();
    }
    let time_remaining = state.time_remaining.saturating_sub(1);
    let phase = if time_remaining == 0 {
        info!("time up, final score {}", state.score);
        SessionPhase::Terminal
    } else {
        SessionPhase::Active
    };
    World {
        time_remaining,
        phase,
        ..state.clone()
    }
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Strict AABB overlap: edges that merely touch do not collide.
pub fn overlaps(p: &Projectile, h: &Hazard) -> bool {
    p.x < h.x + h.w && p.x + p.w > h.x && p.y < h.y + h.h && p.y + p.h > h.y
}

// ── Per-frame step ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  A terminal world is returned as-is.
pub fn step(state: &World, steering: Steering, tuning: &Tuning) -> World {
    if state.is_terminal() {
        return state.clone();
    }

    // ── 1. Ship ──────────────────────────────────────────────────────────────
    // Both directions apply unconditionally; holding both cancels out.
    let mut x = state.ship.x;
    if steering.left {
        x -= tuning.ship_step;
    }
    if steering.right {
        x += tuning.ship_step;
    }
    let ship = Ship {
        x: x.clamp(0.0, state.width - state.ship.w),
        ..state.ship.clone()
    };

    // ── 2. Projectiles ───────────────────────────────────────────────────────
    let mut projectiles: Vec<Projectile> = state
        .projectiles
        .iter()
        .map(|p| Projectile { y: p.y - p.speed, ..p.clone() })
        .filter(|p| p.y + p.h > 0.0)
        .collect();

    // ── 3. Hazards + collision ───────────────────────────────────────────────
    let mut score = state.score;
    let mut explosions = state.explosions.clone();
    let mut hazards = Vec::with_capacity(state.hazards.len());

    for hazard in &state.hazards {
        let moved = Hazard { y: hazard.y + hazard.speed, ..hazard.clone() };

        // First surviving projectile wins; it is consumed with the hazard.
        if let Some(hit) = projectiles.iter().position(|p| overlaps(p, &moved)) {
            projectiles.remove(hit);
            score += 1;
            let (cx, cy) = moved.center();
            debug!("hazard destroyed at ({cx:.1}, {cy:.1}), score {score}");
            explosions.push(Explosion {
                x: cx,
                y: cy,
                radius: tuning.explosion_start_radius,
                alpha_pct: 100,
            });
            continue;
        }

        // Hazards past the bottom edge are dropped without penalty.
        if moved.y < state.height {
            hazards.push(moved);
        }
    }

    // ── 4. Explosions ────────────────────────────────────────────────────────
    let explosions: Vec<Explosion> = explosions
        .into_iter()
        .map(|e| Explosion {
            radius: e.radius + tuning.explosion_growth,
            alpha_pct: e.alpha_pct - tuning.explosion_fade_pct,
            ..e
        })
        .filter(|e| e.alpha_pct > 0)
        .collect();

    World {
        ship,
        projectiles,
        hazards,
        explosions,
        score,
        ..state.clone()
    }
}
