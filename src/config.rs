//! Balancing constants and viewport size for one session.
//!
//! Defaults are tuned for a ~60 Hz frame rate; every per-frame quantity
//! below is "units per simulation step".

use std::fmt;
use std::time::Duration;

// ── Defaults ──────────────────────────────────────────────────────────────────

pub const SHIP_SIZE: (f32, f32) = (120.0, 120.0);
/// Distance from the viewport bottom to the ship's top edge at start.
pub const SHIP_LIFT: f32 = 110.0;
pub const SHIP_STEP: f32 = 5.0;

pub const PROJECTILE_SIZE: (f32, f32) = (10.0, 20.0);
pub const PROJECTILE_SPEED: f32 = 7.0;

pub const HAZARD_SIZE: (f32, f32) = (30.0, 30.0);
pub const HAZARD_BASE_SPEED: f32 = 2.0;
pub const HAZARD_SPEED_SPREAD: f32 = 3.0;
pub const SPAWN_BATCH_MIN: u32 = 2;
pub const SPAWN_BATCH_MAX: u32 = 4;

pub const EXPLOSION_START_RADIUS: f32 = 5.0;
pub const EXPLOSION_GROWTH: f32 = 3.0;
/// Opacity lost per step, in hundredths.
pub const EXPLOSION_FADE_PCT: i32 = 5;

pub const SPAWN_PERIOD: Duration = Duration::from_millis(600);
pub const CLOCK_PERIOD: Duration = Duration::from_millis(1000);
pub const SESSION_SECONDS: u32 = 60;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    ViewportTooNarrow { width: f32, needed: f32 },
    ViewportTooShort { height: f32, needed: f32 },
    ZeroPeriod { which: &'static str },
    EmptySpawnBatch { min: u32, max: u32 },
    ZeroDuration,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ViewportTooNarrow { width, needed } => {
                write!(f, "viewport width {width} is narrower than the {needed} units required")
            }
            Self::ViewportTooShort { height, needed } => {
                write!(f, "viewport height {height} is shorter than the {needed} units required")
            }
            Self::ZeroPeriod { which } => write!(f, "{which} period must be non-zero"),
            Self::EmptySpawnBatch { min, max } => {
                write!(f, "spawn batch range {min}..={max} is empty")
            }
            Self::ZeroDuration => write!(f, "session duration must be at least one second"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ── Tuning ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    pub viewport_width: f32,
    pub viewport_height: f32,

    pub ship_size: (f32, f32),
    pub ship_lift: f32,
    pub ship_step: f32,

    pub projectile_size: (f32, f32),
    pub projectile_speed: f32,

    pub hazard_size: (f32, f32),
    pub hazard_base_speed: f32,
    pub hazard_speed_spread: f32,
    pub spawn_batch: (u32, u32),

    pub explosion_start_radius: f32,
    pub explosion_growth: f32,
    pub explosion_fade_pct: i32,

    pub spawn_period: Duration,
    pub clock_period: Duration,
    pub session_seconds: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            ship_size: SHIP_SIZE,
            ship_lift: SHIP_LIFT,
            ship_step: SHIP_STEP,
            projectile_size: PROJECTILE_SIZE,
            projectile_speed: PROJECTILE_SPEED,
            hazard_size: HAZARD_SIZE,
            hazard_base_speed: HAZARD_BASE_SPEED,
            hazard_speed_spread: HAZARD_SPEED_SPREAD,
            spawn_batch: (SPAWN_BATCH_MIN, SPAWN_BATCH_MAX),
            explosion_start_radius: EXPLOSION_START_RADIUS,
            explosion_growth: EXPLOSION_GROWTH,
            explosion_fade_pct: EXPLOSION_FADE_PCT,
            spawn_period: SPAWN_PERIOD,
            clock_period: CLOCK_PERIOD,
            session_seconds: SESSION_SECONDS,
        }
    }
}

impl Tuning {
    /// Default tuning for a viewport of the given size.
    pub fn for_viewport(width: f32, height: f32) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            ..Self::default()
        }
    }

    /// Reject combinations the simulation cannot honour (e.g. a ship wider
    /// than the play field, which would make the clamp range empty).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let needed_w = self.ship_size.0.max(self.hazard_size.0);
        if !(self.viewport_width > needed_w) {
            return Err(ConfigError::ViewportTooNarrow {
                width: self.viewport_width,
                needed: needed_w,
            });
        }
        if !(self.viewport_height > self.ship_lift) {
            return Err(ConfigError::ViewportTooShort {
                height: self.viewport_height,
                needed: self.ship_lift,
            });
        }
        if self.spawn_period.is_zero() {
            return Err(ConfigError::ZeroPeriod { which: "spawn" });
        }
        if self.clock_period.is_zero() {
            return Err(ConfigError::ZeroPeriod { which: "clock" });
        }
        let (min, max) = self.spawn_batch;
        if min > max {
            return Err(ConfigError::EmptySpawnBatch { min, max });
        }
        if self.session_seconds == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(())
    }
}
