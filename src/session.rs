//! Session coordinator.
//!
//! A `Session` is the single owner of the world state.  Every mutation is
//! funnelled through three entry points that the host calls from one
//! thread: `advance_timers` (spawn and clock ticks), `frame` (simulation
//! step) and the key handlers.  Each runs to completion before the next, so
//! no locking is involved.

use std::time::{Duration, Instant};

use log::info;
use rand::Rng;

use crate::compute::{clock_tick, fire, init_world, restart, spawn_hazards, step};
use crate::config::{ConfigError, Tuning};
use crate::entities::World;
use crate::input::{Binding, HoldPolicy, InputTracker, Key};

// ── Periodic sources ──────────────────────────────────────────────────────────

/// A fixed-cadence wall-clock source, polled by the host loop.
#[derive(Clone, Debug)]
pub struct Ticker {
    period: Duration,
    next_due: Instant,
    cancelled: bool,
}

impl Ticker {
    /// First tick is due one full period after `now`.
    pub fn start(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
            cancelled: false,
        }
    }

    /// Stop the ticker.  Cancelling twice is a no-op.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// When the next tick fires, or `None` once cancelled.
    pub fn next_due(&self) -> Option<Instant> {
        (!self.cancelled).then_some(self.next_due)
    }

    fn due_by(&self, now: Instant) -> Option<Instant> {
        self.next_due().filter(|due| *due <= now)
    }

    fn advance(&mut self) {
        self.next_due += self.period;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Source {
    Clock,
    Spawner,
}

// ── Session ───────────────────────────────────────────────────────────────────

pub struct Session<R: Rng> {
    tuning: Tuning,
    world: World,
    input: InputTracker,
    rng: R,
    spawner: Ticker,
    clock: Ticker,
}

impl<R: Rng> Session<R> {
    /// Validate the tuning and start a fresh Active session at `now`.
    pub fn start(
        tuning: Tuning,
        policy: HoldPolicy,
        rng: R,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        info!(
            "session started: viewport {}x{}, {}s on the clock",
            tuning.viewport_width, tuning.viewport_height, tuning.session_seconds
        );
        Ok(Self {
            world: init_world(&tuning),
            input: InputTracker::new(policy),
            rng,
            spawner: Ticker::start(tuning.spawn_period, now),
            clock: Ticker::start(tuning.clock_period, now),
            tuning,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    pub fn spawner(&self) -> &Ticker {
        &self.spawner
    }

    pub fn clock(&self) -> &Ticker {
        &self.clock
    }

    // ── Timers ────────────────────────────────────────────────────────────────

    /// Run every spawn/clock tick that has come due by `now`, oldest first.
    /// When both are due at the same instant the clock goes first, so a batch
    /// never lands in a world that has just ended.  Returns the ticks run.
    pub fn advance_timers(&mut self, now: Instant) -> u32 {
        let mut ran = 0;
        while let Some(source) = self.next_due_source(now) {
            match source {
                Source::Clock => self.clock_tick(),
                Source::Spawner => self.spawn_tick(),
            }
            ran += 1;
        }
        ran
    }

    fn next_due_source(&self, now: Instant) -> Option<Source> {
        match (self.clock.due_by(now), self.spawner.due_by(now)) {
            (Some(c), Some(s)) if s < c => Some(Source::Spawner),
            (Some(_), _) => Some(Source::Clock),
            (None, Some(_)) => Some(Source::Spawner),
            (None, None) => None,
        }
    }

    fn clock_tick(&mut self) {
        self.clock.advance();
        self.world = clock_tick(&self.world);
        if self.world.is_terminal() {
            self.clock.cancel();
            self.spawner.cancel();
        }
    }

    fn spawn_tick(&mut self) {
        self.spawner.advance();
        self.world = spawn_hazards(&self.world, &self.tuning, &mut self.rng);
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    /// One simulation step.  Steering is sampled once, before anything moves.
    pub fn frame(&mut self) {
        let steering = self.input.steering();
        self.world = step(&self.world, steering, &self.tuning);
        self.input.next_frame();
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Handle a key press.  Fire and restart act only on the press edge;
    /// restart is honoured only once the session has ended.
    pub fn key_down(&mut self, binding: impl Into<Binding>, now: Instant) {
        let binding = binding.into();
        if !self.input.key_down(binding) {
            return;
        }
        match binding.key {
            Key::Fire => self.world = fire(&self.world, &self.tuning),
            Key::Restart if self.world.is_terminal() => self.restart(now),
            _ => {}
        }
    }

    pub fn key_repeat(&mut self, binding: impl Into<Binding>) {
        self.input.key_repeat(binding);
    }

    pub fn key_up(&mut self, binding: impl Into<Binding>) {
        self.input.key_up(binding);
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Cancel every periodic source and drop held keys.  Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        self.spawner.cancel();
        self.clock.cancel();
        self.input.clear();
    }

    /// Tear the old session down, then start over with fresh sources.
    pub fn restart(&mut self, now: Instant) {
        self.shutdown();
        self.world = restart(&self.world, &self.tuning);
        self.input = InputTracker::new(self.input.policy());
        self.spawner = Ticker::start(self.tuning.spawn_period, now);
        self.clock = Ticker::start(self.tuning.clock_period, now);
    }
}
