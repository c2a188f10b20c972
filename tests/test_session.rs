use std::time::{Duration, Instant};

use meteor_shooter::config::Tuning;
use meteor_shooter::entities::{Hazard, SessionPhase};
use meteor_shooter::input::{HoldPolicy, Key, HOLD_WINDOW};
use meteor_shooter::session::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn start(t0: Instant) -> Session<StdRng> {
    start_with(HoldPolicy::ReleaseEvents, t0)
}

fn start_with(policy: HoldPolicy, t0: Instant) -> Session<StdRng> {
    Session::start(
        Tuning::for_viewport(800.0, 600.0),
        policy,
        StdRng::seed_from_u64(7),
        t0,
    )
    .expect("default tuning is valid")
}

// ── Ticker ────────────────────────────────────────────────────────────────────

#[test]
fn ticker_first_due_one_period_out() {
    let t0 = Instant::now();
    let t = Ticker::start(ms(600), t0);
    assert_eq!(t.next_due(), Some(t0 + ms(600)));
    assert_eq!(t.period(), ms(600));
}

#[test]
fn ticker_cancel_is_idempotent() {
    let mut t = Ticker::start(ms(600), Instant::now());
    t.cancel();
    t.cancel();
    assert!(t.is_cancelled());
    assert_eq!(t.next_due(), None);
}

// ── Start ─────────────────────────────────────────────────────────────────────

#[test]
fn start_rejects_invalid_tuning() {
    let result = Session::start(
        Tuning::for_viewport(50.0, 600.0),
        HoldPolicy::ReleaseEvents,
        StdRng::seed_from_u64(0),
        Instant::now(),
    );
    assert!(result.is_err());
}

#[test]
fn fresh_session_is_active_and_empty() {
    let s = start(Instant::now());
    assert_eq!(s.world().phase, SessionPhase::Active);
    assert_eq!(s.world().time_remaining, 60);
    assert!(s.world().hazards.is_empty());
    assert!(!s.clock().is_cancelled());
    assert!(!s.spawner().is_cancelled());
}

// ── Timers ────────────────────────────────────────────────────────────────────

#[test]
fn nothing_fires_before_first_period() {
    let t0 = Instant::now();
    let mut s = start(t0);
    assert_eq!(s.advance_timers(t0 + ms(599)), 0);
    assert!(s.world().hazards.is_empty());
    assert_eq!(s.world().time_remaining, 60);
}

#[test]
fn spawner_fires_every_600ms() {
    let t0 = Instant::now();
    let mut s = start(t0);
    assert_eq!(s.advance_timers(t0 + ms(600)), 1);
    let first = s.world().hazards.len();
    assert!((2..=4).contains(&first));
    assert_eq!(s.world().time_remaining, 60);

    // 1000 ms: clock; 1200 ms: second batch
    assert_eq!(s.advance_timers(t0 + ms(1200)), 2);
    assert!(s.world().hazards.len() >= first + 2);
    assert_eq!(s.world().time_remaining, 59);
}

#[test]
fn clock_fires_every_second() {
    let t0 = Instant::now();
    let mut s = start(t0);
    s.advance_timers(t0 + ms(5_500));
    assert_eq!(s.world().time_remaining, 55);
}

#[test]
fn late_poll_catches_up_in_order() {
    let t0 = Instant::now();
    let mut s = start(t0);
    // clock ×3 (1000, 2000, 3000) and spawner ×5 (600 … 3000)
    assert_eq!(s.advance_timers(t0 + ms(3_000)), 8);
    assert_eq!(s.world().time_remaining, 57);
}

#[test]
fn session_ends_after_sixty_seconds() {
    let t0 = Instant::now();
    let mut s = start(t0);
    // 60 clock ticks + 99 spawn ticks (the one due at 60 s is cancelled first)
    assert_eq!(s.advance_timers(t0 + ms(60_000)), 159);
    assert!(s.world().is_terminal());
    assert_eq!(s.world().time_remaining, 0);
    assert!(s.clock().is_cancelled());
    assert!(s.spawner().is_cancelled());
}

#[test]
fn no_ticks_after_terminal() {
    let t0 = Instant::now();
    let mut s = start(t0);
    s.advance_timers(t0 + ms(60_000));
    let hazards = s.world().hazards.len();

    assert_eq!(s.advance_timers(t0 + ms(600_000)), 0);
    assert_eq!(s.world().hazards.len(), hazards);
    assert_eq!(s.world().time_remaining, 0);
}

// ── Frames & input ────────────────────────────────────────────────────────────

#[test]
fn frame_reads_held_direction() {
    let t0 = Instant::now();
    let mut s = start(t0);
    let x0 = s.world().ship.x;
    s.key_down(Key::Left, t0);
    s.frame();
    s.frame();
    assert_eq!(s.world().ship.x, x0 - 10.0);
    s.key_up(Key::Left);
    s.frame();
    assert_eq!(s.world().ship.x, x0 - 10.0);
}

#[test]
fn fire_once_per_press() {
    let t0 = Instant::now();
    let mut s = start(t0);
    s.key_down(Key::Fire, t0);
    // key-repeat delivered as presses and repeats while held
    s.key_down(Key::Fire, t0);
    s.key_repeat(Key::Fire);
    s.key_down(Key::Fire, t0);
    assert_eq!(s.world().projectiles.len(), 1);

    s.key_up(Key::Fire);
    s.key_down(Key::Fire, t0);
    assert_eq!(s.world().projectiles.len(), 2);
}

// Plain terminals deliver presses only; nothing ever arrives on release.

#[test]
fn press_only_terminal_fires_on_every_separate_tap() {
    let t0 = Instant::now();
    let mut s = start_with(HoldPolicy::for_terminal(false), t0);
    s.key_down(Key::Fire, t0);
    for _ in 0..HOLD_WINDOW + 8 {
        s.frame();
    }
    s.key_down(Key::Fire, t0);
    assert_eq!(s.world().projectiles.len(), 2);
}

#[test]
fn press_only_terminal_stops_ship_after_a_tap() {
    let t0 = Instant::now();
    let mut s = start_with(HoldPolicy::for_terminal(false), t0);
    s.key_down(Key::Left, t0);
    for _ in 0..100 {
        s.frame();
    }
    // held for the press frame plus HOLD_WINDOW more, 5 units each
    let travelled = (HOLD_WINDOW + 1) as f32 * 5.0;
    assert_eq!(s.world().ship.x, 340.0 - travelled);
    assert!(!s.input().is_held(Key::Left));
}

#[test]
fn shot_flies_off_the_top() {
    let t0 = Instant::now();
    let mut s = start(t0);
    s.key_down(Key::Fire, t0);
    assert_eq!(s.world().projectiles[0].y, s.world().ship.y);

    // 490 + 20 units to clear at 7 per frame → gone on frame 73
    for _ in 0..72 {
        s.frame();
    }
    assert_eq!(s.world().projectiles.len(), 1);
    s.frame();
    assert!(s.world().projectiles.is_empty());
    assert_eq!(s.world().score, 0);
}

#[test]
fn restart_ignored_while_active() {
    let t0 = Instant::now();
    let mut s = start(t0);
    s.advance_timers(t0 + ms(2_000));
    s.key_down(Key::Restart, t0 + ms(2_000));
    assert_eq!(s.world().time_remaining, 58);
}

#[test]
fn restart_key_after_terminal_starts_over() {
    let t0 = Instant::now();
    let mut s = start(t0);
    s.advance_timers(t0 + ms(60_000));
    assert!(s.world().is_terminal());

    let t1 = t0 + ms(61_000);
    s.key_down(Key::Restart, t1);
    let w = s.world();
    assert_eq!(w.phase, SessionPhase::Active);
    assert_eq!(w.score, 0);
    assert_eq!(w.time_remaining, 60);
    assert!(w.hazards.is_empty());
    assert!(w.projectiles.is_empty());
    assert!(w.explosions.is_empty());

    // fresh sources, anchored at the restart instant
    assert_eq!(s.clock().next_due(), Some(t1 + ms(1_000)));
    assert_eq!(s.spawner().next_due(), Some(t1 + ms(600)));
    assert_eq!(s.advance_timers(t1 + ms(599)), 0);
}

#[test]
fn restart_replaces_sources_without_duplicates() {
    let t0 = Instant::now();
    let mut s = start(t0);
    s.restart(t0 + ms(100));
    s.restart(t0 + ms(200));
    // exactly one clock: one tick one second after the last restart
    s.advance_timers(t0 + ms(1_200));
    assert_eq!(s.world().time_remaining, 59);
}

#[test]
fn shutdown_stops_everything_and_is_idempotent() {
    let t0 = Instant::now();
    let mut s = start(t0);
    s.key_down(Key::Left, t0);
    s.shutdown();
    s.shutdown();
    assert!(s.clock().is_cancelled());
    assert!(s.spawner().is_cancelled());
    assert!(!s.input().is_held(Key::Left));
    assert_eq!(s.advance_timers(t0 + ms(10_000)), 0);
    assert_eq!(s.world().time_remaining, 60);
}

#[test]
fn frames_after_terminal_change_nothing() {
    let t0 = Instant::now();
    let mut s = start(t0);
    s.advance_timers(t0 + ms(60_000));
    let before: Vec<Hazard> = s.world().hazards.clone();
    let score = s.world().score;
    s.key_down(Key::Left, t0);
    s.key_down(Key::Fire, t0);
    for _ in 0..50 {
        s.frame();
    }
    assert_eq!(s.world().hazards, before);
    assert_eq!(s.world().score, score);
    assert!(s.world().projectiles.is_empty());
}
