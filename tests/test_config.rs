use std::time::Duration;

use meteor_shooter::config::*;

#[test]
fn defaults_match_balancing_constants() {
    let t = Tuning::default();
    assert_eq!(t.ship_size, (120.0, 120.0));
    assert_eq!(t.ship_step, 5.0);
    assert_eq!(t.projectile_size, (10.0, 20.0));
    assert_eq!(t.projectile_speed, 7.0);
    assert_eq!(t.hazard_size, (30.0, 30.0));
    assert_eq!(t.spawn_batch, (2, 4));
    assert_eq!(t.spawn_period, Duration::from_millis(600));
    assert_eq!(t.clock_period, Duration::from_millis(1000));
    assert_eq!(t.session_seconds, 60);
    assert!(t.validate().is_ok());
}

#[test]
fn for_viewport_only_changes_size() {
    let t = Tuning::for_viewport(640.0, 384.0);
    assert_eq!((t.viewport_width, t.viewport_height), (640.0, 384.0));
    assert_eq!(t.ship_size, Tuning::default().ship_size);
}

#[test]
fn viewport_narrower_than_ship_rejected() {
    let t = Tuning::for_viewport(120.0, 600.0);
    assert_eq!(
        t.validate(),
        Err(ConfigError::ViewportTooNarrow { width: 120.0, needed: 120.0 })
    );
}

#[test]
fn viewport_too_short_rejected() {
    let t = Tuning::for_viewport(800.0, 100.0);
    assert!(matches!(t.validate(), Err(ConfigError::ViewportTooShort { .. })));
}

#[test]
fn zero_periods_rejected() {
    let t = Tuning { spawn_period: Duration::ZERO, ..Tuning::default() };
    assert_eq!(t.validate(), Err(ConfigError::ZeroPeriod { which: "spawn" }));
    let t = Tuning { clock_period: Duration::ZERO, ..Tuning::default() };
    assert_eq!(t.validate(), Err(ConfigError::ZeroPeriod { which: "clock" }));
}

#[test]
fn inverted_batch_and_zero_duration_rejected() {
    let t = Tuning { spawn_batch: (5, 2), ..Tuning::default() };
    assert_eq!(t.validate(), Err(ConfigError::EmptySpawnBatch { min: 5, max: 2 }));
    let t = Tuning { session_seconds: 0, ..Tuning::default() };
    assert_eq!(t.validate(), Err(ConfigError::ZeroDuration));
}

#[test]
fn errors_render_readably() {
    let msg = ConfigError::ZeroPeriod { which: "clock" }.to_string();
    assert_eq!(msg, "clock period must be non-zero");
}
