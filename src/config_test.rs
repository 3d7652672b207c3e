#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn defaults() {
    let config = GameConfig::default();
    assert_eq!(config.fps, 60.0);
    assert_eq!(config.width, 480.0);
    assert_eq!(config.height, 340.0);
    assert_eq!(config.zoom, 1.0);
    assert_eq!(config.scroll_x, AxisRange { min: Some(0.0), max: None });
    assert!(config.validate().is_ok());
}

#[test]
fn partial_json_keeps_defaults() {
    let config: GameConfig = serde_json::from_str(r#"{"fps": 30, "collision_root": ".level"}"#).expect("config");
    assert_eq!(config.fps, 30.0);
    assert_eq!(config.width, 480.0);
    assert!(config.collision_root().expect("root").is_some());
}

#[test]
fn zero_fps_is_rejected() {
    let config = GameConfig { fps: 0.0, ..GameConfig::default() };
    assert_eq!(config.validate(), Err(GameError::InvalidFrameRate(0.0)));
}

#[test]
fn negative_zoom_is_rejected() {
    let config = GameConfig { zoom: -1.0, ..GameConfig::default() };
    assert_eq!(config.validate(), Err(GameError::InvalidZoom(-1.0)));
}

#[test]
fn zero_zoom_is_allowed() {
    let config = GameConfig { zoom: 0.0, ..GameConfig::default() };
    assert!(config.validate().is_ok());
}

#[test]
fn non_positive_collision_interval_is_rejected() {
    let config = GameConfig { collision_interval_ms: Some(0.0), ..GameConfig::default() };
    assert_eq!(config.validate(), Err(GameError::InvalidInterval(0.0)));
}

#[test]
fn malformed_collision_root_is_rejected() {
    let config = GameConfig { collision_root: Some("wall >".into()), ..GameConfig::default() };
    assert!(matches!(config.validate(), Err(GameError::Selector(_))));
}

#[test]
fn frame_interval_at_60_fps() {
    let interval = GameConfig::default().frame_interval();
    assert_eq!(interval.as_micros(), 16_666);
}

#[test]
fn frame_interval_never_zero() {
    assert_eq!(frame_interval(1e12), Duration::from_nanos(1));
}

#[test]
fn env_parse_missing_returns_default() {
    let val: f64 = env_parse("__SPRITEKIT_TEST_NONEXISTENT__", 42.0);
    assert_eq!(val, 42.0);
}

#[test]
fn env_parse_present_valid() {
    unsafe { std::env::set_var("__SPRITEKIT_TEST_VALID__", " 99 ") };
    let val: f64 = env_parse("__SPRITEKIT_TEST_VALID__", 0.0);
    assert_eq!(val, 99.0);
    unsafe { std::env::remove_var("__SPRITEKIT_TEST_VALID__") };
}

#[test]
fn env_parse_present_invalid_returns_default() {
    unsafe { std::env::set_var("__SPRITEKIT_TEST_INVALID__", "fast") };
    let val: f64 = env_parse("__SPRITEKIT_TEST_INVALID__", 7.0);
    assert_eq!(val, 7.0);
    unsafe { std::env::remove_var("__SPRITEKIT_TEST_INVALID__") };
}
