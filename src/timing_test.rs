#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-4;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// =============================================================
// TransitionDuration
// =============================================================

#[test]
fn duration_parses_seconds_suffix() {
    let d: TransitionDuration = "2s".parse().expect("duration");
    assert_eq!(d.as_duration(), Duration::from_secs(2));
}

#[test]
fn duration_parses_milliseconds_suffix() {
    let d: TransitionDuration = "250ms".parse().expect("duration");
    assert_eq!(d.as_duration(), Duration::from_millis(250));
}

#[test]
fn duration_bare_number_is_seconds() {
    let d: TransitionDuration = " 1.5 ".parse().expect("duration");
    assert_eq!(d.as_duration(), Duration::from_millis(1500));
}

#[test]
fn duration_rejects_negative() {
    let err = "-1s".parse::<TransitionDuration>().expect_err("negative");
    assert!(matches!(err, TimingError::InvalidDuration(_)));
    assert!(TransitionDuration::from_secs_f64(-0.5).is_err());
}

#[test]
fn duration_rejects_garbage() {
    assert!("fast".parse::<TransitionDuration>().is_err());
    assert!("".parse::<TransitionDuration>().is_err());
    assert!(TransitionDuration::from_secs_f64(f64::NAN).is_err());
    assert!(TransitionDuration::from_secs_f64(f64::INFINITY).is_err());
}

#[test]
fn duration_displays_in_seconds() {
    let d = TransitionDuration::from_secs_f64(1.5).expect("duration");
    assert_eq!(d.to_string(), "1.5s");
    assert_eq!(TransitionDuration::ZERO.to_string(), "0s");
}

#[test]
fn duration_serde_uses_css_strings() {
    let d: TransitionDuration = serde_json::from_str("\"500ms\"").expect("deserialize");
    assert_eq!(d.as_duration(), Duration::from_millis(500));
    assert_eq!(serde_json::to_string(&d).expect("serialize"), "\"0.5s\"");
}

#[test]
fn duration_deserializes_bare_numbers_as_seconds() {
    let whole: TransitionDuration = serde_json::from_str("2").expect("integer");
    assert_eq!(whole.as_duration(), Duration::from_secs(2));
    let fraction: TransitionDuration = serde_json::from_str("0.25").expect("float");
    assert_eq!(fraction.as_duration(), Duration::from_millis(250));
    assert!(serde_json::from_str::<TransitionDuration>("-1").is_err());
    assert!(serde_json::from_str::<TransitionDuration>("true").is_err());
}

// =============================================================
// TimingFunction parsing
// =============================================================

#[test]
fn timing_function_parses_keywords() {
    let cases = [
        ("linear", TimingFunction::Linear),
        ("ease", TimingFunction::Ease),
        ("ease-in", TimingFunction::EaseIn),
        ("ease-out", TimingFunction::EaseOut),
        ("ease-in-out", TimingFunction::EaseInOut),
        ("step-start", TimingFunction::StepStart),
        ("step-end", TimingFunction::StepEnd),
    ];
    for (raw, expected) in cases {
        assert_eq!(raw.parse::<TimingFunction>().expect("keyword"), expected);
        assert_eq!(expected.to_string(), raw);
    }
}

#[test]
fn timing_function_parses_cubic_bezier() {
    let tf: TimingFunction = "cubic-bezier(0.1, 0.7, 1.0, 0.1)".parse().expect("bezier");
    assert_eq!(tf, TimingFunction::CubicBezier { x1: 0.1, y1: 0.7, x2: 1.0, y2: 0.1 });
}

#[test]
fn timing_function_rejects_out_of_range_bezier() {
    let err = "cubic-bezier(1.5, 0, 0.5, 1)".parse::<TimingFunction>().expect_err("range");
    assert!(matches!(err, TimingError::BezierOutOfRange(..)));
}

#[test]
fn timing_function_rejects_unknown_names() {
    assert!(matches!(
        "bouncy".parse::<TimingFunction>(),
        Err(TimingError::UnknownTimingFunction(_))
    ));
    assert!("cubic-bezier(0, 0, 1)".parse::<TimingFunction>().is_err());
}

#[test]
fn timing_function_default_is_linear() {
    assert_eq!(TimingFunction::default(), TimingFunction::Linear);
}

// =============================================================
// TimingFunction progress
// =============================================================

#[test]
fn every_curve_starts_at_zero_and_ends_at_one() {
    let curves = [
        TimingFunction::Linear,
        TimingFunction::Ease,
        TimingFunction::EaseIn,
        TimingFunction::EaseOut,
        TimingFunction::EaseInOut,
        TimingFunction::StepEnd,
    ];
    for curve in curves {
        assert!(approx_eq(curve.progress(0.0), 0.0), "{curve} at 0");
        assert!(approx_eq(curve.progress(1.0), 1.0), "{curve} at 1");
    }
}

#[test]
fn linear_progress_is_identity() {
    assert_eq!(TimingFunction::Linear.progress(0.25), 0.25);
}

#[test]
fn progress_clamps_input() {
    assert_eq!(TimingFunction::Linear.progress(-1.0), 0.0);
    assert_eq!(TimingFunction::Linear.progress(3.0), 1.0);
}

#[test]
fn ease_in_lags_and_ease_out_leads() {
    assert!(TimingFunction::EaseIn.progress(0.5) < 0.5);
    assert!(TimingFunction::EaseOut.progress(0.5) > 0.5);
}

#[test]
fn ease_in_out_is_symmetric_at_midpoint() {
    assert!(approx_eq(TimingFunction::EaseInOut.progress(0.5), 0.5));
}

#[test]
fn linear_bezier_matches_linear() {
    let tf = TimingFunction::cubic_bezier(0.0, 0.0, 1.0, 1.0).expect("bezier");
    for t in [0.1, 0.3, 0.5, 0.9] {
        assert!(approx_eq(tf.progress(t), t));
    }
}

#[test]
fn steps_jump_at_the_expected_end() {
    assert_eq!(TimingFunction::StepStart.progress(0.0), 0.0);
    assert_eq!(TimingFunction::StepStart.progress(0.01), 1.0);
    assert_eq!(TimingFunction::StepEnd.progress(0.99), 0.0);
    assert_eq!(TimingFunction::StepEnd.progress(1.0), 1.0);
}
