// Host-side tests for scroll progress, spring smoothing and frame coalescing.

use helix_nav::core::schedule::{FrameGate, Throttle};
use helix_nav::core::scroll::*;

#[test]
fn halfway_down_a_page_is_half_progress() {
    let mut tracker = ScrollProgressTracker::new(SpringParams::default());
    let m = tracker.recompute(1000.0, 3000.0, 1000.0);
    assert_eq!(m.scroll_range, 2000.0);
    assert_eq!(m.raw, 0.5);
    assert_eq!(tracker.raw(), 0.5);
}

#[test]
fn progress_is_clamped_and_never_nan() {
    assert_eq!(raw_progress(-50.0, 2000.0), 0.0);
    assert_eq!(raw_progress(5000.0, 2000.0), 1.0);
    assert_eq!(raw_progress(f64::NAN, 2000.0), 0.0);
    // Page shorter than the viewport: range floors at 1.
    assert_eq!(scroll_range(500.0, 1000.0), 1.0);
    assert_eq!(raw_progress(0.0, scroll_range(500.0, 1000.0)), 0.0);
    assert_eq!(raw_progress(3.0, scroll_range(500.0, 1000.0)), 1.0);
    assert_eq!(scroll_range(f64::INFINITY, 1000.0), 1.0);
}

#[test]
fn spring_converges_without_overshoot() {
    let mut spring = Spring::new(SpringParams::default(), 0.0);
    spring.set_target(1.0);
    let mut prev = 0.0;
    for _ in 0..180 {
        let v = spring.step(1.0 / 60.0);
        assert!(v <= 1.0, "overshoot: {v}");
        assert!(v >= prev, "not monotonic: {prev} -> {v}");
        prev = v;
    }
    assert_eq!(spring.value(), 1.0);
    assert!(spring.at_rest());
}

#[test]
fn spring_survives_long_frames() {
    let mut spring = Spring::new(SpringParams::default(), 0.0);
    spring.set_target(1.0);
    let v = spring.step(5.0);
    assert!(v.is_finite());
    assert!(v > 0.0 && v <= 1.0);
    assert_eq!(spring.step(0.0), v);
    assert_eq!(spring.step(-1.0), v);
}

#[test]
fn smoothed_progress_lags_then_catches_up() {
    let mut tracker = ScrollProgressTracker::new(SpringParams::default());
    tracker.recompute(2000.0, 3000.0, 1000.0);
    let first = tracker.advance(1.0 / 60.0);
    assert!(first > 0.0 && first < 1.0);
    for _ in 0..300 {
        tracker.advance(1.0 / 60.0);
    }
    assert_eq!(tracker.smoothed(), 1.0);

    tracker.recompute(0.0, 3000.0, 1000.0);
    tracker.settle();
    assert_eq!(tracker.smoothed(), 0.0);
}

#[test]
fn scroll_requests_coalesce_per_frame() {
    let mut tracker = ScrollProgressTracker::new(SpringParams::default());
    assert!(tracker.request());
    assert!(!tracker.request());
    assert!(!tracker.request());
    assert!(tracker.is_pending());
    tracker.recompute(0.0, 3000.0, 1000.0);
    assert!(!tracker.is_pending());
    assert!(tracker.request());
    tracker.cancel();
    assert!(!tracker.is_pending());
}

#[test]
fn frame_gate_take_consumes_once() {
    let mut gate = FrameGate::default();
    assert!(!gate.take());
    assert!(gate.request());
    assert!(gate.take());
    assert!(!gate.take());
}

#[test]
fn throttle_runs_about_ten_times_a_second() {
    let mut t = Throttle::from_hz(10.0);
    assert!(t.ready(0.0, false));
    assert!(!t.ready(0.05, false));
    assert!(!t.ready(0.1, false));
    assert!(t.ready(0.11, false));
    assert!(t.ready(0.12, true));

    let mut runs = 0;
    for i in 0..=60 {
        if t.ready(1.0 + i as f64 / 60.0, false) {
            runs += 1;
        }
    }
    assert!((8..=11).contains(&runs), "runs = {runs}");
}
