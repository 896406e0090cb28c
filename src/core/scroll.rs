//! Document scroll offset to normalized, spring-smoothed progress.

use super::schedule::FrameGate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub scroll_range: f64,
    pub raw: f64,
}

/// Scrollable range in px, never below 1.
#[inline]
pub fn scroll_range(document_height: f64, viewport_height: f64) -> f64 {
    let range = document_height - viewport_height;
    if range.is_finite() {
        range.max(1.0)
    } else {
        1.0
    }
}

/// `scroll_y / range` clamped to 0..1; saturates instead of producing NaN.
#[inline]
pub fn raw_progress(scroll_y: f64, range: f64) -> f64 {
    let range = if range.is_finite() { range.max(1.0) } else { 1.0 };
    let p = scroll_y / range;
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    pub rest_delta: f64,
    pub rest_speed: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 30.0,
            mass: 1.0,
            rest_delta: 0.001,
            rest_speed: 0.01,
        }
    }
}

// Keeps the explicit integration stable for stiff settings and long frames.
const SPRING_MAX_SUBSTEP_SEC: f64 = 1.0 / 240.0;
const SPRING_MAX_DT_SEC: f64 = 0.25;

/// Damped spring `a = (-k (x - target) - c v) / m`, integrated with
/// semi-implicit Euler in bounded substeps. Snaps to the target once both the
/// offset and the speed are under their rest thresholds.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    params: SpringParams,
    value: f64,
    velocity: f64,
    target: f64,
}

impl Spring {
    pub fn new(params: SpringParams, initial: f64) -> Self {
        Self {
            params,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn at_rest(&self) -> bool {
        self.value == self.target && self.velocity == 0.0
    }

    pub fn step(&mut self, dt_sec: f64) -> f64 {
        if self.at_rest() || !(dt_sec > 0.0) {
            return self.value;
        }
        let mass = self.params.mass.max(1e-6);
        let mut remaining = dt_sec.min(SPRING_MAX_DT_SEC);
        while remaining > 0.0 {
            let h = remaining.min(SPRING_MAX_SUBSTEP_SEC);
            let accel = (-self.params.stiffness * (self.value - self.target)
                - self.params.damping * self.velocity)
                / mass;
            self.velocity += accel * h;
            self.value += self.velocity * h;
            remaining -= h;
        }
        if (self.value - self.target).abs() < self.params.rest_delta
            && self.velocity.abs() < self.params.rest_speed
        {
            self.value = self.target;
            self.velocity = 0.0;
        }
        self.value
    }
}

/// Tracks raw and smoothed scroll progress.
///
/// Scroll/resize events call [`ScrollProgressTracker::request`]; only the first
/// request per frame asks the caller to schedule a recompute.
#[derive(Clone, Debug)]
pub struct ScrollProgressTracker {
    metrics: ScrollMetrics,
    spring: Spring,
    gate: FrameGate,
}

impl ScrollProgressTracker {
    pub fn new(params: SpringParams) -> Self {
        Self {
            metrics: ScrollMetrics {
                scroll_y: 0.0,
                scroll_range: 1.0,
                raw: 0.0,
            },
            spring: Spring::new(params, 0.0),
            gate: FrameGate::default(),
        }
    }

    pub fn request(&mut self) -> bool {
        self.gate.request()
    }

    pub fn is_pending(&self) -> bool {
        self.gate.is_pending()
    }

    pub fn cancel(&mut self) {
        self.gate.cancel();
    }

    /// Recompute from the current layout. Clears the pending flag.
    pub fn recompute(
        &mut self,
        scroll_y: f64,
        document_height: f64,
        viewport_height: f64,
    ) -> ScrollMetrics {
        self.gate.take();
        let scroll_y = if scroll_y.is_finite() { scroll_y } else { 0.0 };
        let range = scroll_range(document_height, viewport_height);
        self.metrics = ScrollMetrics {
            scroll_y,
            scroll_range: range,
            raw: raw_progress(scroll_y, range),
        };
        self.spring.set_target(self.metrics.raw);
        self.metrics
    }

    /// Advance the smoothed value by one frame.
    pub fn advance(&mut self, dt_sec: f64) -> f64 {
        self.spring.step(dt_sec)
    }

    /// Jump the smoothed value to the raw one (reduced motion, first paint).
    pub fn settle(&mut self) {
        self.spring = Spring::new(self.spring.params, self.metrics.raw);
    }

    pub fn raw(&self) -> f64 {
        self.metrics.raw
    }

    pub fn smoothed(&self) -> f64 {
        self.spring.value()
    }

    pub fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }
}
