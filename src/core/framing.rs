//! Camera framing for the side rail: keep the helix inside the frustum as the
//! rail narrows, and keep its height inside the viewport.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FramingConfig {
    /// Rail width (CSS px) at and above which the desktop baseline is used.
    pub narrow_threshold_px: f64,
    /// Width at which narrowing is complete.
    pub narrow_floor_px: f64,
    pub min_helix_scale: f64,
    pub base_fov_deg: f64,
    pub base_z: f64,
    /// Vertical fov approached as the rail reaches the floor width.
    pub narrow_fov_deg: f64,
    pub min_fov_deg: f64,
    pub max_fov_deg: f64,
    pub min_z: f64,
    pub max_z: f64,
    /// Helix half-width in group-local units (the strand radius).
    pub half_width: f64,
    pub margin: f64,
    /// Changes smaller than this (fov degrees, z units) are not applied.
    pub tolerance: f64,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            narrow_threshold_px: 120.0,
            narrow_floor_px: 40.0,
            min_helix_scale: 0.5,
            base_fov_deg: 50.0,
            base_z: 28.0,
            narrow_fov_deg: 62.0,
            min_fov_deg: 30.0,
            max_fov_deg: 75.0,
            min_z: 20.0,
            max_z: 120.0,
            half_width: 3.0,
            margin: 1.0,
            tolerance: 0.1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    pub fov_deg: f64,
    pub distance_z: f64,
    pub helix_scale: f64,
}

impl CameraState {
    pub fn baseline(config: &FramingConfig) -> Self {
        Self {
            fov_deg: config.base_fov_deg,
            distance_z: config.base_z,
            helix_scale: 1.0,
        }
    }
}

#[inline]
pub fn aspect_ratio(width: f64, height: f64) -> f64 {
    let aspect = width.max(1.0) / height.max(1.0);
    if aspect.is_finite() {
        aspect
    } else {
        1.0
    }
}

/// 0 at/above the threshold width, 1 at/below the floor width.
pub fn narrowness(config: &FramingConfig, width: f64) -> f64 {
    if width >= config.narrow_threshold_px {
        return 0.0;
    }
    let span = (config.narrow_threshold_px - config.narrow_floor_px).max(1e-6);
    ((config.narrow_threshold_px - width) / span).clamp(0.0, 1.0)
}

/// Vertical fov (degrees) needed to show `half_width` at `distance` for a
/// viewport with the given aspect.
pub fn required_fov_deg(half_width: f64, distance: f64, aspect: f64) -> f64 {
    let d = distance.max(1e-6);
    let a = aspect.max(1e-6);
    2.0 * (half_width / (d * a)).atan().to_degrees()
}

/// Horizontal half-extent of the frustum at `distance`.
pub fn visible_half_width(fov_deg: f64, distance: f64, aspect: f64) -> f64 {
    distance * (fov_deg.to_radians() / 2.0).tan() * aspect
}

/// Vertical extent of the frustum at `distance`.
pub fn visible_height(fov_deg: f64, distance: f64) -> f64 {
    2.0 * distance * (fov_deg.to_radians() / 2.0).tan()
}

/// Solve fov, distance and helix scale for a canvas of `width` x `height` CSS px.
pub fn solve_framing(config: &FramingConfig, width: f64, height: f64) -> CameraState {
    if width >= config.narrow_threshold_px {
        return CameraState::baseline(config);
    }
    let aspect = aspect_ratio(width, height);
    let n = narrowness(config, width);
    let helix_scale = 1.0 - n * (1.0 - config.min_helix_scale);
    let mut fov = config.base_fov_deg + (config.narrow_fov_deg - config.base_fov_deg) * n;
    let mut z = config.base_z;

    let fit_half = (config.half_width + config.margin) * helix_scale;
    let required = required_fov_deg(fit_half, z, aspect);
    if required > fov {
        if required <= config.max_fov_deg {
            fov = required;
        } else {
            fov = config.max_fov_deg;
            z = fit_half / (aspect * (config.max_fov_deg.to_radians() / 2.0).tan());
        }
    }
    CameraState {
        fov_deg: fov.clamp(config.min_fov_deg, config.max_fov_deg),
        distance_z: z.clamp(config.min_z, config.max_z),
        helix_scale,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FramingReport {
    pub camera: CameraState,
    pub canvas_px: f64,
    pub aspect: f64,
    pub is_narrow: bool,
}

/// Re-solves framing only when the canvas size changes and applies the result
/// only when it moves by more than the tolerance.
#[derive(Clone, Debug)]
pub struct CameraFramingController {
    config: FramingConfig,
    state: CameraState,
    last_size: Option<(f64, f64)>,
}

impl CameraFramingController {
    pub fn new(config: FramingConfig) -> Self {
        Self {
            state: CameraState::baseline(&config),
            config,
            last_size: None,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn config(&self) -> &FramingConfig {
        &self.config
    }

    pub fn report(&self) -> FramingReport {
        let (w, h) = self.last_size.unwrap_or((0.0, 0.0));
        FramingReport {
            camera: self.state,
            canvas_px: w,
            aspect: aspect_ratio(w, h),
            is_narrow: w < self.config.narrow_threshold_px,
        }
    }

    /// Returns the new state when it was applied.
    pub fn resize(&mut self, width: f64, height: f64) -> Option<CameraState> {
        if !(width > 0.0) || !(height > 0.0) {
            return None;
        }
        if self.last_size == Some((width, height)) {
            return None;
        }
        self.last_size = Some((width, height));
        let next = solve_framing(&self.config, width, height);
        let tol = self.config.tolerance;
        let moved = (next.fov_deg - self.state.fov_deg).abs() > tol
            || (next.distance_z - self.state.distance_z).abs() > tol
            || (next.helix_scale - self.state.helix_scale).abs() > tol * 0.1;
        if !moved {
            return None;
        }
        log::debug!(
            "[framing] {:.0}x{:.0} fov={:.2} z={:.2} scale={:.3}",
            width,
            height,
            next.fov_deg,
            next.distance_z,
            next.helix_scale
        );
        self.state = next;
        Some(next)
    }
}

pub const FIT_HEIGHT_RATIO: f64 = 0.95;
const FIT_TOLERANCE: f64 = 0.1;
const FIT_EPSILON: f64 = 0.01;
const FIT_MIN_HEIGHT: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFit {
    pub helix_world_height: f64,
    pub viewport_world_height: f64,
    pub fits_viewport: bool,
    /// Scale to apply, when the current one is off target.
    #[serde(skip)]
    pub target_scale: Option<f64>,
}

/// Fit the scaled helix height to [`FIT_HEIGHT_RATIO`] of the viewport's world
/// height at the camera distance.
pub fn fit_scene(
    local_height: f64,
    current_scale: f64,
    viewport_world_height: f64,
) -> SceneFit {
    let helix_world_height = local_height * current_scale;
    let max_allowed = viewport_world_height * FIT_HEIGHT_RATIO;
    let fits_viewport = helix_world_height <= max_allowed + FIT_EPSILON;
    let mut target_scale = None;
    if helix_world_height > FIT_MIN_HEIGHT
        && (!fits_viewport || (helix_world_height - max_allowed).abs() > FIT_TOLERANCE)
    {
        let unscaled = helix_world_height / current_scale;
        target_scale = Some(max_allowed / unscaled);
    }
    SceneFit {
        helix_world_height,
        viewport_world_height,
        fits_viewport,
        target_scale,
    }
}
