//! Pointer to navigation target: a precise ray/hit-volume path plus a
//! screen-distance fallback that stays quiet right after a precise hit.

use super::camera::{ray_sphere, Camera};
use super::helix::SectionMarker;
use super::projection::{CssRect, ScreenSnapshot};
use super::section::SectionId;
use glam::Mat4;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HitConfig {
    /// Fallback stays silent this long after a precise hit.
    pub suppress_window_ms: f64,
    pub fallback_radius_px: f64,
    pub deterministic_fallback_radius_px: f64,
    /// Invisible hit-volume radius around each marker, group-local units.
    pub hit_volume_radius: f32,
}

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            suppress_window_ms: 150.0,
            fallback_radius_px: 80.0,
            deterministic_fallback_radius_px: 200.0,
            hit_volume_radius: 5.0,
        }
    }
}

/// What the fallback path saw for one pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackProbe {
    pub x: f64,
    pub y: f64,
    pub closest_section: Option<SectionId>,
    pub closest_distance: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FallbackOutcome {
    /// A precise hit fired within the suppression window.
    Suppressed,
    Probed {
        probe: FallbackProbe,
        navigate: Option<SectionId>,
    },
}

/// Closest visible marker to `(x, y)` and its distance.
pub fn closest_visible(snapshot: &ScreenSnapshot, x: f64, y: f64) -> Option<(SectionId, f64)> {
    let mut best: Option<(SectionId, f64)> = None;
    for (id, pos) in snapshot.iter() {
        if !pos.visible {
            continue;
        }
        let d = (pos.x - x).hypot(pos.y - y);
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((id, d)),
        }
    }
    best
}

/// Nearest marker whose hit volume the ray enters.
pub fn pick_marker(
    camera: &Camera,
    model: &Mat4,
    markers: &[SectionMarker],
    hit_radius_local: f32,
    x_css: f64,
    y_css: f64,
    rect: &CssRect,
) -> Option<SectionId> {
    let (ro, rd) = camera.ray_through(x_css as f32, y_css as f32, rect.width as f32, rect.height as f32);
    if rd == glam::Vec3::ZERO {
        return None;
    }
    let world_radius = hit_radius_local * model.x_axis.truncate().length();
    let mut best = None::<(SectionId, f32)>;
    for m in markers {
        let center = model.transform_point3(m.position);
        if let Some(t) = ray_sphere(ro, rd, center, world_radius) {
            match best {
                Some((_, bt)) if t >= bt => {}
                _ => best = Some((m.section, t)),
            }
        }
    }
    best.map(|(id, _)| id)
}

#[derive(Clone, Debug)]
pub struct HitTester {
    config: HitConfig,
    fallback_radius_px: f64,
    last_precise_ms: Option<f64>,
}

impl HitTester {
    pub fn new(config: HitConfig, deterministic: bool) -> Self {
        let fallback_radius_px = if deterministic {
            config.deterministic_fallback_radius_px
        } else {
            config.fallback_radius_px
        };
        Self {
            config,
            fallback_radius_px,
            last_precise_ms: None,
        }
    }

    pub fn fallback_radius_px(&self) -> f64 {
        self.fallback_radius_px
    }

    pub fn hit_volume_radius(&self) -> f32 {
        self.config.hit_volume_radius
    }

    /// Record that the precise path fired at `now_ms`.
    pub fn stamp_precise(&mut self, now_ms: f64) {
        self.last_precise_ms = Some(now_ms);
    }

    pub fn suppressed(&self, now_ms: f64) -> bool {
        match self.last_precise_ms {
            Some(t) => now_ms - t < self.config.suppress_window_ms,
            None => false,
        }
    }

    pub fn fallback(&self, snapshot: &ScreenSnapshot, x: f64, y: f64, now_ms: f64) -> FallbackOutcome {
        if self.suppressed(now_ms) {
            return FallbackOutcome::Suppressed;
        }
        let closest = closest_visible(snapshot, x, y);
        let navigate = closest
            .filter(|(_, d)| *d <= self.fallback_radius_px)
            .map(|(id, _)| id);
        FallbackOutcome::Probed {
            probe: FallbackProbe {
                x,
                y,
                closest_section: closest.map(|(id, _)| id),
                closest_distance: closest.map(|(_, d)| d),
            },
            navigate,
        }
    }
}
