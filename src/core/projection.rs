//! Throttled marker projection into CSS pixel space, and the snapshot that
//! hit-testing reads.

use super::camera::Camera;
use super::helix::SectionMarker;
use super::schedule::Throttle;
use super::section::SectionId;
use glam::{Mat4, Vec3};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Bounding rect of the render surface in CSS px.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CssRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MarkerScreenPosition {
    pub x: f64,
    pub y: f64,
    pub visible: bool,
}

/// Project `world` into CSS px for a surface of `width` x `height`.
/// Invisible when the GL-convention depth leaves -1..1 or the point is behind
/// the eye.
pub fn project_to_css(world: Vec3, view_proj_gl: &Mat4, width: f64, height: f64) -> MarkerScreenPosition {
    let clip = *view_proj_gl * world.extend(1.0);
    if clip.w.abs() <= f32::EPSILON {
        return MarkerScreenPosition::default();
    }
    let ndc = clip.truncate() / clip.w;
    let x = (ndc.x as f64 * 0.5 + 0.5) * width;
    let y = (-(ndc.y as f64) * 0.5 + 0.5) * height;
    let visible = clip.w > 0.0 && ndc.z.abs() < 1.0;
    MarkerScreenPosition { x, y, visible }
}

/// Complete set of marker screen positions from one projection pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScreenSnapshot {
    entries: Vec<(SectionId, MarkerScreenPosition)>,
}

impl ScreenSnapshot {
    pub fn new(entries: Vec<(SectionId, MarkerScreenPosition)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, section: SectionId) -> Option<MarkerScreenPosition> {
        self.entries
            .iter()
            .find(|(id, _)| *id == section)
            .map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionId, MarkerScreenPosition)> + '_ {
        self.entries.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_map(&self) -> BTreeMap<String, MarkerScreenPosition> {
        self.entries
            .iter()
            .map(|(id, p)| (id.as_str().to_string(), *p))
            .collect()
    }
}

/// Single-writer, many-reader handle. Readers always get a whole snapshot;
/// the writer swaps in a new one per projection tick.
#[derive(Clone, Debug, Default)]
pub struct SharedSnapshot(Rc<RefCell<Rc<ScreenSnapshot>>>);

impl SharedSnapshot {
    pub fn publish(&self, snapshot: ScreenSnapshot) {
        *self.0.borrow_mut() = Rc::new(snapshot);
    }

    pub fn current(&self) -> Rc<ScreenSnapshot> {
        self.0.borrow().clone()
    }
}

/// Decides when to re-project: ~10 Hz normally, once plus on every resize in
/// deterministic mode.
#[derive(Clone, Debug)]
pub struct MarkerProjector {
    throttle: Throttle,
    deterministic: bool,
    computed_once: bool,
    last_size: (f64, f64),
}

impl MarkerProjector {
    pub fn new(hz: f64, deterministic: bool) -> Self {
        Self {
            throttle: Throttle::from_hz(hz),
            deterministic,
            computed_once: false,
            last_size: (0.0, 0.0),
        }
    }

    /// Whether this frame is a projection tick.
    pub fn due(&mut self, now_sec: f64, width: f64, height: f64) -> bool {
        let size_changed = (width, height) != self.last_size;
        if size_changed {
            self.last_size = (width, height);
        }
        if self.deterministic {
            let due = !self.computed_once || size_changed;
            self.computed_once = true;
            return due;
        }
        self.throttle.ready(now_sec, size_changed)
    }

    pub fn project(
        &self,
        markers: &[SectionMarker],
        model: &Mat4,
        camera: &Camera,
        rect: &CssRect,
    ) -> ScreenSnapshot {
        let view_proj = camera.projection_matrix_gl() * camera.view_matrix();
        let entries = markers
            .iter()
            .map(|m| {
                let world = model.transform_point3(m.position);
                (m.section, project_to_css(world, &view_proj, rect.width, rect.height))
            })
            .collect();
        ScreenSnapshot::new(entries)
    }
}
