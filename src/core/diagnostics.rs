//! Read-only telemetry. Components report through an injected
//! [`DiagnosticsSink`]; production builds get [`NoopSink`].

use super::animation::LumaCheck;
use super::framing::{FramingReport, SceneFit};
use super::hit::FallbackProbe;
use super::projection::{MarkerScreenPosition, ScreenSnapshot};
use super::scroll::ScrollMetrics;
use super::section::{hex_string, SectionId};
use crate::constants::DIAGNOSTICS_VERSION;
use serde::Serialize;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Clone, Debug)]
pub enum DiagEvent {
    Scroll(ScrollMetrics),
    ActiveSection(SectionId),
    Markers(Rc<ScreenSnapshot>),
    Framing(FramingReport),
    Fit { fit: SceneFit, group_scale: f64 },
    Luminance(LumaCheck),
    MarkerClick(SectionId),
    FallbackPointer(FallbackProbe),
    PointerMissed,
    MotionFrozen(bool),
}

pub trait DiagnosticsSink {
    /// Lets callers skip building expensive events.
    fn enabled(&self) -> bool {
        true
    }

    fn record(&mut self, event: DiagEvent);

    /// Publish accumulated state, if the sink has somewhere to put it.
    fn flush(&mut self) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl DiagnosticsSink for NoopSink {
    fn enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _event: DiagEvent) {}
}

/// Aggregate view of the latest telemetry, serialized for external readers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsState {
    pub version: u32,
    pub scroll_y: f64,
    pub scroll_range_px: f64,
    pub scroll_progress: f64,
    pub active_section: Option<SectionId>,
    pub markers: BTreeMap<String, MarkerScreenPosition>,
    pub marker_colors: BTreeMap<String, String>,
    pub marker_colors_ok: bool,
    pub last_marker_click: Option<SectionId>,
    pub pointer_missed_count: u32,
    pub fallback_last_pointer: Option<FallbackProbe>,
    pub min_base_luma: Option<f32>,
    pub min_current_luma: Option<f32>,
    pub min_luma_ok: Option<bool>,
    pub helix_world_height: Option<f64>,
    pub viewport_world_height: Option<f64>,
    pub fits_viewport: Option<bool>,
    pub group_scale: Option<f64>,
    pub motion_frozen: bool,
    pub camera_fov: Option<f64>,
    pub camera_z: Option<f64>,
    pub helix_scale: Option<f64>,
    pub canvas_px: Option<f64>,
    pub aspect: Option<f64>,
    pub is_narrow: Option<bool>,
}

const EXPECTED_COLORS: [(SectionId, &str); 4] = [
    (SectionId::Hero, "#4ea2ff"),
    (SectionId::Projects, "#ff9500"),
    (SectionId::Skills, "#00d9ff"),
    (SectionId::Contact, "#00ff88"),
];

impl Default for DiagnosticsState {
    fn default() -> Self {
        let marker_colors: BTreeMap<String, String> = SectionId::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), hex_string(s.color_hex())))
            .collect();
        let marker_colors_ok = EXPECTED_COLORS
            .iter()
            .all(|(s, hex)| marker_colors.get(s.as_str()).map(String::as_str) == Some(*hex));
        Self {
            version: DIAGNOSTICS_VERSION,
            scroll_y: 0.0,
            scroll_range_px: 1.0,
            scroll_progress: 0.0,
            active_section: None,
            markers: BTreeMap::new(),
            marker_colors,
            marker_colors_ok,
            last_marker_click: None,
            pointer_missed_count: 0,
            fallback_last_pointer: None,
            min_base_luma: None,
            min_current_luma: None,
            min_luma_ok: None,
            helix_world_height: None,
            viewport_world_height: None,
            fits_viewport: None,
            group_scale: None,
            motion_frozen: false,
            camera_fov: None,
            camera_z: None,
            helix_scale: None,
            canvas_px: None,
            aspect: None,
            is_narrow: None,
        }
    }
}

impl DiagnosticsState {
    pub fn apply(&mut self, event: DiagEvent) {
        match event {
            DiagEvent::Scroll(m) => {
                self.scroll_y = m.scroll_y;
                self.scroll_range_px = m.scroll_range;
                self.scroll_progress = m.raw;
            }
            DiagEvent::ActiveSection(id) => self.active_section = Some(id),
            DiagEvent::Markers(snapshot) => self.markers = snapshot.to_map(),
            DiagEvent::Framing(r) => {
                self.camera_fov = Some(r.camera.fov_deg);
                self.camera_z = Some(r.camera.distance_z);
                self.helix_scale = Some(r.camera.helix_scale);
                self.canvas_px = Some(r.canvas_px);
                self.aspect = Some(r.aspect);
                self.is_narrow = Some(r.is_narrow);
            }
            DiagEvent::Fit { fit, group_scale } => {
                self.helix_world_height = Some(fit.helix_world_height);
                self.viewport_world_height = Some(fit.viewport_world_height);
                self.fits_viewport = Some(fit.fits_viewport);
                self.group_scale = Some(group_scale);
            }
            DiagEvent::Luminance(l) => {
                self.min_base_luma = Some(l.min_base_luma);
                self.min_current_luma = Some(l.min_current_luma);
                self.min_luma_ok = Some(l.min_luma_ok);
            }
            DiagEvent::MarkerClick(id) => self.last_marker_click = Some(id),
            DiagEvent::FallbackPointer(p) => self.fallback_last_pointer = Some(p),
            DiagEvent::PointerMissed => self.pointer_missed_count += 1,
            DiagEvent::MotionFrozen(f) => self.motion_frozen = f,
        }
    }
}

/// Folds every event into a [`DiagnosticsState`] and keeps the raw log.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub state: DiagnosticsState,
    pub events: Vec<DiagEvent>,
    pub flushes: u32,
}

impl DiagnosticsSink for RecordingSink {
    fn record(&mut self, event: DiagEvent) {
        self.state.apply(event.clone());
        self.events.push(event);
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

/// Shared sinks let the owner read recorded state while the scene writes.
impl<T: DiagnosticsSink> DiagnosticsSink for Rc<std::cell::RefCell<T>> {
    fn enabled(&self) -> bool {
        self.borrow().enabled()
    }

    fn record(&mut self, event: DiagEvent) {
        self.borrow_mut().record(event);
    }

    fn flush(&mut self) {
        self.borrow_mut().flush();
    }
}
