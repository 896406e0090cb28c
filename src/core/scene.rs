//! The navigation scene state machine. Browser glue feeds it events and
//! frames; it never touches the DOM itself.

use super::active::ActiveSectionDetector;
use super::anchors::{AnchorLayout, SectionAnchorCalibrator};
use super::animation::{marker_pulse, rotation_y, FrameClock, HaloStyle, InstanceTable};
use super::camera::Camera;
use super::diagnostics::{DiagEvent, DiagnosticsSink};
use super::framing::{
    aspect_ratio, fit_scene, visible_height, CameraFramingController, CameraState,
};
use super::helix::{indicator_on_helix, to_world_y, HelixGeometry};
use super::hit::{pick_marker, FallbackOutcome, HitTester};
use super::options::SceneOptions;
use super::projection::{CssRect, MarkerProjector, ScreenSnapshot, SharedSnapshot};
use super::scroll::{ScrollMetrics, ScrollProgressTracker};
use super::section::SectionId;
use crate::constants::{CLUSTER_SCALE, INDICATOR_SCALE};
use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;
use std::rc::Rc;

#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub dt_sec: f64,
    pub now_sec: f64,
    /// Render surface bounding rect in CSS px.
    pub rect: CssRect,
}

#[derive(Clone, Copy, Debug)]
pub struct HaloFrame {
    pub section: SectionId,
    pub position: Vec3,
    pub color: [f32; 3],
    pub style: HaloStyle,
}

#[derive(Clone, Debug)]
pub struct FrameOutput {
    pub time_sec: f64,
    pub rotation_y: f64,
    pub group_scale: f64,
    pub model: Mat4,
    pub camera: Camera,
    pub halos: SmallVec<[HaloFrame; 4]>,
    /// Group-local position of the progress indicator.
    pub indicator: Vec3,
    pub indicator_scale: f32,
    /// True when this frame ran the throttled projection branch.
    pub projected: bool,
}

pub struct NavScene {
    options: SceneOptions,
    geometry: HelixGeometry,
    instances: InstanceTable,
    tracker: ScrollProgressTracker,
    anchors: SectionAnchorCalibrator,
    active: ActiveSectionDetector,
    framing: CameraFramingController,
    projector: MarkerProjector,
    hit: HitTester,
    clock: FrameClock,
    scene_scale: f64,
    snapshot: SharedSnapshot,
    model: Mat4,
    camera: Camera,
    sink: Box<dyn DiagnosticsSink>,
}

impl NavScene {
    pub fn new(options: SceneOptions, mut sink: Box<dyn DiagnosticsSink>) -> Self {
        let geometry = HelixGeometry::new(options.helix);
        let instances = InstanceTable::new(&geometry);
        let framing = CameraFramingController::new(options.framing);
        let camera = Camera::from_state(&framing.state(), 1.0);
        let deterministic = options.deterministic;
        if sink.enabled() {
            sink.record(DiagEvent::MotionFrozen(deterministic));
            sink.record(DiagEvent::ActiveSection(SectionId::Hero));
        }
        Self {
            tracker: ScrollProgressTracker::new(options.spring),
            anchors: SectionAnchorCalibrator::new(),
            active: ActiveSectionDetector::new(&[
                SectionId::Hero,
                SectionId::Projects,
                SectionId::Skills,
            ]),
            projector: MarkerProjector::new(options.projection_hz, deterministic),
            hit: HitTester::new(options.hit, deterministic),
            clock: FrameClock::new(deterministic),
            scene_scale: 1.0,
            snapshot: SharedSnapshot::default(),
            model: Mat4::IDENTITY,
            camera,
            framing,
            geometry,
            instances,
            options,
            sink,
        }
    }

    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    pub fn geometry(&self) -> &HelixGeometry {
        &self.geometry
    }

    pub fn instances(&self) -> &InstanceTable {
        &self.instances
    }

    pub fn anchors(&self) -> &SectionAnchorCalibrator {
        &self.anchors
    }

    pub fn tracker(&self) -> &ScrollProgressTracker {
        &self.tracker
    }

    pub fn active_section(&self) -> SectionId {
        self.active.active()
    }

    pub fn camera_state(&self) -> CameraState {
        self.framing.state()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn model(&self) -> &Mat4 {
        &self.model
    }

    pub fn group_scale(&self) -> f64 {
        self.scene_scale * self.framing.state().helix_scale
    }

    /// Shared handle to the latest marker screen positions.
    pub fn snapshot(&self) -> SharedSnapshot {
        self.snapshot.clone()
    }

    pub fn screen_positions(&self) -> Rc<ScreenSnapshot> {
        self.snapshot.current()
    }

    // ---------------- scroll / layout ----------------

    pub fn request_scroll(&mut self) -> bool {
        self.tracker.request()
    }

    pub fn on_scroll_frame(
        &mut self,
        scroll_y: f64,
        document_height: f64,
        viewport_height: f64,
    ) -> ScrollMetrics {
        let metrics = self
            .tracker
            .recompute(scroll_y, document_height, viewport_height);
        if self.sink.enabled() {
            self.sink.record(DiagEvent::Scroll(metrics));
            self.sink.flush();
        }
        metrics
    }

    /// Snap smoothed progress to raw, e.g. for the first paint.
    pub fn settle_scroll(&mut self) {
        self.tracker.settle();
    }

    pub fn request_measure(&mut self) -> bool {
        self.anchors.request_measure()
    }

    pub fn on_measure(&mut self, layout: Option<AnchorLayout>, scroll_y: f64) -> bool {
        self.anchors.calibrate(layout, scroll_y)
    }

    pub fn request_offsets(&mut self) -> bool {
        self.anchors.request_offsets()
    }

    pub fn on_offsets(&mut self, scroll_y: f64) -> bool {
        self.anchors.update_offsets(scroll_y)
    }

    /// Drop any pending coalesced work (teardown).
    pub fn cancel_pending(&mut self) {
        self.tracker.cancel();
        self.anchors.cancel();
    }

    pub fn observe_visibility<I>(&mut self, batch: I) -> Option<SectionId>
    where
        I: IntoIterator<Item = (SectionId, f64)>,
    {
        let changed = self.active.observe(batch);
        if let Some(id) = changed {
            if self.sink.enabled() {
                self.sink.record(DiagEvent::ActiveSection(id));
                self.sink.flush();
            }
        }
        changed
    }

    /// Canvas CSS size changed. Returns the new camera when reframed.
    pub fn resize(&mut self, width: f64, height: f64) -> Option<CameraState> {
        let applied = self.framing.resize(width, height);
        if self.sink.enabled() {
            self.sink.record(DiagEvent::Framing(self.framing.report()));
            self.sink.flush();
        }
        applied
    }

    // ---------------- per frame ----------------

    pub fn frame(&mut self, input: FrameInput) -> FrameOutput {
        let time = self.clock.advance(input.dt_sec);
        let smoothed = self.tracker.advance(input.dt_sec);
        let rotation = rotation_y(time, smoothed, self.options.deterministic);

        let state = self.framing.state();
        let aspect = aspect_ratio(input.rect.width, input.rect.height);
        self.camera = Camera::from_state(&state, aspect);

        let projected = self
            .projector
            .due(input.now_sec, input.rect.width, input.rect.height);
        if projected {
            self.refit(&state);
        }

        let group_scale = self.scene_scale * state.helix_scale;
        self.model = Mat4::from_scale_rotation_translation(
            Vec3::splat(group_scale as f32),
            Quat::from_rotation_y(rotation as f32),
            Vec3::ZERO,
        );

        let params = self.geometry.params;
        let indicator_point =
            indicator_on_helix(self.anchors.helix_progress(smoothed) as f32, &params);
        let indicator = Vec3::new(
            indicator_point.position.x,
            to_world_y(indicator_point.position.y, params.height),
            indicator_point.position.z,
        );
        self.instances.apply_reveal(indicator.y);

        let active = self.active.active();
        let halos = self
            .geometry
            .markers
            .iter()
            .map(|m| HaloFrame {
                section: m.section,
                position: m.position,
                color: m.color,
                style: marker_pulse(time, m.section == active),
            })
            .collect();

        if projected {
            self.project(&input.rect);
        }

        FrameOutput {
            time_sec: time,
            rotation_y: rotation,
            group_scale,
            model: self.model,
            camera: self.camera,
            halos,
            indicator,
            indicator_scale: INDICATOR_SCALE * indicator_point.scale,
            projected,
        }
    }

    fn refit(&mut self, state: &CameraState) {
        let local_height = self.geometry.local_height(CLUSTER_SCALE) as f64 * state.helix_scale;
        let viewport_height = visible_height(state.fov_deg, state.distance_z);
        let fit = fit_scene(local_height, self.scene_scale, viewport_height);
        if let Some(target) = fit.target_scale {
            // Never grow past the width the camera was framed for.
            self.scene_scale = target.min(1.0);
        }
        if self.sink.enabled() {
            self.sink.record(DiagEvent::Fit {
                fit,
                group_scale: self.scene_scale * state.helix_scale,
            });
        }
    }

    fn project(&mut self, rect: &CssRect) {
        let snapshot = self
            .projector
            .project(&self.geometry.markers, &self.model, &self.camera, rect);
        self.snapshot.publish(snapshot);
        if self.sink.enabled() {
            self.sink
                .record(DiagEvent::Markers(self.snapshot.current()));
            self.sink
                .record(DiagEvent::Luminance(self.instances.luminance_check()));
            self.sink.flush();
        }
    }

    // ---------------- pointer ----------------

    fn pick(&self, x: f64, y: f64, rect: &CssRect) -> Option<SectionId> {
        pick_marker(
            &self.camera,
            &self.model,
            &self.geometry.markers,
            self.hit.hit_volume_radius(),
            x,
            y,
            rect,
        )
    }

    /// Hover tracking. Returns the hovered section, if any.
    pub fn pointer_move(&mut self, x: f64, y: f64, rect: &CssRect) -> Option<SectionId> {
        let section = self.pick(x, y, rect);
        let instance = section.and_then(|s| self.front_instance(s));
        self.instances.set_hover(instance);
        section
    }

    pub fn pointer_leave(&mut self) {
        self.instances.set_hover(None);
    }

    /// Marker instance of `section` nearest the camera.
    fn front_instance(&self, section: SectionId) -> Option<usize> {
        let eye = self.camera.eye;
        self.instances
            .instances_of(section)
            .into_iter()
            .filter_map(|i| {
                let p = self.geometry.point_at_instance(i)?;
                let world = self.model.transform_point3(self.geometry.world_position(p));
                Some((i, world.distance_squared(eye)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Precise path: ray against marker hit volumes. A hit is stamped so the
    /// fallback path stays quiet for the same gesture.
    pub fn precise_pointer(&mut self, x: f64, y: f64, rect: &CssRect, now_ms: f64) -> Option<SectionId> {
        match self.pick(x, y, rect) {
            Some(section) => {
                self.hit.stamp_precise(now_ms);
                self.record_click(section);
                Some(section)
            }
            None => {
                if self.sink.enabled() {
                    self.sink.record(DiagEvent::PointerMissed);
                }
                None
            }
        }
    }

    /// Trailing `click` of a gesture the precise path already handled on
    /// `pointerdown`. A hit refreshes the stamp without navigating again.
    pub fn precise_click(&mut self, x: f64, y: f64, rect: &CssRect, now_ms: f64) -> Option<SectionId> {
        let section = self.pick(x, y, rect)?;
        self.hit.stamp_precise(now_ms);
        Some(section)
    }

    /// Fallback path: nearest visible projected marker within the radius.
    pub fn fallback_pointer(&mut self, x: f64, y: f64, now_ms: f64) -> Option<SectionId> {
        let snapshot = self.snapshot.current();
        match self.hit.fallback(&snapshot, x, y, now_ms) {
            FallbackOutcome::Suppressed => None,
            FallbackOutcome::Probed { probe, navigate } => {
                if self.sink.enabled() {
                    self.sink.record(DiagEvent::FallbackPointer(probe));
                }
                if let Some(section) = navigate {
                    self.record_click(section);
                }
                navigate
            }
        }
    }

    /// Navigation entry point that bypasses pointer input.
    pub fn trigger_marker_click(&mut self, section: SectionId) -> SectionId {
        self.record_click(section);
        section
    }

    fn record_click(&mut self, section: SectionId) {
        log::info!("[nav] marker click -> {}", section);
        if self.sink.enabled() {
            self.sink.record(DiagEvent::MarkerClick(section));
            self.sink.flush();
        }
    }
}
