// Host-side end-to-end tests for the navigation scene, its diagnostics and
// mount options.

use helix_nav::core::diagnostics::{DiagEvent, RecordingSink};
use helix_nav::core::{CssRect, FrameInput, NavScene, SceneOptions, SectionId};
use helix_nav::NavError;
use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

const RECT: CssRect = CssRect {
    left: 0.0,
    top: 0.0,
    width: 400.0,
    height: 400.0,
};

fn scene_with(options: SceneOptions) -> (NavScene, Rc<RefCell<RecordingSink>>) {
    let sink = Rc::new(RefCell::new(RecordingSink::default()));
    let scene = NavScene::new(options, Box::new(sink.clone()));
    (scene, sink)
}

fn frame_at(scene: &mut NavScene, now_sec: f64) -> helix_nav::core::FrameOutput {
    scene.frame(FrameInput {
        dt_sec: 1.0 / 60.0,
        now_sec,
        rect: RECT,
    })
}

#[test]
fn scroll_halfway_turns_the_helix_half_a_revolution() {
    let (mut scene, sink) = scene_with(SceneOptions::default());
    let m = scene.on_scroll_frame(1000.0, 3000.0, 1000.0);
    assert_eq!(m.raw, 0.5);
    scene.settle_scroll();
    let out = frame_at(&mut scene, 0.0);
    let expected = PI + 0.15 * (1.0 / 60.0);
    assert!((out.rotation_y - expected).abs() < 1e-9);
    assert_eq!(sink.borrow().state.scroll_progress, 0.5);
    assert_eq!(sink.borrow().state.scroll_range_px, 2000.0);
}

#[test]
fn deterministic_scene_does_not_move() {
    let options = SceneOptions {
        deterministic: true,
        ..SceneOptions::default()
    };
    let (mut scene, sink) = scene_with(options);
    scene.on_scroll_frame(2000.0, 3000.0, 1000.0);
    scene.settle_scroll();
    let a = frame_at(&mut scene, 0.0);
    let b = frame_at(&mut scene, 5.0);
    assert_eq!(a.rotation_y, 0.0);
    assert_eq!(b.rotation_y, 0.0);
    assert_eq!(b.time_sec, 0.0);
    assert!(a.projected);
    assert!(!b.projected);
    assert!(sink.borrow().state.motion_frozen);
}

#[test]
fn first_projection_fits_the_helix_into_view() {
    let (mut scene, sink) = scene_with(SceneOptions::default());
    let first = frame_at(&mut scene, 0.0);
    assert!(first.projected);
    assert!(first.group_scale < 1.0);
    assert_eq!(sink.borrow().state.fits_viewport, Some(false));

    let second = frame_at(&mut scene, 0.5);
    assert!(second.projected);
    assert_eq!(second.group_scale, first.group_scale);
    let state = sink.borrow().state.clone();
    assert_eq!(state.fits_viewport, Some(true));
    let helix = state.helix_world_height.unwrap();
    let viewport = state.viewport_world_height.unwrap();
    assert!(helix <= viewport * 0.95 + 0.01);
}

#[test]
fn projection_is_throttled() {
    let (mut scene, _) = scene_with(SceneOptions::default());
    assert!(frame_at(&mut scene, 0.0).projected);
    assert!(!frame_at(&mut scene, 0.016).projected);
    assert!(!frame_at(&mut scene, 0.05).projected);
    assert!(frame_at(&mut scene, 0.2).projected);
}

#[test]
fn diagnostics_capture_markers_and_luminance() {
    let (mut scene, sink) = scene_with(SceneOptions::default());
    frame_at(&mut scene, 0.0);
    let sink = sink.borrow();
    let state = &sink.state;
    assert_eq!(state.markers.len(), 4);
    let projects = state.markers["projects"];
    assert!(projects.visible);
    assert!((projects.x - 200.0).abs() < 1e-3);
    assert!((projects.y - 200.0).abs() < 1e-3);
    assert_eq!(state.min_luma_ok, Some(true));
    assert!(state.marker_colors_ok);
    assert_eq!(state.marker_colors["hero"], "#4ea2ff");
    assert_eq!(state.active_section, Some(SectionId::Hero));
    assert!(sink.flushes >= 1);

    let json = serde_json::to_value(state).unwrap();
    assert_eq!(json["version"], 1);
    assert_eq!(json["markers"]["projects"]["visible"], true);
    assert!(json.get("minLumaOk").is_some());
    assert!(json.get("fallbackLastPointer").is_some());
}

#[test]
fn precise_hit_navigates_and_suppresses_fallback() {
    let (mut scene, sink) = scene_with(SceneOptions::default());
    frame_at(&mut scene, 0.0);

    assert_eq!(scene.precise_pointer(200.0, 200.0, &RECT, 1000.0), Some(SectionId::Projects));
    assert_eq!(scene.fallback_pointer(200.0, 200.0, 1010.0), None);
    assert_eq!(sink.borrow().state.fallback_last_pointer, None);
    assert_eq!(sink.borrow().state.last_marker_click, Some(SectionId::Projects));
}

#[test]
fn long_press_navigates_once() {
    let (mut scene, sink) = scene_with(SceneOptions::default());
    frame_at(&mut scene, 0.0);
    let mut navigations = Vec::new();

    // pointerdown: precise first, then the fallback listeners.
    navigations.extend(scene.precise_pointer(200.0, 200.0, &RECT, 1000.0));
    navigations.extend(scene.fallback_pointer(200.0, 200.0, 1000.0));
    // mousedown
    navigations.extend(scene.fallback_pointer(200.0, 200.0, 1001.0));
    // click, released well past the suppression window
    assert_eq!(scene.precise_click(200.0, 200.0, &RECT, 1200.0), Some(SectionId::Projects));
    navigations.extend(scene.fallback_pointer(200.0, 200.0, 1200.0));

    assert_eq!(navigations, vec![SectionId::Projects]);
    let clicks = sink
        .borrow()
        .events
        .iter()
        .filter(|e| matches!(e, DiagEvent::MarkerClick(_)))
        .count();
    assert_eq!(clicks, 1);
}

#[test]
fn fallback_navigates_when_the_ray_misses() {
    let (mut scene, sink) = scene_with(SceneOptions::default());
    frame_at(&mut scene, 0.0);
    // 60 px off center clears the fitted hit volume (about 46 px) but sits
    // inside the fallback radius.
    assert_eq!(scene.precise_pointer(260.0, 200.0, &RECT, 1000.0), None);
    assert_eq!(scene.precise_click(260.0, 200.0, &RECT, 1050.0), None);
    assert_eq!(scene.fallback_pointer(260.0, 200.0, 1050.0), Some(SectionId::Projects));
    let seen = sink.borrow().state.fallback_last_pointer.unwrap();
    assert_eq!(seen.closest_section, Some(SectionId::Projects));
    assert!((seen.closest_distance.unwrap() - 60.0).abs() < 1e-3);
}

#[test]
fn missed_pointer_is_counted() {
    let (mut scene, sink) = scene_with(SceneOptions::default());
    frame_at(&mut scene, 0.0);
    assert_eq!(scene.precise_pointer(395.0, 200.0, &RECT, 0.0), None);
    assert_eq!(scene.precise_pointer(395.0, 210.0, &RECT, 10.0), None);
    assert_eq!(sink.borrow().state.pointer_missed_count, 2);
    assert_eq!(scene.fallback_pointer(395.0, 200.0, 20.0), None);
}

#[test]
fn hover_tracks_the_marker_nearest_the_camera() {
    let (mut scene, _) = scene_with(SceneOptions::default());
    frame_at(&mut scene, 0.0);
    assert_eq!(scene.pointer_move(200.0, 200.0, &RECT), Some(SectionId::Projects));
    let hovered = scene.instances().hovered().unwrap();
    assert!(scene
        .instances()
        .instances_of(SectionId::Projects)
        .contains(&hovered));
    assert_eq!(scene.pointer_move(395.0, 200.0, &RECT), None);
    assert_eq!(scene.instances().hovered(), None);
}

#[test]
fn deterministic_diagnostics_follow_scroll_and_focus() {
    let options = SceneOptions {
        deterministic: true,
        ..SceneOptions::default()
    };
    let (mut scene, sink) = scene_with(options);
    frame_at(&mut scene, 0.0);
    let before = sink.borrow().flushes;

    scene.on_scroll_frame(1000.0, 3000.0, 1000.0);
    let after_scroll = sink.borrow().flushes;
    assert!(after_scroll > before);
    assert_eq!(sink.borrow().state.scroll_progress, 0.5);

    scene.observe_visibility([(SectionId::Skills, 0.8)]);
    assert!(sink.borrow().flushes > after_scroll);

    // Frames alone do not reproject in deterministic mode.
    let settled = sink.borrow().flushes;
    for i in 1..=120 {
        assert!(!frame_at(&mut scene, i as f64 / 60.0).projected);
    }
    assert_eq!(sink.borrow().flushes, settled);
    assert_eq!(sink.borrow().state.active_section, Some(SectionId::Skills));
}

#[test]
fn trigger_marker_click_records_without_pointer() {
    let (mut scene, sink) = scene_with(SceneOptions::default());
    assert_eq!(scene.trigger_marker_click(SectionId::Skills), SectionId::Skills);
    assert_eq!(sink.borrow().state.last_marker_click, Some(SectionId::Skills));
    assert!(sink
        .borrow()
        .events
        .iter()
        .any(|e| matches!(e, DiagEvent::MarkerClick(SectionId::Skills))));
}

#[test]
fn visibility_changes_update_active_section_and_halos() {
    let (mut scene, sink) = scene_with(SceneOptions::default());
    assert_eq!(
        scene.observe_visibility([(SectionId::Projects, 0.7)]),
        Some(SectionId::Projects)
    );
    assert_eq!(scene.active_section(), SectionId::Projects);
    assert_eq!(sink.borrow().state.active_section, Some(SectionId::Projects));

    let out = frame_at(&mut scene, 0.0);
    let halo = out
        .halos
        .iter()
        .find(|h| h.section == SectionId::Projects)
        .unwrap();
    assert_eq!(halo.style.inner_opacity, 0.9);
    let idle = out.halos.iter().find(|h| h.section == SectionId::Hero).unwrap();
    assert_eq!(idle.style.inner_opacity, 0.25);
}

#[test]
fn narrow_rail_reframes_and_reports() {
    let (mut scene, sink) = scene_with(SceneOptions::default());
    assert!(scene.resize(300.0, 800.0).is_none());
    let applied = scene.resize(60.0, 800.0).expect("reframed");
    assert_eq!(applied.fov_deg, 75.0);
    assert!(applied.helix_scale < 1.0);
    let state = sink.borrow().state.clone();
    assert_eq!(state.camera_fov, Some(75.0));
    assert_eq!(state.is_narrow, Some(true));
    assert_eq!(state.canvas_px, Some(60.0));
}

#[test]
fn indicator_tracks_calibrated_progress() {
    let (mut scene, _) = scene_with(SceneOptions::default());
    scene.on_scroll_frame(1000.0, 3000.0, 1000.0);
    scene.settle_scroll();
    let out = frame_at(&mut scene, 0.0);
    // Halfway down with default anchors lands on the projects marker.
    let projects = scene.geometry().marker(SectionId::Projects).unwrap().position;
    assert!((out.indicator.y - projects.y).abs() < 1e-4);
}

#[test]
fn teardown_cancels_pending_work() {
    let (mut scene, _) = scene_with(SceneOptions::default());
    assert!(scene.request_scroll());
    assert!(scene.request_measure());
    scene.cancel_pending();
    assert!(!scene.tracker().is_pending());
    assert!(scene.request_scroll());
    assert!(scene.request_measure());
}

#[test]
fn options_parse_from_partial_json() {
    assert_eq!(SceneOptions::from_json("").unwrap(), SceneOptions::default());
    assert_eq!(SceneOptions::from_json("null").unwrap(), SceneOptions::default());
    let o = SceneOptions::from_json(
        r#"{"deterministic":true,"eventSourceId":"rail","hit":{"fallbackRadiusPx":50}}"#,
    )
    .unwrap();
    assert!(o.deterministic);
    assert_eq!(o.event_source_id.as_deref(), Some("rail"));
    assert_eq!(o.hit.fallback_radius_px, 50.0);
    assert_eq!(o.hit.suppress_window_ms, 150.0);
    assert_eq!(o.projection_hz, 10.0);
    assert!(o.diagnostics_enabled());

    let quiet = SceneOptions::from_json(r#"{"diagnostics":false,"deterministic":true}"#).unwrap();
    assert!(!quiet.diagnostics_enabled());

    assert!(matches!(
        SceneOptions::from_json("{oops"),
        Err(NavError::Options(_))
    ));
}

#[test]
fn section_ids_parse_strictly() {
    assert_eq!("skills".parse::<SectionId>().unwrap(), SectionId::Skills);
    let err = "about".parse::<SectionId>().unwrap_err();
    assert!(matches!(err, NavError::UnknownSection(ref s) if s == "about"));
    assert_eq!(SectionId::Contact.to_string(), "contact");
}
