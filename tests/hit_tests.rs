// Host-side tests for marker projection and both hit-testing paths.

use glam::{Mat4, Vec3};
use helix_nav::core::camera::{ray_sphere, Camera};
use helix_nav::core::framing::{CameraState, FramingConfig};
use helix_nav::core::hit::*;
use helix_nav::core::projection::*;
use helix_nav::core::{HelixGeometry, HelixParams, SectionId};

const RECT: CssRect = CssRect {
    left: 0.0,
    top: 0.0,
    width: 400.0,
    height: 400.0,
};

fn camera() -> Camera {
    Camera::from_state(&CameraState::baseline(&FramingConfig::default()), 1.0)
}

fn snapshot(entries: &[(SectionId, f64, f64, bool)]) -> ScreenSnapshot {
    ScreenSnapshot::new(
        entries
            .iter()
            .map(|(id, x, y, visible)| {
                (
                    *id,
                    MarkerScreenPosition {
                        x: *x,
                        y: *y,
                        visible: *visible,
                    },
                )
            })
            .collect(),
    )
}

#[test]
fn origin_projects_to_canvas_center() {
    let cam = camera();
    let vp = cam.projection_matrix_gl() * cam.view_matrix();
    let p = project_to_css(Vec3::ZERO, &vp, 400.0, 400.0);
    assert!((p.x - 200.0).abs() < 1e-3);
    assert!((p.y - 200.0).abs() < 1e-3);
    assert!(p.visible);
}

#[test]
fn up_in_world_is_up_on_screen() {
    let cam = camera();
    let vp = cam.projection_matrix_gl() * cam.view_matrix();
    let p = project_to_css(Vec3::new(2.0, 5.0, 0.0), &vp, 400.0, 400.0);
    assert!(p.y < 200.0);
    assert!(p.x > 200.0);
}

#[test]
fn points_outside_the_depth_range_are_invisible() {
    let cam = camera();
    let vp = cam.projection_matrix_gl() * cam.view_matrix();
    // Behind the eye.
    assert!(!project_to_css(Vec3::new(0.0, 0.0, 40.0), &vp, 400.0, 400.0).visible);
    // Past the far plane.
    assert!(!project_to_css(Vec3::new(0.0, 0.0, -2000.0), &vp, 400.0, 400.0).visible);
    // Inside the near plane.
    assert!(!project_to_css(Vec3::new(0.0, 0.0, 27.95), &vp, 400.0, 400.0).visible);
}

#[test]
fn projector_throttles_and_reprojects_on_resize() {
    let mut p = MarkerProjector::new(10.0, false);
    assert!(p.due(0.0, 400.0, 400.0));
    assert!(!p.due(0.05, 400.0, 400.0));
    assert!(p.due(0.06, 300.0, 400.0));
    assert!(p.due(0.2, 300.0, 400.0));
}

#[test]
fn deterministic_projector_runs_once_per_size() {
    let mut p = MarkerProjector::new(10.0, true);
    assert!(p.due(0.0, 400.0, 400.0));
    assert!(!p.due(5.0, 400.0, 400.0));
    assert!(!p.due(10.0, 400.0, 400.0));
    assert!(p.due(10.0, 500.0, 400.0));
    assert!(!p.due(20.0, 500.0, 400.0));
}

#[test]
fn snapshot_publish_swaps_whole_sets() {
    let shared = SharedSnapshot::default();
    let reader = shared.clone();
    assert!(reader.current().is_empty());
    let held = reader.current();
    shared.publish(snapshot(&[(SectionId::Hero, 1.0, 2.0, true)]));
    assert!(held.is_empty());
    assert_eq!(reader.current().get(SectionId::Hero).unwrap().x, 1.0);
    assert_eq!(reader.current().to_map().len(), 1);
}

#[test]
fn precise_ray_hits_marker_under_pointer() {
    let geometry = HelixGeometry::new(HelixParams::default());
    let cam = camera();
    let hit = pick_marker(&cam, &Mat4::IDENTITY, &geometry.markers, 5.0, 200.0, 200.0, &RECT);
    assert_eq!(hit, Some(SectionId::Projects));
}

#[test]
fn precise_ray_misses_empty_space() {
    let geometry = HelixGeometry::new(HelixParams::default());
    let cam = camera();
    let hit = pick_marker(&cam, &Mat4::IDENTITY, &geometry.markers, 5.0, 395.0, 200.0, &RECT);
    assert_eq!(hit, None);
}

#[test]
fn precise_hit_volume_scales_with_the_group() {
    let geometry = HelixGeometry::new(HelixParams::default());
    let cam = camera();
    // At 0.1 scale the volume radius is 0.5 world units.
    let model = Mat4::from_scale(Vec3::splat(0.1));
    assert_eq!(
        pick_marker(&cam, &model, &geometry.markers, 5.0, 200.0, 200.0, &RECT),
        Some(SectionId::Projects)
    );
    assert_eq!(
        pick_marker(&cam, &model, &geometry.markers, 5.0, 230.0, 200.0, &RECT),
        None
    );
}

#[test]
fn ray_sphere_reports_nearest_entry() {
    let t = ray_sphere(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::ZERO, 1.0).unwrap();
    assert!((t - 9.0).abs() < 1e-5);
    assert_eq!(ray_sphere(Vec3::ZERO, Vec3::NEG_Z, Vec3::ZERO, 1.0), Some(0.0));
    assert_eq!(ray_sphere(Vec3::new(0.0, 5.0, 10.0), Vec3::NEG_Z, Vec3::ZERO, 1.0), None);
    assert_eq!(ray_sphere(Vec3::new(0.0, 0.0, -10.0), Vec3::NEG_Z, Vec3::ZERO, 1.0), None);
}

#[test]
fn fallback_navigates_to_exact_marker_position() {
    let tester = HitTester::new(HitConfig::default(), false);
    let snap = snapshot(&[
        (SectionId::Hero, 100.0, 50.0, true),
        (SectionId::Projects, 100.0, 200.0, true),
    ]);
    match tester.fallback(&snap, 100.0, 200.0, 0.0) {
        FallbackOutcome::Probed { probe, navigate } => {
            assert_eq!(navigate, Some(SectionId::Projects));
            assert_eq!(probe.closest_distance, Some(0.0));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn fallback_ignores_far_pointers() {
    let tester = HitTester::new(HitConfig::default(), false);
    let snap = snapshot(&[(SectionId::Projects, 100.0, 200.0, true)]);
    match tester.fallback(&snap, 100.0, 300.0, 0.0) {
        FallbackOutcome::Probed { probe, navigate } => {
            assert_eq!(navigate, None);
            assert_eq!(probe.closest_section, Some(SectionId::Projects));
            assert_eq!(probe.closest_distance, Some(100.0));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn fallback_skips_invisible_markers() {
    let tester = HitTester::new(HitConfig::default(), false);
    let snap = snapshot(&[
        (SectionId::Hero, 100.0, 300.0, false),
        (SectionId::Projects, 100.0, 100.0, true),
    ]);
    match tester.fallback(&snap, 100.0, 300.0, 0.0) {
        FallbackOutcome::Probed { probe, navigate } => {
            assert_eq!(navigate, None);
            assert_eq!(probe.closest_section, Some(SectionId::Projects));
        }
        other => panic!("unexpected {other:?}"),
    }
    let none_visible = snapshot(&[(SectionId::Hero, 100.0, 300.0, false)]);
    match tester.fallback(&none_visible, 100.0, 300.0, 0.0) {
        FallbackOutcome::Probed { probe, navigate } => {
            assert_eq!(navigate, None);
            assert_eq!(probe.closest_section, None);
            assert_eq!(probe.closest_distance, None);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn fallback_stays_quiet_right_after_a_precise_hit() {
    let mut tester = HitTester::new(HitConfig::default(), false);
    let snap = snapshot(&[(SectionId::Projects, 100.0, 100.0, true)]);
    tester.stamp_precise(1000.0);
    assert_eq!(tester.fallback(&snap, 100.0, 100.0, 1000.0), FallbackOutcome::Suppressed);
    assert_eq!(tester.fallback(&snap, 100.0, 100.0, 1149.0), FallbackOutcome::Suppressed);
    assert!(matches!(
        tester.fallback(&snap, 100.0, 100.0, 1150.0),
        FallbackOutcome::Probed {
            navigate: Some(SectionId::Projects),
            ..
        }
    ));
}

#[test]
fn deterministic_mode_widens_the_fallback() {
    let normal = HitTester::new(HitConfig::default(), false);
    let wide = HitTester::new(HitConfig::default(), true);
    assert_eq!(normal.fallback_radius_px(), 80.0);
    assert_eq!(wide.fallback_radius_px(), 200.0);
    let snap = snapshot(&[(SectionId::Skills, 0.0, 0.0, true)]);
    assert!(matches!(
        normal.fallback(&snap, 150.0, 0.0, 0.0),
        FallbackOutcome::Probed { navigate: None, .. }
    ));
    assert!(matches!(
        wide.fallback(&snap, 150.0, 0.0, 0.0),
        FallbackOutcome::Probed {
            navigate: Some(SectionId::Skills),
            ..
        }
    ));
}
