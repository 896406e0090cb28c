// Host-side tests for active-section detection.

use helix_nav::core::active::*;
use helix_nav::core::SectionId;

fn detector() -> ActiveSectionDetector {
    ActiveSectionDetector::new(&[SectionId::Hero, SectionId::Projects, SectionId::Skills])
}

#[test]
fn starts_on_the_first_section() {
    let d = detector();
    assert_eq!(d.active(), SectionId::Hero);
    assert_eq!(d.order().len(), 3);
}

#[test]
fn weak_visibility_does_not_steal_focus() {
    let mut d = detector();
    assert_eq!(d.observe([(SectionId::Projects, 0.05)]), None);
    assert_eq!(d.observe([(SectionId::Projects, 0.1)]), None);
    assert_eq!(d.active(), SectionId::Hero);
}

#[test]
fn most_visible_section_wins() {
    let mut d = detector();
    let changed = d.observe([(SectionId::Hero, 0.3), (SectionId::Projects, 0.6)]);
    assert_eq!(changed, Some(SectionId::Projects));
    assert_eq!(d.active(), SectionId::Projects);
    // Same winner again: no change reported.
    assert_eq!(d.observe([(SectionId::Projects, 0.7)]), None);
}

#[test]
fn focus_holds_when_everything_scrolls_out() {
    let mut d = detector();
    d.observe([(SectionId::Skills, 0.8)]);
    assert_eq!(d.active(), SectionId::Skills);
    assert_eq!(
        d.observe([
            (SectionId::Hero, 0.0),
            (SectionId::Projects, 0.0),
            (SectionId::Skills, 0.0)
        ]),
        None
    );
    assert_eq!(d.active(), SectionId::Skills);
}

#[test]
fn ties_go_to_the_earlier_section() {
    let mut d = detector();
    d.observe([(SectionId::Skills, 0.5)]);
    let changed = d.observe([(SectionId::Projects, 0.5)]);
    assert_eq!(changed, Some(SectionId::Projects));
}

#[test]
fn untracked_and_invalid_ratios_are_ignored() {
    let mut d = detector();
    assert_eq!(d.observe([(SectionId::Contact, 1.0)]), None);
    assert_eq!(d.ratio(SectionId::Contact), 0.0);
    assert_eq!(d.observe([(SectionId::Projects, f64::NAN)]), None);
    assert_eq!(d.ratio(SectionId::Projects), 0.0);
}

#[test]
fn focus_band_matches_observer_margins() {
    // Band is 200..800 for a 1000px viewport.
    assert!((focus_band_ratio(0.0, 1000.0, 1000.0) - 0.6).abs() < 1e-9);
    assert_eq!(focus_band_ratio(900.0, 100.0, 1000.0), 0.0);
    assert_eq!(focus_band_ratio(300.0, 100.0, 1000.0), 1.0);
    assert!((focus_band_ratio(700.0, 200.0, 1000.0) - 0.5).abs() < 1e-9);
    assert_eq!(focus_band_ratio(0.0, 0.0, 1000.0), 0.0);
}
