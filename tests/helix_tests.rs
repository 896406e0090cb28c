// Host-side tests for helix geometry and marker placement.

use helix_nav::core::helix::*;
use helix_nav::core::SectionId;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn generated_points_agree_with_continuous_placement() {
    let params = HelixParams::default();
    let strands = generate_helix_points(&params);
    assert_eq!(strands.strand1.len(), 61);
    assert_eq!(strands.strand2.len(), 61);
    for (i, p) in strands.strand1.iter().enumerate() {
        let expected = point_on_helix(i as f32 / 60.0, &params, Strand::First);
        assert!((p.position - expected).length() < 1e-4, "step {i}");
        assert_eq!(p.step, i as u32);
    }
}

#[test]
fn second_strand_is_half_a_turn_out_of_phase() {
    let params = HelixParams::default();
    let strands = generate_helix_points(&params);
    for (a, b) in strands.strand1.iter().zip(&strands.strand2) {
        assert!(approx(a.position.x, -b.position.x));
        assert!(approx(a.position.z, -b.position.z));
        assert!(approx(a.position.y, b.position.y));
    }
}

#[test]
fn depth_attributes_stay_in_range() {
    let params = HelixParams::default();
    let strands = generate_helix_points(&params);
    for p in strands.strand1.iter().chain(&strands.strand2) {
        assert!(p.scale >= 0.5 - 1e-6 && p.scale <= 1.0 + 1e-6);
        assert!(p.opacity >= 0.3 - 1e-6 && p.opacity <= 1.0 + 1e-6);
    }
    // Nearest point to the viewer is the largest and most opaque.
    let near = strands
        .strand1
        .iter()
        .max_by(|a, b| a.position.z.total_cmp(&b.position.z))
        .unwrap();
    assert!(near.scale > 0.95 && near.opacity > 0.95);

    let indicator = indicator_on_helix(0.5, &params);
    assert!(indicator.scale >= 0.5 && indicator.scale <= 1.3);
    assert!(indicator.opacity >= 0.5 && indicator.opacity <= 1.0);
}

#[test]
fn world_mapping_centers_the_helix() {
    assert_eq!(to_world_y(0.0, 40.0), 20.0);
    assert_eq!(to_world_y(40.0, 40.0), -20.0);
    assert_eq!(to_world_y(20.0, 40.0), 0.0);
}

#[test]
fn markers_sit_at_their_fractional_steps() {
    let geometry = HelixGeometry::new(HelixParams::default());
    let steps: Vec<(SectionId, usize)> = geometry.markers.iter().map(|m| (m.section, m.step)).collect();
    assert_eq!(
        steps,
        vec![
            (SectionId::Hero, 9),
            (SectionId::Projects, 30),
            (SectionId::Skills, 51),
            (SectionId::Contact, 57),
        ]
    );
    // Projects sits halfway up, on the axis between the strands.
    let projects = geometry.marker(SectionId::Projects).unwrap();
    assert!(projects.position.length() < 1e-4);

    let hero = geometry.marker(SectionId::Hero).unwrap();
    assert!(approx(hero.position.y, 14.0));
    assert_eq!(hero.color, SectionId::Hero.color_rgb());
}

#[test]
fn cluster_instances_cover_both_strands() {
    let geometry = HelixGeometry::new(HelixParams::default());
    assert_eq!(geometry.point_count(), 122);
    assert_eq!(geometry.section_at_instance(9), Some(SectionId::Hero));
    assert_eq!(geometry.section_at_instance(61 + 9), Some(SectionId::Hero));
    assert_eq!(geometry.section_at_instance(61 + 30), Some(SectionId::Projects));
    assert_eq!(geometry.section_at_instance(10), None);
    assert_eq!(geometry.section_at_step(57), Some(SectionId::Contact));
    assert!(geometry.point_at_instance(122).is_none());
}

#[test]
fn lattice_has_segments_and_rungs() {
    let geometry = HelixGeometry::new(HelixParams::default());
    let lattice = geometry.lattice_vertices();
    // 60 segments per strand plus 61 rungs, two vertices each.
    assert_eq!(lattice.len(), (60 + 60 + 61) * 2);
    for v in &lattice {
        assert!(v.y <= 20.0 + 1e-4 && v.y >= -20.0 - 1e-4);
    }
}

#[test]
fn local_height_includes_sprite_radius() {
    let geometry = HelixGeometry::new(HelixParams::default());
    assert!(approx(geometry.local_height(0.45), 40.9));
}
