//! Double-helix point generation and marker placement.
//!
//! Generated coordinates run from `y = 0` up to `y = height`. The scene draws
//! them vertically centered through [`to_world_y`].

use super::section::SectionId;
use fnv::FnvHashMap;
use glam::Vec3;
use serde::Deserialize;
use std::f32::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HelixParams {
    pub height: f32,
    pub radius: f32,
    pub steps: u32,
    pub rotations: f32,
}

impl Default for HelixParams {
    fn default() -> Self {
        Self {
            height: 40.0,
            radius: 3.0,
            steps: 60,
            rotations: 5.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strand {
    First,
    Second,
}

impl Strand {
    /// 1-based strand number.
    pub fn index(self) -> u8 {
        match self {
            Strand::First => 1,
            Strand::Second => 2,
        }
    }

    pub fn phase(self) -> f32 {
        match self {
            Strand::First => 0.0,
            Strand::Second => PI,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HelixPoint {
    pub position: Vec3,
    pub strand: Strand,
    pub step: u32,
    /// 0.5..1.0, larger toward the viewer.
    pub scale: f32,
    /// 0.3..1.0, more opaque toward the viewer.
    pub opacity: f32,
}

#[derive(Clone, Debug)]
pub struct HelixStrands {
    pub strand1: Vec<HelixPoint>,
    pub strand2: Vec<HelixPoint>,
}

/// Normalized depth in 0..1 where 1 is closest to the camera.
#[inline]
pub fn depth_factor(z: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.5;
    }
    ((z + radius) / (2.0 * radius)).clamp(0.0, 1.0)
}

#[inline]
pub fn to_world_y(y: f32, height: f32) -> f32 {
    height / 2.0 - y
}

/// Position on a strand at continuous `progress` in 0..1.
pub fn point_on_helix(progress: f32, params: &HelixParams, strand: Strand) -> Vec3 {
    let y = progress * params.height;
    let angle = progress * params.rotations * TAU + strand.phase();
    Vec3::new(angle.cos() * params.radius, y, angle.sin() * params.radius)
}

/// Continuous-placement variant with emphasized depth attributes, used for the
/// travelling progress indicator.
pub fn indicator_on_helix(progress: f32, params: &HelixParams) -> HelixPoint {
    let position = point_on_helix(progress, params, Strand::First);
    let depth = depth_factor(position.z, params.radius);
    HelixPoint {
        position,
        strand: Strand::First,
        step: (progress.clamp(0.0, 1.0) * params.steps as f32).round() as u32,
        scale: 0.5 + depth * 0.8,
        opacity: 0.5 + depth * 0.5,
    }
}

pub fn generate_helix_points(params: &HelixParams) -> HelixStrands {
    let steps = params.steps.max(1);
    let mut strand1 = Vec::with_capacity(steps as usize + 1);
    let mut strand2 = Vec::with_capacity(steps as usize + 1);
    for i in 0..=steps {
        let progress = i as f32 / steps as f32;
        for (strand, out) in [(Strand::First, &mut strand1), (Strand::Second, &mut strand2)] {
            let position = point_on_helix(progress, params, strand);
            let depth = depth_factor(position.z, params.radius);
            out.push(HelixPoint {
                position,
                strand,
                step: i,
                scale: 0.5 + depth * 0.5,
                opacity: 0.3 + depth * 0.7,
            });
        }
    }
    HelixStrands { strand1, strand2 }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionMarker {
    pub section: SectionId,
    pub step: usize,
    /// Group-local position, already mapped through [`to_world_y`].
    pub position: Vec3,
    pub color: [f32; 3],
}

pub fn marker_step(section: SectionId, steps: u32) -> usize {
    (steps as f32 * section.helix_fraction()).floor() as usize
}

/// Immutable scene geometry: both strands, the section markers and a lookup
/// from step index to the section clustered there.
#[derive(Clone, Debug)]
pub struct HelixGeometry {
    pub params: HelixParams,
    pub strands: HelixStrands,
    pub markers: Vec<SectionMarker>,
    cluster_steps: FnvHashMap<usize, SectionId>,
}

impl HelixGeometry {
    pub fn new(params: HelixParams) -> Self {
        let strands = generate_helix_points(&params);
        let mut cluster_steps = FnvHashMap::default();
        let mut markers = Vec::with_capacity(SectionId::ALL.len());
        for section in SectionId::ALL {
            let step = marker_step(section, params.steps.max(1));
            let (Some(p1), Some(p2)) = (strands.strand1.get(step), strands.strand2.get(step)) else {
                continue;
            };
            cluster_steps.insert(step, section);
            let mid = (p1.position + p2.position) * 0.5;
            markers.push(SectionMarker {
                section,
                step,
                position: Vec3::new(mid.x, to_world_y(p1.position.y, params.height), mid.z),
                color: section.color_rgb(),
            });
        }
        Self {
            params,
            strands,
            markers,
            cluster_steps,
        }
    }

    pub fn point_count(&self) -> usize {
        self.strands.strand1.len() + self.strands.strand2.len()
    }

    /// Instance layout is strand 1 followed by strand 2.
    pub fn point_at_instance(&self, instance: usize) -> Option<&HelixPoint> {
        let n1 = self.strands.strand1.len();
        if instance < n1 {
            self.strands.strand1.get(instance)
        } else {
            self.strands.strand2.get(instance - n1)
        }
    }

    pub fn section_at_instance(&self, instance: usize) -> Option<SectionId> {
        let point = self.point_at_instance(instance)?;
        self.cluster_steps.get(&(point.step as usize)).copied()
    }

    pub fn section_at_step(&self, step: usize) -> Option<SectionId> {
        self.cluster_steps.get(&step).copied()
    }

    pub fn marker(&self, section: SectionId) -> Option<&SectionMarker> {
        self.markers.iter().find(|m| m.section == section)
    }

    pub fn world_position(&self, point: &HelixPoint) -> Vec3 {
        Vec3::new(
            point.position.x,
            to_world_y(point.position.y, self.params.height),
            point.position.z,
        )
    }

    /// Line-list vertices for the faint lattice: consecutive segments along
    /// each strand plus one rung per step joining the strands.
    pub fn lattice_vertices(&self) -> Vec<Vec3> {
        let s1 = &self.strands.strand1;
        let s2 = &self.strands.strand2;
        let mut out = Vec::with_capacity((s1.len() + s2.len() + s1.len()) * 2);
        for strand in [s1, s2] {
            for pair in strand.windows(2) {
                out.push(self.world_position(&pair[0]));
                out.push(self.world_position(&pair[1]));
            }
        }
        for (a, b) in s1.iter().zip(s2) {
            out.push(self.world_position(a));
            out.push(self.world_position(b));
        }
        out
    }

    /// Vertical extent in group-local units including sprite radius.
    pub fn local_height(&self, sprite_radius: f32) -> f32 {
        self.params.height + 2.0 * sprite_radius
    }
}
