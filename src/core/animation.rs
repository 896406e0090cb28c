//! Per-frame visual state: group rotation, marker pulses, hover styling,
//! progressive reveal and the luminance floor check.

use super::helix::{depth_factor, HelixGeometry};
use super::section::SectionId;
use crate::constants::*;
use fnv::FnvHashMap;
use serde::Serialize;
use smallvec::SmallVec;
use std::f64::consts::TAU;

/// Group Y rotation: slow idle spin plus one full turn across the page.
pub fn rotation_y(time_sec: f64, smoothed_progress: f64, deterministic: bool) -> f64 {
    let scroll_term = if deterministic {
        0.0
    } else {
        smoothed_progress * TAU
    };
    BASE_ROTATION_RATE * time_sec + scroll_term
}

/// Scene time. Frozen at zero in deterministic mode.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    elapsed_sec: f64,
    frozen: bool,
}

impl FrameClock {
    pub fn new(frozen: bool) -> Self {
        Self {
            elapsed_sec: 0.0,
            frozen,
        }
    }

    pub fn advance(&mut self, dt_sec: f64) -> f64 {
        if !self.frozen && dt_sec.is_finite() && dt_sec > 0.0 {
            self.elapsed_sec += dt_sec;
        }
        self.time()
    }

    pub fn time(&self) -> f64 {
        if self.frozen {
            0.0
        } else {
            self.elapsed_sec
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HaloStyle {
    pub inner_scale: f32,
    pub outer_scale: f32,
    pub inner_opacity: f32,
    pub outer_opacity: f32,
}

/// Two-sinusoid halo pulse; faster and larger for the active section.
pub fn marker_pulse(time_sec: f64, active: bool) -> HaloStyle {
    let base = if active { HALO_ACTIVE_SCALE } else { 1.0 };
    let speed = if active {
        HALO_ACTIVE_PULSE_SPEED
    } else {
        HALO_PULSE_SPEED
    };
    let t = time_sec as f32;
    let inner = 1.0 + (t * speed).sin() * HALO_INNER_AMPLITUDE;
    let outer = 1.0 + (t * speed * 0.75 + 0.5).sin() * HALO_OUTER_AMPLITUDE;
    HaloStyle {
        inner_scale: inner * base,
        outer_scale: outer * base,
        inner_opacity: if active { 0.9 } else { 0.25 },
        outer_opacity: if active { 0.5 } else { 0.08 },
    }
}

/// Rec. 709 relative luminance.
#[inline]
pub fn luminance(rgb: [f32; 3]) -> f32 {
    0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2]
}

#[inline]
fn scale_rgb(rgb: [f32; 3], k: f32) -> [f32; 3] {
    [rgb[0] * k, rgb[1] * k, rgb[2] * k]
}

/// Brightening factor for a particle at world height `y` relative to the
/// progress indicator. Always >= 1.
pub fn reveal_gain(y: f32, focus_y: f32) -> f32 {
    let half = REVEAL_RANGE / 2.0;
    let d = (y - focus_y).abs();
    let w = if d <= half {
        1.0
    } else if d >= half + REVEAL_FADE {
        0.0
    } else {
        let s = 1.0 - (d - half) / REVEAL_FADE;
        s * s * (3.0 - 2.0 * s)
    };
    1.0 + REVEAL_BOOST * w
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceStyle {
    pub scale: f32,
    pub color: [f32; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LumaCheck {
    pub min_base_luma: f32,
    pub min_current_luma: f32,
    pub min_luma_ok: bool,
}

/// Per-instance authored and current appearance for every helix particle.
#[derive(Clone, Debug)]
pub struct InstanceTable {
    base: Vec<InstanceStyle>,
    current: Vec<InstanceStyle>,
    world_y: Vec<f32>,
    sections: FnvHashMap<usize, SectionId>,
    hovered: Option<usize>,
}

impl InstanceTable {
    pub fn new(geometry: &HelixGeometry) -> Self {
        let n = geometry.point_count();
        let mut base = Vec::with_capacity(n);
        let mut world_y = Vec::with_capacity(n);
        let mut sections = FnvHashMap::default();
        for i in 0..n {
            let Some(point) = geometry.point_at_instance(i) else {
                continue;
            };
            let style = match geometry.section_at_instance(i) {
                Some(section) => {
                    sections.insert(i, section);
                    InstanceStyle {
                        scale: CLUSTER_SCALE,
                        color: section.color_rgb(),
                    }
                }
                None => {
                    let depth = depth_factor(point.position.z, geometry.params.radius);
                    let g = BASE_GRAY + depth * BASE_GRAY_DEPTH_SPAN;
                    InstanceStyle {
                        scale: BASE_PARTICLE_SCALE,
                        color: [g, g, g],
                    }
                }
            };
            base.push(style);
            world_y.push(geometry.world_position(point).y);
        }
        Self {
            current: base.clone(),
            base,
            world_y,
            sections,
            hovered: None,
        }
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    pub fn base(&self, i: usize) -> Option<&InstanceStyle> {
        self.base.get(i)
    }

    pub fn current(&self, i: usize) -> Option<&InstanceStyle> {
        self.current.get(i)
    }

    pub fn currents(&self) -> &[InstanceStyle] {
        &self.current
    }

    pub fn section(&self, i: usize) -> Option<SectionId> {
        self.sections.get(&i).copied()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Instances belonging to `section` (one per strand).
    pub fn instances_of(&self, section: SectionId) -> SmallVec<[usize; 2]> {
        let mut out: SmallVec<[usize; 2]> = self
            .sections
            .iter()
            .filter(|(_, s)| **s == section)
            .map(|(i, _)| *i)
            .collect();
        out.sort_unstable();
        out
    }

    /// Move hover to `instance` (must be a marker instance, otherwise treated
    /// as no hover). Restores the previous one. Returns the instances whose
    /// style changed.
    pub fn set_hover(&mut self, instance: Option<usize>) -> SmallVec<[usize; 2]> {
        let instance = instance.filter(|i| self.sections.contains_key(i));
        let mut changed = SmallVec::new();
        if instance == self.hovered {
            return changed;
        }
        if let Some(prev) = self.hovered.take() {
            if let Some(base) = self.base.get(prev) {
                self.current[prev] = *base;
                changed.push(prev);
            }
        }
        if let Some(i) = instance {
            if let Some(base) = self.base.get(i) {
                self.current[i] = InstanceStyle {
                    scale: base.scale * HOVER_SCALE,
                    color: scale_rgb(base.color, HOVER_BRIGHTEN),
                };
                changed.push(i);
            }
        }
        self.hovered = instance;
        changed
    }

    /// Re-apply reveal brightening around `focus_y`, keeping hover styling.
    pub fn apply_reveal(&mut self, focus_y: f32) {
        for i in 0..self.base.len() {
            let base = self.base[i];
            let gain = reveal_gain(self.world_y[i], focus_y);
            let (scale, hover_gain) = if Some(i) == self.hovered {
                (base.scale * HOVER_SCALE, HOVER_BRIGHTEN)
            } else {
                (base.scale, 1.0)
            };
            self.current[i] = InstanceStyle {
                scale,
                color: scale_rgb(base.color, gain * hover_gain),
            };
        }
    }

    /// Compare current against authored luminance over every 5th instance and
    /// all marker instances.
    pub fn luminance_check(&self) -> LumaCheck {
        let mut min_base = 1.0f32;
        let mut min_current = 1.0f32;
        let mut each_ok = true;
        for i in 0..self.base.len() {
            if i % LUMA_SAMPLE_STRIDE != 0 && !self.sections.contains_key(&i) {
                continue;
            }
            let b = luminance(self.base[i].color);
            let c = luminance(self.current[i].color);
            each_ok &= c >= b * LUMA_FLOOR_RATIO;
            min_base = min_base.min(b);
            min_current = min_current.min(c);
        }
        LumaCheck {
            min_base_luma: min_base,
            min_current_luma: min_current,
            min_luma_ok: each_ok && min_current >= min_base * LUMA_FLOOR_RATIO,
        }
    }
}
