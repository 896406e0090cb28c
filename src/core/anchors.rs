//! Section anchor calibration: DOM anchor positions to normalized page
//! progress plus live viewport offsets.

use super::schedule::FrameGate;
use super::section::SectionId;

/// Sections with a measurable heading anchor, in page order.
pub const ANCHOR_SECTIONS: [SectionId; 3] =
    [SectionId::Hero, SectionId::Projects, SectionId::Skills];

const DEFAULT_TS: [f64; 3] = [0.0, 0.5, 1.0];

/// One measurement pass, in document coordinates (px from the page top).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorLayout {
    pub hero_y: f64,
    pub projects_y: f64,
    pub skills_y: f64,
    pub contact_bottom_y: f64,
    pub viewport_height: f64,
}

impl AnchorLayout {
    fn anchor_ys(&self) -> [f64; 3] {
        [self.hero_y, self.projects_y, self.skills_y]
    }
}

/// Vertical center of an element in document coordinates.
#[inline]
pub fn anchor_y(scroll_y: f64, rect_top: f64, rect_height: f64) -> f64 {
    scroll_y + rect_top + rect_height / 2.0
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionAnchor {
    pub normalized_t: f64,
    pub viewport_offset_px: f64,
}

#[derive(Clone, Debug)]
pub struct SectionAnchorCalibrator {
    anchor_ys: Option<[f64; 3]>,
    normalized: [f64; 3],
    offsets: [f64; 3],
    measure_gate: FrameGate,
    offset_gate: FrameGate,
}

impl Default for SectionAnchorCalibrator {
    fn default() -> Self {
        Self {
            anchor_ys: None,
            normalized: DEFAULT_TS,
            offsets: [0.0; 3],
            measure_gate: FrameGate::default(),
            offset_gate: FrameGate::default(),
        }
    }
}

impl SectionAnchorCalibrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a DOM remeasure; true when the caller must schedule a frame.
    pub fn request_measure(&mut self) -> bool {
        self.measure_gate.request()
    }

    /// Ask for a viewport-offset refresh; true when the caller must schedule.
    pub fn request_offsets(&mut self) -> bool {
        self.offset_gate.request()
    }

    pub fn cancel(&mut self) {
        self.measure_gate.cancel();
        self.offset_gate.cancel();
    }

    /// Apply a measurement. `None` means some anchor element was absent: the
    /// previous calibration is kept untouched. Returns whether it was applied.
    pub fn calibrate(&mut self, layout: Option<AnchorLayout>, scroll_y: f64) -> bool {
        self.measure_gate.take();
        let Some(layout) = layout else {
            log::debug!("[anchors] anchor elements missing, keeping last calibration");
            return false;
        };
        let ys = layout.anchor_ys();
        if ys.iter().any(|y| !y.is_finite()) || !layout.contact_bottom_y.is_finite() {
            return false;
        }
        let scroll_start = layout.hero_y;
        let scroll_end = layout.contact_bottom_y - layout.viewport_height;
        let range = (scroll_end - scroll_start).max(1.0);
        for (t, y) in self.normalized.iter_mut().zip(ys) {
            *t = ((y - scroll_start) / range).clamp(0.0, 1.0);
        }
        self.anchor_ys = Some(ys);
        self.apply_offsets(scroll_y);
        true
    }

    /// Cheap per-scroll-frame refresh from the last calibrated anchor Ys.
    pub fn update_offsets(&mut self, scroll_y: f64) -> bool {
        self.offset_gate.take();
        if self.anchor_ys.is_none() {
            return false;
        }
        self.apply_offsets(scroll_y);
        true
    }

    fn apply_offsets(&mut self, scroll_y: f64) {
        if let Some(ys) = self.anchor_ys {
            for (off, y) in self.offsets.iter_mut().zip(ys) {
                *off = y - scroll_y;
            }
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.anchor_ys.is_some()
    }

    pub fn anchor(&self, section: SectionId) -> Option<SectionAnchor> {
        let i = ANCHOR_SECTIONS.iter().position(|s| *s == section)?;
        Some(SectionAnchor {
            normalized_t: self.normalized[i],
            viewport_offset_px: self.offsets[i],
        })
    }

    pub fn normalized(&self) -> [f64; 3] {
        self.normalized
    }

    /// Map page progress onto the helix so each calibrated section anchor
    /// lands on its marker's fractional offset. Piecewise linear, clamped at
    /// both ends of the anchor span.
    pub fn helix_progress(&self, page_t: f64) -> f64 {
        let knots: [(f64, f64); 3] = [
            (self.normalized[0], SectionId::Hero.helix_fraction() as f64),
            (self.normalized[1], SectionId::Projects.helix_fraction() as f64),
            (self.normalized[2], SectionId::Skills.helix_fraction() as f64),
        ];
        let t = page_t.clamp(0.0, 1.0);
        if t <= knots[0].0 {
            return knots[0].1;
        }
        for pair in knots.windows(2) {
            let (t0, h0) = pair[0];
            let (t1, h1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                if span <= f64::EPSILON {
                    return h1;
                }
                return h0 + (h1 - h0) * (t - t0) / span;
            }
        }
        knots[2].1
    }
}
