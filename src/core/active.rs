//! Which section is "in focus", from viewport intersection ratios.

use super::section::SectionId;
use fnv::FnvHashMap;

/// A challenger must beat this ratio before it can take focus.
pub const MIN_ACTIVE_RATIO: f64 = 0.1;
/// The observed window is the viewport minus this fraction at top and bottom.
pub const FOCUS_BAND_MARGIN: f64 = 0.2;
pub const FOCUS_ROOT_MARGIN: &str = "-20% 0px -20% 0px";
pub const OBSERVER_THRESHOLDS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Intersection ratio of an element against the central focus band, matching
/// what an IntersectionObserver with [`FOCUS_ROOT_MARGIN`] reports.
pub fn focus_band_ratio(rect_top: f64, rect_height: f64, viewport_height: f64) -> f64 {
    if !(rect_height > 0.0) || !(viewport_height > 0.0) {
        return 0.0;
    }
    let band_top = viewport_height * FOCUS_BAND_MARGIN;
    let band_bottom = viewport_height * (1.0 - FOCUS_BAND_MARGIN);
    let top = rect_top.max(band_top);
    let bottom = (rect_top + rect_height).min(band_bottom);
    ((bottom - top).max(0.0) / rect_height).clamp(0.0, 1.0)
}

#[derive(Clone, Debug)]
pub struct ActiveSectionDetector {
    order: Vec<SectionId>,
    ratios: FnvHashMap<SectionId, f64>,
    active: SectionId,
}

impl ActiveSectionDetector {
    /// `order` must not be empty; the first id is the initial active section.
    pub fn new(order: &[SectionId]) -> Self {
        let order = if order.is_empty() {
            vec![SectionId::Hero]
        } else {
            order.to_vec()
        };
        let ratios = order.iter().map(|id| (*id, 0.0)).collect();
        Self {
            active: order[0],
            order,
            ratios,
        }
    }

    pub fn active(&self) -> SectionId {
        self.active
    }

    pub fn order(&self) -> &[SectionId] {
        &self.order
    }

    pub fn ratio(&self, id: SectionId) -> f64 {
        self.ratios.get(&id).copied().unwrap_or(0.0)
    }

    /// Record a batch of `(id, ratio)` observations and re-evaluate. Returns
    /// the new active id when it changed.
    pub fn observe<I>(&mut self, batch: I) -> Option<SectionId>
    where
        I: IntoIterator<Item = (SectionId, f64)>,
    {
        for (id, ratio) in batch {
            if let Some(slot) = self.ratios.get_mut(&id) {
                *slot = if ratio.is_finite() { ratio } else { 0.0 };
            }
        }
        // Ties keep the earlier section in page order.
        let mut max_id = self.order[0];
        let mut max_ratio = self.ratio(max_id);
        for id in &self.order {
            let r = self.ratio(*id);
            if r > max_ratio {
                max_ratio = r;
                max_id = *id;
            }
        }
        if max_ratio > MIN_ACTIVE_RATIO && max_id != self.active {
            log::debug!("[active] {} -> {} ({:.2})", self.active, max_id, max_ratio);
            self.active = max_id;
            return Some(max_id);
        }
        None
    }
}
