use crate::core::active::{focus_band_ratio, FOCUS_ROOT_MARGIN, OBSERVER_THRESHOLDS};
use crate::core::SectionId;
use crate::Shared;
use std::rc::{Rc, Weak};
use std::str::FromStr;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Sections tracked for the active highlight.
pub const OBSERVED_SECTIONS: [SectionId; 3] =
    [SectionId::Hero, SectionId::Projects, SectionId::Skills];

/// IntersectionObserver over the observed sections. Disconnects on drop.
pub struct SectionObserver {
    observer: web::IntersectionObserver,
    _closure: Closure<dyn FnMut(js_sys::Array)>,
}

impl SectionObserver {
    /// `None` when the browser cannot construct an observer; callers then
    /// poll [`bounding_ratios`] per scroll frame instead.
    pub fn new(shared: &Rc<Shared>) -> Option<Self> {
        let weak: Weak<Shared> = Rc::downgrade(shared);
        let closure = Closure::wrap(Box::new(move |entries: js_sys::Array| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let batch: Vec<(SectionId, f64)> = entries
                .iter()
                .filter_map(|e| e.dyn_into::<web::IntersectionObserverEntry>().ok())
                .filter_map(|e| {
                    let id = SectionId::from_str(&e.target().id()).ok()?;
                    Some((id, e.intersection_ratio()))
                })
                .collect();
            shared.scene.borrow_mut().observe_visibility(batch);
        }) as Box<dyn FnMut(js_sys::Array)>);

        let init = web::IntersectionObserverInit::new();
        init.set_root_margin(FOCUS_ROOT_MARGIN);
        let thresholds: js_sys::Array = OBSERVER_THRESHOLDS
            .iter()
            .map(|t| JsValue::from_f64(*t))
            .collect();
        init.set_threshold(&thresholds);

        let observer = match web::IntersectionObserver::new_with_options(
            closure.as_ref().unchecked_ref(),
            &init,
        ) {
            Ok(o) => o,
            Err(e) => {
                log::warn!("[active] IntersectionObserver unavailable: {:?}", e);
                return None;
            }
        };
        for section in OBSERVED_SECTIONS {
            match shared.document.get_element_by_id(section.as_str()) {
                Some(el) => observer.observe(&el),
                None => log::debug!("[active] no element #{}", section),
            }
        }
        Some(Self {
            observer,
            _closure: closure,
        })
    }
}

impl Drop for SectionObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Focus-band visibility ratios computed from bounding rects.
pub fn bounding_ratios(document: &web::Document, viewport_height: f64) -> Vec<(SectionId, f64)> {
    OBSERVED_SECTIONS
        .iter()
        .filter_map(|s| {
            let el = document.get_element_by_id(s.as_str())?;
            let r = el.get_bounding_client_rect();
            Some((*s, focus_band_ratio(r.top(), r.height(), viewport_height)))
        })
        .collect()
}
