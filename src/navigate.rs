use crate::core::SectionId;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Turns a resolved section id into page navigation: the host's callback
/// when one was supplied, otherwise a (smooth) scroll.
pub struct Navigator {
    window: web::Window,
    document: web::Document,
    reduced_motion: bool,
    host_callback: Option<js_sys::Function>,
}

impl Navigator {
    pub fn new(
        window: web::Window,
        document: web::Document,
        reduced_motion: bool,
        host_callback: Option<js_sys::Function>,
    ) -> Self {
        Self {
            window,
            document,
            reduced_motion,
            host_callback,
        }
    }

    fn behavior(&self) -> web::ScrollBehavior {
        if self.reduced_motion {
            web::ScrollBehavior::Auto
        } else {
            web::ScrollBehavior::Smooth
        }
    }

    pub fn navigate(&self, section: SectionId) {
        if let Some(cb) = &self.host_callback {
            if let Err(e) = cb.call1(&JsValue::NULL, &JsValue::from_str(section.as_str())) {
                log::warn!("[nav] host callback threw: {:?}", e);
            }
            return;
        }
        match section {
            SectionId::Hero => {
                let opts = web::ScrollToOptions::new();
                opts.set_top(0.0);
                opts.set_behavior(self.behavior());
                self.window.scroll_to_with_scroll_to_options(&opts);
            }
            other => match self.document.get_element_by_id(other.as_str()) {
                Some(el) => {
                    let opts = web::ScrollIntoViewOptions::new();
                    opts.set_behavior(self.behavior());
                    el.scroll_into_view_with_scroll_into_view_options(&opts);
                }
                None => log::warn!("[nav] no element #{}", other),
            },
        }
    }
}
