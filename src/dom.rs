use crate::constants::MAX_DEVICE_PIXEL_RATIO;
use crate::core::anchors::{anchor_y, AnchorLayout};
use crate::error::{NavError, NavResult};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> NavResult<(web::Window, web::Document)> {
    let window = web::window().ok_or(NavError::NoWindow)?;
    let document = window.document().ok_or(NavError::NoDocument)?;
    Ok((window, document))
}

pub fn element_by_id<T: JsCast>(document: &web::Document, id: &str) -> NavResult<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| NavError::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| NavError::MissingElement(format!("{id} (wrong element type)")))
}

/// Resize the backing store to CSS size x DPR (capped). Returns the CSS size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    let dpr = web::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .clamp(1.0, MAX_DEVICE_PIXEL_RATIO);
    let w_px = (rect.width() * dpr) as u32;
    let h_px = (rect.height() * dpr) as u32;
    if canvas.width() != w_px.max(1) {
        canvas.set_width(w_px.max(1));
    }
    if canvas.height() != h_px.max(1) {
        canvas.set_height(h_px.max(1));
    }
    (rect.width(), rect.height())
}

pub fn scroll_y(window: &web::Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}

pub fn viewport_height(window: &web::Window) -> f64 {
    window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

pub fn document_height(document: &web::Document) -> f64 {
    document
        .document_element()
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0)
}

fn anchor_center(document: &web::Document, selector: &str, scroll_y: f64) -> Option<f64> {
    let el = document.query_selector(selector).ok()??;
    let r = el.get_bounding_client_rect();
    Some(anchor_y(scroll_y, r.top(), r.height()))
}

/// Heading anchors and the contact section's bottom, in document px.
/// `None` when any element is missing.
pub fn measure_anchor_layout(window: &web::Window, document: &web::Document) -> Option<AnchorLayout> {
    let sy = scroll_y(window);
    let hero_y = anchor_center(document, "#hero h1", sy)?;
    let projects_y = anchor_center(document, "#projects h2", sy)?;
    let skills_y = anchor_center(document, "#skills h2", sy)?;
    let contact = document.get_element_by_id("contact")?;
    let contact_bottom_y = sy + contact.get_bounding_client_rect().bottom();
    Some(AnchorLayout {
        hero_y,
        projects_y,
        skills_y,
        contact_bottom_y,
        viewport_height: viewport_height(window),
    })
}

pub fn prefers_reduced_motion(window: &web::Window) -> bool {
    window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

/// `window[name] === true`.
pub fn global_flag(window: &web::Window, name: &str) -> bool {
    js_sys::Reflect::get(window, &JsValue::from_str(name))
        .map(|v| v.as_bool() == Some(true))
        .unwrap_or(false)
}

pub fn set_cursor(element: &web::HtmlElement, pointer: bool) {
    let value = if pointer { "pointer" } else { "" };
    _ = element.style().set_property("cursor", value);
}

/// An event listener that is removed when dropped.
pub struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    capture: bool,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl Listener {
    pub fn new(
        target: &web::EventTarget,
        kind: &'static str,
        passive: bool,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Self {
        Self::with_options(target, kind, passive, false, handler)
    }

    pub fn with_options(
        target: &web::EventTarget,
        kind: &'static str,
        passive: bool,
        capture: bool,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(passive);
        opts.set_capture(capture);
        if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &opts,
        ) {
            log::warn!("[dom] addEventListener({}) failed: {:?}", kind, e);
        }
        Self {
            target: target.clone(),
            kind,
            capture,
            closure,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        _ = self.target.remove_event_listener_with_callback_and_bool(
            self.kind,
            self.closure.as_ref().unchecked_ref(),
            self.capture,
        );
    }
}

/// Owned set of listeners; dropping it detaches all of them.
#[derive(Default)]
pub struct Listeners(Vec<Listener>);

impl Listeners {
    pub fn push(&mut self, listener: Listener) {
        self.0.push(listener);
    }

    pub fn extend(&mut self, other: Listeners) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
