use crate::dom::{self, Listener, Listeners};
use crate::observer;
use crate::schedule::RafScheduler;
use crate::Shared;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Coalesced scroll work: progress, anchor offsets and, without an
/// IntersectionObserver, the bounding-rect visibility pass.
pub fn scroll_frame(shared: &Shared) {
    let sy = dom::scroll_y(&shared.window);
    let vh = dom::viewport_height(&shared.window);
    let doc_h = dom::document_height(&shared.document);
    let mut scene = shared.scene.borrow_mut();
    scene.on_scroll_frame(sy, doc_h, vh);
    scene.on_offsets(sy);
    if shared.bounding_fallback.get() {
        scene.observe_visibility(observer::bounding_ratios(&shared.document, vh));
    }
}

pub fn measure_frame(shared: &Shared) {
    let layout = dom::measure_anchor_layout(&shared.window, &shared.document);
    let sy = dom::scroll_y(&shared.window);
    shared.scene.borrow_mut().on_measure(layout, sy);
}

/// Canvas CSS size changed: backing store, then camera framing.
pub fn canvas_resized(shared: &Shared) {
    let (w, h) = dom::sync_canvas_backing_size(&shared.canvas);
    shared.css_size.set((w, h));
    shared.scene.borrow_mut().resize(w, h);
}

fn request_scroll(shared: &Shared, raf: &RafScheduler) {
    let mut scene = shared.scene.borrow_mut();
    let a = scene.request_scroll();
    let b = scene.request_offsets();
    if a || b {
        raf.schedule();
    }
}

fn request_measure(shared: &Shared, raf: &RafScheduler) {
    if shared.scene.borrow_mut().request_measure() {
        raf.schedule();
    }
}

pub fn wire_scroll(
    shared: &Rc<Shared>,
    scroll_raf: &Rc<RafScheduler>,
    measure_raf: &Rc<RafScheduler>,
) -> Listeners {
    let mut listeners = Listeners::default();
    let window: &web::EventTarget = shared.window.as_ref();

    {
        let shared = shared.clone();
        let scroll_raf = scroll_raf.clone();
        listeners.push(Listener::new(window, "scroll", true, move |_| {
            request_scroll(&shared, &scroll_raf);
        }));
    }
    {
        let shared = shared.clone();
        let scroll_raf = scroll_raf.clone();
        let measure_raf = measure_raf.clone();
        listeners.push(Listener::new(window, "resize", true, move |_| {
            canvas_resized(&shared);
            request_scroll(&shared, &scroll_raf);
            request_measure(&shared, &measure_raf);
        }));
    }
    {
        let shared = shared.clone();
        let measure_raf = measure_raf.clone();
        listeners.push(Listener::new(window, "load", true, move |_| {
            request_measure(&shared, &measure_raf);
        }));
    }

    remeasure_when_fonts_ready(shared, measure_raf);
    listeners
}

// Web fonts shift heading positions once they swap in.
fn remeasure_when_fonts_ready(shared: &Rc<Shared>, measure_raf: &Rc<RafScheduler>) {
    let Ok(ready) = shared.document.fonts().ready() else {
        return;
    };
    let shared: Weak<Shared> = Rc::downgrade(shared);
    let measure_raf: Weak<RafScheduler> = Rc::downgrade(measure_raf);
    spawn_local(async move {
        if JsFuture::from(ready).await.is_err() {
            return;
        }
        if let (Some(shared), Some(raf)) = (shared.upgrade(), measure_raf.upgrade()) {
            log::debug!("[anchors] fonts ready, remeasuring");
            request_measure(&shared, &raf);
        }
    });
}

/// Layout changes (content reflow, canvas size) without a window resize.
pub struct LayoutObserver {
    observer: web::ResizeObserver,
    _closure: Closure<dyn FnMut(js_sys::Array)>,
}

impl LayoutObserver {
    pub fn new(
        shared: &Rc<Shared>,
        scroll_raf: &Rc<RafScheduler>,
        measure_raf: &Rc<RafScheduler>,
    ) -> Option<Self> {
        let weak = Rc::downgrade(shared);
        let scroll_raf = Rc::downgrade(scroll_raf);
        let measure_raf = Rc::downgrade(measure_raf);
        let closure = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            canvas_resized(&shared);
            if let Some(raf) = scroll_raf.upgrade() {
                request_scroll(&shared, &raf);
            }
            if let Some(raf) = measure_raf.upgrade() {
                request_measure(&shared, &raf);
            }
        }) as Box<dyn FnMut(js_sys::Array)>);
        let observer = match web::ResizeObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(o) => o,
            Err(e) => {
                log::warn!("[layout] ResizeObserver unavailable: {:?}", e);
                return None;
            }
        };
        observer.observe(&shared.canvas);
        if let Some(root) = shared.document.document_element() {
            observer.observe(&root);
        }
        if let Some(body) = shared.document.body() {
            observer.observe(&body);
        }
        Some(Self {
            observer,
            _closure: closure,
        })
    }
}

impl Drop for LayoutObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
