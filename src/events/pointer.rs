use crate::dom::{self, Listener, Listeners};
use crate::Shared;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

const FALLBACK_KINDS: [&str; 3] = ["pointerdown", "mousedown", "click"];

/// Client coordinates relative to the canvas' bounding rect.
#[inline]
fn canvas_local(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (
        ev.client_x() as f64 - rect.left(),
        ev.client_y() as f64 - rect.top(),
    )
}

/// Event source first, then canvas, then window, without duplicates.
fn fallback_targets(shared: &Shared) -> Vec<web::EventTarget> {
    let mut targets: Vec<web::EventTarget> = Vec::with_capacity(3);
    let source: &web::EventTarget = shared.event_source.as_ref();
    let canvas: &web::EventTarget = shared.canvas.as_ref();
    targets.push(source.clone());
    if source != canvas {
        targets.push(canvas.clone());
    }
    targets.push(shared.window.clone().into());
    targets
}

/// Hover, precise hits and the distance fallback. The precise listeners
/// (`pointerdown`, then `click`) are attached ahead of the fallback ones so
/// their stamp is visible to them for the same event.
pub fn wire_pointer(shared: &Rc<Shared>) -> Listeners {
    let mut listeners = Listeners::default();
    let source: web::EventTarget = shared.event_source.clone().into();

    {
        let shared = shared.clone();
        listeners.push(Listener::new(&source, "pointermove", true, move |ev| {
            let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
                return;
            };
            let (x, y) = canvas_local(ev, &shared.canvas);
            let rect = shared.canvas_rect();
            let hovered = shared.scene.borrow_mut().pointer_move(x, y, &rect);
            dom::set_cursor(&shared.event_source, hovered.is_some());
        }));
    }
    {
        let shared = shared.clone();
        listeners.push(Listener::new(&source, "pointerleave", true, move |_| {
            shared.scene.borrow_mut().pointer_leave();
            dom::set_cursor(&shared.event_source, false);
        }));
    }
    {
        let shared = shared.clone();
        listeners.push(Listener::new(&source, "pointerdown", true, move |ev| {
            let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
                return;
            };
            let (x, y) = canvas_local(ev, &shared.canvas);
            let rect = shared.canvas_rect();
            let now = shared.now_ms();
            let hit = shared.scene.borrow_mut().precise_pointer(x, y, &rect, now);
            if let Some(section) = hit {
                shared.navigator.navigate(section);
            }
        }));
    }
    {
        let shared = shared.clone();
        listeners.push(Listener::new(&source, "click", true, move |ev| {
            let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
                return;
            };
            let (x, y) = canvas_local(ev, &shared.canvas);
            let rect = shared.canvas_rect();
            let now = shared.now_ms();
            shared.scene.borrow_mut().precise_click(x, y, &rect, now);
        }));
    }

    // One gesture bubbles through several targets; handle each event once.
    let last_seen: Rc<Cell<Option<(f64, u8)>>> = Rc::new(Cell::new(None));
    for target in fallback_targets(shared) {
        for (kind_idx, kind) in FALLBACK_KINDS.into_iter().enumerate() {
            let shared = shared.clone();
            let last_seen = last_seen.clone();
            listeners.push(Listener::new(&target, kind, true, move |ev| {
                let key = (ev.time_stamp(), kind_idx as u8);
                if last_seen.get() == Some(key) {
                    return;
                }
                last_seen.set(Some(key));
                let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
                    return;
                };
                let (x, y) = canvas_local(ev, &shared.canvas);
                let now = shared.now_ms();
                let hit = shared.scene.borrow_mut().fallback_pointer(x, y, now);
                if let Some(section) = hit {
                    shared.navigator.navigate(section);
                }
            }));
        }
    }
    listeners
}
