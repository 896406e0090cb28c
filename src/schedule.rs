use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct RafInner {
    id: Cell<Option<i32>>,
    closure: RefCell<Option<Closure<dyn FnMut()>>>,
}

/// One pending animation frame at a time for a fixed callback. Repeated
/// `schedule` calls before the frame fires are coalesced.
pub struct RafScheduler {
    inner: Rc<RafInner>,
}

impl RafScheduler {
    pub fn new(mut callback: impl FnMut() + 'static) -> Self {
        let inner = Rc::new(RafInner {
            id: Cell::new(None),
            closure: RefCell::new(None),
        });
        let weak: Weak<RafInner> = Rc::downgrade(&inner);
        *inner.closure.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.id.set(None);
            }
            callback();
        }) as Box<dyn FnMut()>));
        Self { inner }
    }

    pub fn schedule(&self) {
        if self.inner.id.get().is_some() {
            return;
        }
        let Some(window) = web::window() else {
            return;
        };
        let closure = self.inner.closure.borrow();
        if let Some(cb) = closure.as_ref() {
            match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => self.inner.id.set(Some(id)),
                Err(e) => log::warn!("[raf] request failed: {:?}", e),
            }
        }
    }

    pub fn cancel(&self) {
        if let Some(id) = self.inner.id.take() {
            if let Some(window) = web::window() {
                _ = window.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for RafScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
