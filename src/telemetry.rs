//! Publishes diagnostics to a page global so automated checks can read them.

use crate::constants::DEBUG_GLOBAL;
use crate::core::diagnostics::{DiagEvent, DiagnosticsSink, DiagnosticsState};
use wasm_bindgen::JsValue;
use web_sys as web;

pub struct JsDiagnostics {
    window: web::Window,
    state: DiagnosticsState,
    dirty: bool,
}

impl JsDiagnostics {
    pub fn new(window: web::Window) -> Self {
        Self {
            window,
            state: DiagnosticsState::default(),
            dirty: true,
        }
    }

    fn publish(&self) -> Result<(), JsValue> {
        let text = serde_json::to_string(&self.state)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let value = js_sys::JSON::parse(&text)?;
        js_sys::Reflect::set(&self.window, &JsValue::from_str(DEBUG_GLOBAL), &value)?;
        Ok(())
    }
}

impl DiagnosticsSink for JsDiagnostics {
    fn record(&mut self, event: DiagEvent) {
        self.state.apply(event);
        self.dirty = true;
    }

    fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        match self.publish() {
            Ok(()) => self.dirty = false,
            Err(e) => log::warn!("[diag] publish failed: {:?}", e),
        }
    }
}

pub fn clear_global(window: &web::Window) {
    _ = js_sys::Reflect::delete_property(window, &JsValue::from_str(DEBUG_GLOBAL));
}
