use crate::constants::E2E_GLOBAL;
use crate::core::diagnostics::{DiagnosticsSink, NoopSink};
use crate::core::{CssRect, NavScene, SceneOptions, SectionId};
use crate::dom::{self, Listeners};
use crate::error::{NavError, NavResult};
use crate::events::{self, LayoutObserver};
use crate::frame::{self, FrameContext, FrameLoop};
use crate::navigate::Navigator;
use crate::observer::SectionObserver;
use crate::schedule::RafScheduler;
use crate::telemetry::{self, JsDiagnostics};
use anyhow::Context;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    console_log::init_with_level(level).ok();
    log::info!("helix-nav loaded");
    Ok(())
}

/// State shared by every listener, observer and the frame loop.
pub(crate) struct Shared {
    pub scene: RefCell<NavScene>,
    pub window: web::Window,
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    /// Receives pointer input; the canvas unless the host names another element.
    pub event_source: web::HtmlElement,
    pub navigator: Navigator,
    pub css_size: Cell<(f64, f64)>,
    /// Set when visibility comes from bounding rects instead of an observer.
    pub bounding_fallback: Cell<bool>,
    epoch: Instant,
}

impl Shared {
    pub fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    pub fn canvas_rect(&self) -> CssRect {
        let (width, height) = self.css_size.get();
        CssRect {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }
}

struct Mounted {
    shared: Rc<Shared>,
    frame_loop: FrameLoop,
    listeners: Listeners,
    scroll_raf: Rc<RafScheduler>,
    measure_raf: Rc<RafScheduler>,
    section_observer: Option<SectionObserver>,
    layout_observer: Option<LayoutObserver>,
}

impl Mounted {
    fn teardown(self) {
        self.frame_loop.stop();
        drop(self.listeners);
        self.scroll_raf.cancel();
        self.measure_raf.cancel();
        drop(self.section_observer);
        drop(self.layout_observer);
        self.shared.scene.borrow_mut().cancel_pending();
        dom::set_cursor(&self.shared.event_source, false);
        telemetry::clear_global(&self.shared.window);
        log::info!("[mount] unmounted");
    }
}

fn parse_options(options: &JsValue) -> NavResult<SceneOptions> {
    if options.is_undefined() || options.is_null() {
        return Ok(SceneOptions::default());
    }
    let text: String = js_sys::JSON::stringify(options)
        .map_err(|e| NavError::Js(format!("{e:?}")))?
        .into();
    SceneOptions::from_json(&text)
}

async fn mount_inner(
    canvas_id: &str,
    options: JsValue,
    on_navigate: Option<js_sys::Function>,
) -> anyhow::Result<Mounted> {
    let (window, document) = dom::window_document()?;
    let canvas: web::HtmlCanvasElement = dom::element_by_id(&document, canvas_id)?;
    let mut options = parse_options(&options).context("invalid mount options")?;
    options.deterministic |= dom::global_flag(&window, E2E_GLOBAL);
    let reduced_motion = options
        .reduced_motion
        .unwrap_or_else(|| dom::prefers_reduced_motion(&window));
    let event_source: web::HtmlElement = match &options.event_source_id {
        Some(id) => dom::element_by_id(&document, id)?,
        None => canvas.clone().into(),
    };

    let sink: Box<dyn DiagnosticsSink> = if options.diagnostics_enabled() {
        Box::new(JsDiagnostics::new(window.clone()))
    } else {
        Box::new(NoopSink)
    };
    log::info!(
        "[mount] #{} deterministic={} reduced_motion={}",
        canvas_id,
        options.deterministic,
        reduced_motion
    );
    let mut scene = NavScene::new(options, sink);

    let css_size = dom::sync_canvas_backing_size(&canvas);
    scene.resize(css_size.0, css_size.1);
    let sy = dom::scroll_y(&window);
    scene.on_scroll_frame(
        sy,
        dom::document_height(&document),
        dom::viewport_height(&window),
    );
    scene.settle_scroll();
    scene.on_measure(dom::measure_anchor_layout(&window, &document), sy);

    let gpu = frame::init_gpu(&canvas, scene.geometry()).await;

    let shared = Rc::new(Shared {
        scene: RefCell::new(scene),
        navigator: Navigator::new(window.clone(), document.clone(), reduced_motion, on_navigate),
        window,
        document,
        canvas,
        event_source,
        css_size: Cell::new(css_size),
        bounding_fallback: Cell::new(false),
        epoch: Instant::now(),
    });

    let scroll_raf = {
        let weak = Rc::downgrade(&shared);
        Rc::new(RafScheduler::new(move || {
            if let Some(shared) = weak.upgrade() {
                events::scroll::scroll_frame(&shared);
            }
        }))
    };
    let measure_raf = {
        let weak = Rc::downgrade(&shared);
        Rc::new(RafScheduler::new(move || {
            if let Some(shared) = weak.upgrade() {
                events::scroll::measure_frame(&shared);
            }
        }))
    };

    let section_observer = SectionObserver::new(&shared);
    if section_observer.is_none() {
        shared.bounding_fallback.set(true);
        events::scroll::scroll_frame(&shared);
    }

    let mut listeners = Listeners::default();
    listeners.extend(events::wire_pointer(&shared));
    listeners.extend(events::wire_scroll(&shared, &scroll_raf, &measure_raf));
    let layout_observer = LayoutObserver::new(&shared, &scroll_raf, &measure_raf);
    log::debug!("[mount] {} listeners attached", listeners.len());

    let frame_loop = FrameLoop::start(FrameContext::new(shared.clone(), gpu));

    Ok(Mounted {
        shared,
        frame_loop,
        listeners,
        scroll_raf,
        measure_raf,
        section_observer,
        layout_observer,
    })
}

/// Handle returned to the host page.
#[wasm_bindgen]
pub struct HelixNav {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl HelixNav {
    /// Attach the scene to the canvas with id `canvas_id`.
    pub async fn mount(
        canvas_id: String,
        options: JsValue,
        on_navigate: Option<js_sys::Function>,
    ) -> Result<HelixNav, JsValue> {
        match mount_inner(&canvas_id, options, on_navigate).await {
            Ok(mounted) => Ok(HelixNav {
                mounted: Some(mounted),
            }),
            Err(e) => {
                log::error!("[mount] {:#}", e);
                Err(JsValue::from_str(&format!("{e:#}")))
            }
        }
    }

    /// Navigate as if the marker for `section_id` had been clicked.
    #[wasm_bindgen(js_name = triggerMarkerClick)]
    pub fn trigger_marker_click(&self, section_id: &str) -> Result<(), JsValue> {
        let section =
            SectionId::from_str(section_id).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let Some(mounted) = &self.mounted else {
            return Err(JsValue::from_str("helix-nav is unmounted"));
        };
        let shared = &mounted.shared;
        shared.scene.borrow_mut().trigger_marker_click(section);
        shared.navigator.navigate(section);
        Ok(())
    }

    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> Option<String> {
        self.mounted
            .as_ref()
            .map(|m| m.shared.scene.borrow().active_section().as_str().to_string())
    }

    /// Detach every listener, observer and frame callback. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.teardown();
        }
    }
}

impl Drop for HelixNav {
    fn drop(&mut self) {
        self.unmount();
    }
}
