use crate::core::FrameInput;
use crate::render;
use crate::Shared;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub shared: Rc<Shared>,
    pub gpu: Option<render::GpuState>,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn new(shared: Rc<Shared>, gpu: Option<render::GpuState>) -> Self {
        Self {
            shared,
            gpu,
            last_instant: Instant::now(),
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f64();
        self.last_instant = now;

        let rect = self.shared.canvas_rect();
        let mut scene = self.shared.scene.borrow_mut();
        let output = scene.frame(FrameInput {
            dt_sec,
            now_sec: self.shared.now_ms() / 1000.0,
            rect,
        });

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        gpu.resize_if_needed(self.shared.canvas.width(), self.shared.canvas.height());
        match gpu.render(&output, scene.geometry(), scene.instances()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("[gpu] surface lost, reconfiguring");
                gpu.reconfigure();
            }
            Err(e) => log::warn!("[gpu] frame skipped: {:?}", e),
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    geometry: &crate::core::HelixGeometry,
) -> Option<render::GpuState> {
    match render::GpuState::new(canvas, geometry).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// requestAnimationFrame loop that can be stopped from outside a tick.
pub struct FrameLoop {
    running: Rc<Cell<bool>>,
    raf_id: Rc<Cell<Option<i32>>>,
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl FrameLoop {
    pub fn start(frame_ctx: FrameContext) -> Self {
        let running = Rc::new(Cell::new(true));
        let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

        let tick_weak = Rc::downgrade(&tick);
        let running_tick = running.clone();
        let raf_id_tick = raf_id.clone();
        let mut frame_ctx = frame_ctx;
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            raf_id_tick.set(None);
            if !running_tick.get() {
                return;
            }
            frame_ctx.frame();
            if let Some(tick) = tick_weak.upgrade() {
                raf_id_tick.set(request_frame(&tick));
            }
        }) as Box<dyn FnMut()>));
        raf_id.set(request_frame(&tick));

        Self {
            running,
            raf_id,
            tick,
        }
    }

    pub fn stop(&self) {
        self.running.set(false);
        if let Some(id) = self.raf_id.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        self.tick.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(tick: &RefCell<Option<Closure<dyn FnMut()>>>) -> Option<i32> {
    let w = web::window()?;
    let tick = tick.borrow();
    let cb = tick.as_ref()?;
    w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}
