use crate::input;
use app_core::{RapierWorld, Renderer, WorkerRuntime};
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type Runtime = WorkerRuntime<RapierWorld, StdRng>;

/// Everything the worker owns once the surface has arrived.
pub struct FrameContext {
    pub runtime: Runtime,
    pub renderer: Renderer,
    pub canvas: web::OffscreenCanvas,
    pub last_timestamp: Option<f64>,
}

impl FrameContext {
    /// One animation frame. Returns `false` once the runtime has stopped.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        let delta = input::frame_delta(self.last_timestamp, timestamp_ms);
        self.last_timestamp = Some(timestamp_ms);

        let Some(frame) = self.runtime.tick(delta) else {
            return false;
        };

        let (w, h) = self.runtime.size();
        if (w, h) != self.renderer.size() && w > 0 && h > 0 {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            self.renderer.resize(w, h);
        }

        match self.renderer.render(&frame, self.runtime.camera()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[worker] surface lost; reconfiguring");
                self.renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => log::debug!("[worker] frame timeout"),
            Err(e) => log::error!("[worker] render error: {:?}", e),
        }
        true
    }
}

/// Drive `ctx` from the worker's animation-frame callback until it stops.
pub fn start_loop(scope: web::DedicatedWorkerGlobalScope, ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let scope_tick = scope.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        if !ctx.borrow_mut().frame(ts) {
            // breaks the closure's self-reference
            tick_clone.borrow_mut().take();
            log::info!("[worker] frame loop finished");
            return;
        }
        if let Some(cb) = tick_clone.borrow().as_ref() {
            _ = scope_tick.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(cb) = tick.borrow().as_ref() {
        _ = scope.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
