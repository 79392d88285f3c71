//! Worker-side entry point.
//!
//! The JS shim buffers messages that arrive before the wasm module has
//! initialized and hands them to [`worker_main`], which replays them in order
//! and then takes over `onmessage`.

use crate::bridge::{envelope, message_kind};
use crate::constants::{FIELD_CANVAS, FIELD_DATA, FIELD_HEIGHT, FIELD_WIDTH};
use crate::frame::{self, FrameContext, Runtime};
use app_core::{MessageKind, PhysicsScene, PointerUpdate, RapierWorld, Renderer};
use js_sys::{Array, Float32Array, Reflect};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[derive(Default)]
struct WorkerState {
    frame: Option<Rc<RefCell<FrameContext>>>,
    /// Pointer state received before the renderer came up.
    pending: Option<PointerUpdate>,
    has_surface: bool,
    stopped: bool,
}

impl WorkerState {
    fn apply_pointer(&mut self, update: PointerUpdate) {
        if self.stopped {
            return;
        }
        match self.frame.as_ref() {
            Some(f) => f.borrow_mut().runtime.apply(update),
            None => {
                self.pending = Some(match self.pending.take() {
                    Some(p) => p.merge(update),
                    None => update,
                });
            }
        }
    }

    fn stop(&mut self) {
        self.stopped = true;
        if let Some(f) = self.frame.as_ref() {
            f.borrow_mut().runtime.stop();
        }
    }
}

#[wasm_bindgen]
pub fn worker_main(early: Array) -> Result<(), JsValue> {
    let scope: web::DedicatedWorkerGlobalScope = js_sys::global().dyn_into()?;
    let state = Rc::new(RefCell::new(WorkerState::default()));

    let handler_state = state.clone();
    let handler_scope = scope.clone();
    let on_message = Closure::wrap(Box::new(move |ev: web::MessageEvent| {
        handle(&handler_scope, &handler_state, &ev.data());
    }) as Box<dyn FnMut(web::MessageEvent)>);
    scope.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    // lives as long as the worker
    on_message.forget();

    log::info!("[worker] started; replaying {} early message(s)", early.length());
    for data in early.iter() {
        handle(&scope, &state, &data);
    }
    Ok(())
}

fn handle(
    scope: &web::DedicatedWorkerGlobalScope,
    state: &Rc<RefCell<WorkerState>>,
    data: &JsValue,
) {
    match message_kind(data) {
        Some(MessageKind::Surface) => on_surface(scope, state, data),
        Some(MessageKind::Pointer) => {
            let words = Reflect::get(data, &JsValue::from_str(FIELD_DATA))
                .ok()
                .and_then(|d| d.dyn_into::<Float32Array>().ok())
                .map(|a| a.to_vec());
            match words.as_deref().and_then(PointerUpdate::from_words) {
                Some(update) => state.borrow_mut().apply_pointer(update),
                None => log::debug!("[worker] malformed pointer message"),
            }
        }
        Some(MessageKind::Terminate) => {
            log::info!("[worker] terminate requested");
            state.borrow_mut().stop();
        }
        Some(MessageKind::Ready) | None => log::debug!("[worker] ignoring message"),
    }
}

fn on_surface(
    scope: &web::DedicatedWorkerGlobalScope,
    state: &Rc<RefCell<WorkerState>>,
    data: &JsValue,
) {
    {
        let mut s = state.borrow_mut();
        if s.has_surface || s.stopped {
            log::warn!("[worker] surface already handled; ignoring");
            return;
        }
        s.has_surface = true;
    }
    let field = |k: &str| Reflect::get(data, &JsValue::from_str(k)).ok();
    let Some(canvas) = field(FIELD_CANVAS)
        .and_then(|c| c.dyn_into::<web::OffscreenCanvas>().ok())
    else {
        log::error!("[worker] surface message without an OffscreenCanvas");
        return;
    };
    let dim = |k: &str| field(k).and_then(|v| v.as_f64()).unwrap_or(1.0).max(1.0) as u32;
    let (width, height) = (dim(FIELD_WIDTH), dim(FIELD_HEIGHT));

    let scope = scope.clone();
    let state = state.clone();
    spawn_local(async move {
        let instance = wgpu::Instance::default();
        let target = wgpu::SurfaceTarget::OffscreenCanvas(canvas.clone());
        let surface = match instance.create_surface(target) {
            Ok(s) => s,
            Err(e) => {
                log::error!("[worker] surface creation failed: {:?}", e);
                return;
            }
        };
        let renderer = match Renderer::new(&instance, surface, width, height).await {
            Ok(r) => r,
            Err(e) => {
                log::error!("[worker] renderer init failed: {:?}", e);
                return;
            }
        };

        let ctx = {
            let mut s = state.borrow_mut();
            if s.stopped {
                log::info!("[worker] stopped before the renderer was ready");
                return;
            }
            let scene = PhysicsScene::new(RapierWorld::new(), StdRng::from_entropy());
            let mut runtime: Runtime = Runtime::new(scene, width, height);
            if let Some(p) = s.pending.take() {
                runtime.apply(p);
            }
            let ctx = Rc::new(RefCell::new(FrameContext {
                runtime,
                renderer,
                canvas,
                last_timestamp: None,
            }));
            s.frame = Some(ctx.clone());
            ctx
        };

        match envelope(MessageKind::Ready) {
            Ok(msg) => {
                if let Err(e) = scope.post_message(&msg) {
                    log::warn!("[worker] could not report ready: {:?}", e);
                }
            }
            Err(e) => log::warn!("[worker] could not build ready message: {:?}", e),
        }
        log::info!("[worker] ready at {}x{}", width, height);
        frame::start_loop(scope, ctx);
    });
}
