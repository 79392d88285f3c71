//! Browser host: binds a [`HostMount`] to a container element.
//!
//! The capability query runs on `spawn_local`; the mount stays empty until it
//! finishes. Sufficient devices get a canvas whose control is transferred to
//! a worker; insufficient devices get the static fallback.

use crate::bridge::{MessageSink, WebWorkerSpawner};
use crate::constants::{
    CANVAS_CLASS, HOST_ELEMENT_ID, SCENE_ATTR, SCENE_LIVE, SCENE_PLACEHOLDER, WORKER_SCRIPT_URL,
};
use crate::{capability, dom, fallback};
use app_core::{
    BridgeError, BridgeView, HostMount, HostState, HostView, PointerUpdate, Resolution,
    SurfaceHandoff, WorkerMessage,
};
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[derive(Clone, Debug)]
pub struct HostConfig {
    pub container_id: String,
    pub worker_url: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            container_id: HOST_ELEMENT_ID.to_string(),
            worker_url: WORKER_SCRIPT_URL.to_string(),
        }
    }
}

#[derive(Default)]
struct DomState {
    nodes: Vec<web::Element>,
    listeners: Vec<dom::Listener>,
    canvas: Option<web::HtmlCanvasElement>,
}

impl DomState {
    fn clear(&mut self) {
        self.listeners.clear();
        for n in self.nodes.drain(..) {
            n.remove();
        }
        self.canvas = None;
    }
}

pub struct WebHost {
    document: web::Document,
    container: web::Element,
    mount: RefCell<HostMount<WebWorkerSpawner>>,
    dom: RefCell<DomState>,
    last_ndc: Cell<Vec2>,
    unmounted: Cell<bool>,
}

impl WebHost {
    /// Create the host and start resolving capability in the background.
    pub fn mount(config: HostConfig) -> Result<Rc<Self>, JsValue> {
        let document =
            dom::window_document().ok_or_else(|| JsValue::from_str("no document available"))?;
        let container = document
            .get_element_by_id(&config.container_id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{}", config.container_id)))?;

        let host = Rc::new_cyclic(|weak: &Weak<WebHost>| {
            let weak = weak.clone();
            let sink: MessageSink = Rc::new(move |msg| {
                if let Some(h) = weak.upgrade() {
                    h.on_worker_message(msg);
                }
            });
            WebHost {
                document,
                container,
                mount: RefCell::new(HostMount::new(WebWorkerSpawner::new(
                    config.worker_url.clone(),
                    sink,
                ))),
                dom: RefCell::new(DomState::default()),
                last_ndc: Cell::new(Vec2::ZERO),
                unmounted: Cell::new(false),
            }
        });
        log::info!("[host] mounted into #{}", config.container_id);

        let weak = Rc::downgrade(&host);
        spawn_local(async move {
            let resolution = capability::resolve().await;
            if let Some(h) = weak.upgrade() {
                h.on_capability(resolution);
            }
        });
        Ok(host)
    }

    pub fn state(&self) -> HostState {
        self.mount.borrow().state()
    }

    fn on_capability(self: &Rc<Self>, resolution: Resolution) {
        if self.unmounted.get() {
            return;
        }
        let state = self
            .mount
            .borrow_mut()
            .on_capability(resolution, || self.acquire_surface());
        match state {
            HostState::Unresolved => {}
            HostState::Insufficient => {
                match fallback::render(&self.document, &self.container, &app_core::FALLBACK_IMAGE) {
                    Ok(nodes) => self.dom.borrow_mut().nodes.extend(nodes),
                    Err(e) => log::error!("[host] fallback render failed: {:?}", e),
                }
            }
            HostState::Sufficient => {
                if let Err(e) = self.bind_pointer() {
                    log::warn!("[host] pointer listeners unavailable: {:?}", e);
                }
            }
        }
        self.sync_view();
    }

    fn acquire_surface(&self) -> Result<SurfaceHandoff<web::OffscreenCanvas>, BridgeError> {
        let canvas: web::HtmlCanvasElement = dom::create_element(&self.document, "canvas")
            .map_err(|e| BridgeError::SurfaceTransfer(format!("{e:?}")))?;
        canvas.set_class_name(CANVAS_CLASS);
        self.container
            .append_child(&canvas)
            .map_err(|e| BridgeError::SurfaceTransfer(format!("{e:?}")))?;
        let (width, height) = dom::canvas_backing_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);
        let mut dom_state = self.dom.borrow_mut();
        dom_state.nodes.push(canvas.clone().into());
        dom_state.canvas = Some(canvas.clone());
        let offscreen = canvas
            .transfer_control_to_offscreen()
            .map_err(|e| BridgeError::SurfaceTransfer(format!("{e:?}")))?;
        Ok(SurfaceHandoff {
            surface: offscreen,
            width,
            height,
            pixel_ratio: app_core::clamp_pixel_ratio(dom::device_pixel_ratio()),
        })
    }

    fn bind_pointer(self: &Rc<Self>) -> Result<(), JsValue> {
        let Some(canvas) = self.dom.borrow().canvas.clone() else {
            return Ok(());
        };
        let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let mut listeners = Vec::with_capacity(3);

        let weak = Rc::downgrade(self);
        let c = canvas.clone();
        listeners.push(dom::Listener::new(&canvas, "pointermove", move |ev| {
            if let (Some(h), Some(ev)) = (weak.upgrade(), ev.dyn_ref::<web::MouseEvent>()) {
                h.forward(dom::pointer_ndc(ev, &c), 0, &c);
            }
        })?);

        let weak = Rc::downgrade(self);
        let c = canvas.clone();
        listeners.push(dom::Listener::new(&canvas, "click", move |ev| {
            if let (Some(h), Some(ev)) = (weak.upgrade(), ev.dyn_ref::<web::MouseEvent>()) {
                h.forward(dom::pointer_ndc(ev, &c), 1, &c);
            }
        })?);

        let weak = Rc::downgrade(self);
        let c = canvas;
        listeners.push(dom::Listener::new(&window, "resize", move |_| {
            if let Some(h) = weak.upgrade() {
                h.forward(h.last_ndc.get(), 0, &c);
            }
        })?);

        self.dom.borrow_mut().listeners.extend(listeners);
        Ok(())
    }

    fn forward(&self, ndc: Vec2, clicks: u32, canvas: &web::HtmlCanvasElement) {
        self.last_ndc.set(ndc);
        let (width, height) = dom::canvas_backing_size(canvas);
        self.mount.borrow_mut().forward_pointer(PointerUpdate {
            ndc,
            clicks,
            width,
            height,
        });
    }

    fn on_worker_message(&self, message: WorkerMessage) {
        self.mount.borrow_mut().on_worker_message(message);
        self.sync_view();
    }

    /// Mirror the bridge view onto the container for styling hooks.
    fn sync_view(&self) {
        let scene = match self.mount.borrow().view() {
            HostView::Animation(BridgeView::Placeholder(_)) => Some(SCENE_PLACEHOLDER),
            HostView::Animation(BridgeView::Live) => Some(SCENE_LIVE),
            HostView::Nothing | HostView::Fallback(_) => None,
        };
        let result = match scene {
            Some(v) => self.container.set_attribute(SCENE_ATTR, v),
            None => self.container.remove_attribute(SCENE_ATTR),
        };
        if let Err(e) = result {
            log::debug!("[host] could not update {}: {:?}", SCENE_ATTR, e);
        }
    }

    /// Terminate the worker and remove everything this host added.
    pub fn unmount(&self) {
        if self.unmounted.replace(true) {
            return;
        }
        self.mount.borrow_mut().unmount();
        self.dom.borrow_mut().clear();
        _ = self.container.remove_attribute(SCENE_ATTR);
        log::info!("[host] unmounted");
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        self.unmount();
    }
}
