//! Web Worker realization of the background context.
//!
//! One module worker per mount. The `OffscreenCanvas` is moved into the
//! worker through the transfer list; afterwards the page can no longer draw
//! into it.

use crate::constants::{
    FIELD_CANVAS, FIELD_DATA, FIELD_DPR, FIELD_HEIGHT, FIELD_KIND, FIELD_WIDTH,
};
use app_core::{
    BackgroundContext, BridgeError, ContextSpawner, HostMessage, MessageKind, WorkerMessage,
};
use js_sys::{Array, Float32Array, Object, Reflect};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub type MessageSink = Rc<dyn Fn(WorkerMessage)>;

pub struct WebWorkerSpawner {
    script_url: String,
    sink: MessageSink,
}

impl WebWorkerSpawner {
    pub fn new(script_url: impl Into<String>, sink: MessageSink) -> Self {
        Self {
            script_url: script_url.into(),
            sink,
        }
    }
}

impl ContextSpawner for WebWorkerSpawner {
    type Context = WorkerContext;

    fn spawn(&mut self) -> Result<WorkerContext, BridgeError> {
        let opts = web::WorkerOptions::new();
        opts.set_type(web::WorkerType::Module);
        let worker = web::Worker::new_with_options(&self.script_url, &opts)
            .map_err(|e| BridgeError::ContextCreation(format!("{e:?}")))?;

        let sink = self.sink.clone();
        let on_message = Closure::wrap(Box::new(move |ev: web::MessageEvent| {
            match decode_worker_message(&ev.data()) {
                Some(msg) => sink(msg),
                None => log::debug!("[bridge] ignoring unknown worker message"),
            }
        }) as Box<dyn FnMut(web::MessageEvent)>);
        worker.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        log::info!("[bridge] worker spawned from {}", self.script_url);

        Ok(WorkerContext {
            worker,
            _on_message: on_message,
            terminated: false,
        })
    }
}

pub struct WorkerContext {
    worker: web::Worker,
    _on_message: Closure<dyn FnMut(web::MessageEvent)>,
    terminated: bool,
}

impl BackgroundContext for WorkerContext {
    type Surface = web::OffscreenCanvas;

    fn post(&mut self, message: HostMessage<web::OffscreenCanvas>) -> Result<(), BridgeError> {
        if self.terminated {
            return Err(BridgeError::Disconnected);
        }
        match message {
            HostMessage::Surface(handoff) => {
                let obj = envelope(MessageKind::Surface)
                    .and_then(|o| {
                        set(&o, FIELD_CANVAS, &handoff.surface)?;
                        set(&o, FIELD_WIDTH, &JsValue::from(handoff.width))?;
                        set(&o, FIELD_HEIGHT, &JsValue::from(handoff.height))?;
                        set(&o, FIELD_DPR, &JsValue::from(handoff.pixel_ratio))?;
                        Ok(o)
                    })
                    .map_err(|e| BridgeError::SurfaceTransfer(format!("{e:?}")))?;
                let transfer = Array::of1(&handoff.surface);
                self.worker
                    .post_message_with_transfer(&obj, &transfer)
                    .map_err(|e| BridgeError::SurfaceTransfer(format!("{e:?}")))
            }
            HostMessage::Pointer(update) => {
                let data = Float32Array::from(&update.to_words()[..]);
                let obj = envelope(MessageKind::Pointer)
                    .and_then(|o| {
                        set(&o, FIELD_DATA, &data)?;
                        Ok(o)
                    })
                    .map_err(|_| BridgeError::Disconnected)?;
                self.worker
                    .post_message(&obj)
                    .map_err(|_| BridgeError::Disconnected)
            }
            HostMessage::Terminate => {
                let obj = envelope(MessageKind::Terminate).map_err(|_| BridgeError::Disconnected)?;
                self.worker
                    .post_message(&obj)
                    .map_err(|_| BridgeError::Disconnected)
            }
        }
    }

    fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;
        self.worker.set_onmessage(None);
        self.worker.terminate();
    }
}

fn set(obj: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(obj, &JsValue::from_str(key), value).map(|_| ())
}

/// `{ kind: <name> }`, the shape shared by every message on the channel.
pub fn envelope(kind: MessageKind) -> Result<Object, JsValue> {
    let obj = Object::new();
    set(&obj, FIELD_KIND, &JsValue::from_str(kind.as_str()))?;
    Ok(obj)
}

/// Read the `kind` discriminant of an incoming message.
pub fn message_kind(data: &JsValue) -> Option<MessageKind> {
    Reflect::get(data, &JsValue::from_str(FIELD_KIND))
        .ok()
        .and_then(|k| k.as_string())
        .and_then(|k| MessageKind::parse(&k))
}

fn decode_worker_message(data: &JsValue) -> Option<WorkerMessage> {
    match message_kind(data)? {
        MessageKind::Ready => Some(WorkerMessage::Ready),
        _ => None,
    }
}
