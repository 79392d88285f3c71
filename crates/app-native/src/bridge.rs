//! Thread-backed background context: the native counterpart of the web
//! worker. The surface moves into the thread once; pointer updates and the
//! terminate request follow over an mpsc channel.

use crate::worker;
use crate::AppEvent;
use app_core::{BackgroundContext, BridgeError, ContextSpawner, HostMessage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use winit::event_loop::EventLoopProxy;

/// Window surface plus the instance it was created from; the renderer must
/// request its adapter from the same instance.
pub struct NativeSurface {
    pub instance: wgpu::Instance,
    pub surface: wgpu::Surface<'static>,
}

impl std::fmt::Debug for NativeSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeSurface").finish_non_exhaustive()
    }
}

pub struct ThreadSpawner {
    proxy: EventLoopProxy<AppEvent>,
    generation: u64,
}

impl ThreadSpawner {
    pub fn new(proxy: EventLoopProxy<AppEvent>, generation: u64) -> Self {
        Self { proxy, generation }
    }
}

impl ContextSpawner for ThreadSpawner {
    type Context = ThreadContext;

    fn spawn(&mut self) -> Result<ThreadContext, BridgeError> {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let proxy = self.proxy.clone();
        let generation = self.generation;
        let handle = thread::Builder::new()
            .name(format!("render-worker-{generation}"))
            .spawn(move || worker::run(rx, thread_stop, proxy, generation))
            .map_err(|e| BridgeError::ContextCreation(e.to_string()))?;
        Ok(ThreadContext {
            tx: Some(tx),
            stop,
            handle: Some(handle),
        })
    }
}

pub struct ThreadContext {
    tx: Option<Sender<HostMessage<NativeSurface>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundContext for ThreadContext {
    type Surface = NativeSurface;

    fn post(&mut self, message: HostMessage<NativeSurface>) -> Result<(), BridgeError> {
        let tx = self.tx.as_ref().ok_or(BridgeError::Disconnected)?;
        tx.send(message).map_err(|_| BridgeError::Disconnected)
    }

    fn terminate(&mut self) {
        self.stop.store(true, Ordering::Release);
        // closing the channel wakes a thread still waiting for its surface
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("[bridge] render thread panicked");
            }
        }
    }
}

impl Drop for ThreadContext {
    fn drop(&mut self) {
        self.terminate();
    }
}
