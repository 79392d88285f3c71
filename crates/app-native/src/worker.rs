//! Render thread body. Mirrors the web worker: wait for the surface, bring
//! up the renderer, report `Ready`, then tick until told to stop.

use crate::bridge::NativeSurface;
use crate::AppEvent;
use app_core::{
    HostMessage, PhysicsScene, PointerUpdate, RapierWorld, Renderer, SurfaceHandoff, WorkerMessage,
    WorkerRuntime,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Instant;
use winit::event_loop::EventLoopProxy;

type Runtime = WorkerRuntime<RapierWorld, StdRng>;

pub fn run(
    rx: Receiver<HostMessage<NativeSurface>>,
    stop: Arc<AtomicBool>,
    proxy: EventLoopProxy<AppEvent>,
    generation: u64,
) {
    let Some((handoff, pending)) = wait_for_surface(&rx) else {
        log::info!("[worker] stopped before a surface arrived");
        return;
    };
    let SurfaceHandoff {
        surface: NativeSurface { instance, surface },
        width,
        height,
        ..
    } = handoff;
    let mut renderer = match pollster::block_on(Renderer::new(&instance, surface, width, height)) {
        Ok(r) => r,
        Err(e) => {
            log::error!("[worker] renderer init failed: {:?}", e);
            return;
        }
    };
    if stop.load(Ordering::Acquire) {
        return;
    }

    let scene = PhysicsScene::new(RapierWorld::new(), StdRng::from_entropy());
    let mut runtime = Runtime::new(scene, width, height);
    if let Some(p) = pending {
        runtime.apply(p);
    }
    if proxy.send_event(AppEvent::Worker(generation, WorkerMessage::Ready)).is_err() {
        log::warn!("[worker] event loop closed before ready");
        return;
    }
    log::info!("[worker] ready at {}x{}", width, height);

    let mut last = Instant::now();
    while !stop.load(Ordering::Acquire) {
        if !drain(&rx, &mut runtime) {
            runtime.stop();
        }
        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f32();
        last = now;

        let Some(frame) = runtime.tick(delta) else {
            break;
        };
        let (w, h) = runtime.size();
        if (w, h) != renderer.size() {
            renderer.resize(w, h);
        }
        // Fifo presentation paces this loop to the display.
        match renderer.render(&frame, runtime.camera()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[worker] surface lost; reconfiguring");
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => log::debug!("[worker] frame timeout"),
            Err(e) => {
                log::error!("[worker] render error: {:?}", e);
                break;
            }
        }
    }
    log::info!("[worker] render thread finished");
}

/// Block until the surface handoff. Pointer updates seen first are merged.
fn wait_for_surface(
    rx: &Receiver<HostMessage<NativeSurface>>,
) -> Option<(SurfaceHandoff<NativeSurface>, Option<PointerUpdate>)> {
    let mut pending: Option<PointerUpdate> = None;
    loop {
        match rx.recv().ok()? {
            HostMessage::Surface(handoff) => return Some((handoff, pending)),
            HostMessage::Pointer(update) => {
                pending = Some(match pending {
                    Some(p) => p.merge(update),
                    None => update,
                });
            }
            HostMessage::Terminate => return None,
        }
    }
}

/// Apply queued messages. Returns `false` when the host asked to stop or
/// hung up.
fn drain(rx: &Receiver<HostMessage<NativeSurface>>, runtime: &mut Runtime) -> bool {
    loop {
        match rx.try_recv() {
            Ok(HostMessage::Pointer(update)) => runtime.apply(update),
            Ok(HostMessage::Surface(_)) => log::warn!("[worker] surface already handled; ignoring"),
            Ok(HostMessage::Terminate) | Err(TryRecvError::Disconnected) => return false,
            Err(TryRecvError::Empty) => return true,
        }
    }
}
