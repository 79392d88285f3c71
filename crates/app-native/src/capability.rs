//! Desktop capability probe. The adapter query blocks, so it runs on its own
//! thread and reports back through the event loop.

use crate::AppEvent;
use app_core::render::probe_tier;
use app_core::{Resolution, SESSION_GATE};
use std::thread;
use winit::event_loop::EventLoopProxy;

pub fn resolve_blocking() -> Resolution {
    pollster::block_on(SESSION_GATE.resolve(|| async {
        let instance = wgpu::Instance::default();
        probe_tier(&instance).await
    }))
}

pub fn spawn_probe(proxy: EventLoopProxy<AppEvent>) {
    let spawned = thread::Builder::new()
        .name("capability-probe".into())
        .spawn(move || {
            _ = proxy.send_event(AppEvent::Capability(resolve_blocking()));
        });
    if let Err(e) = spawned {
        // the host stays unresolved, as with a failed probe
        log::warn!("[gate] probe thread failed to start: {e}");
    }
}
