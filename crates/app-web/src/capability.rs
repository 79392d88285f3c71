//! Page-side capability probe.

use app_core::render::probe_tier;
use app_core::{Resolution, SESSION_GATE};

/// Resolve the session capability. The WebGPU adapter is probed at most once
/// per page; later mounts get the cached answer.
pub async fn resolve() -> Resolution {
    SESSION_GATE
        .resolve(|| async {
            let instance = wgpu::Instance::default();
            probe_tier(&instance).await
        })
        .await
}
