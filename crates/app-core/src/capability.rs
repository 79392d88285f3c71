//! Device capability gate.
//!
//! A platform probe summarizes the graphics adapter as a [`GpuProfile`];
//! [`estimate_tier`] turns that into a [`TierReport`]. The result is resolved
//! once per session through a [`CapabilityGate`] and classified against
//! [`TIER_THRESHOLD`](crate::constants::TIER_THRESHOLD).

use crate::constants::TIER_THRESHOLD;
use crate::error::CapabilityError;
use std::future::Future;
use tokio::sync::OnceCell;

/// Graphics capability class; higher is more capable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapabilityTier(u8);

impl CapabilityTier {
    pub const fn new(tier: u8) -> Self {
        Self(tier)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn class(self) -> CapabilityClass {
        if self.0 >= TIER_THRESHOLD {
            CapabilityClass::Sufficient
        } else {
            CapabilityClass::Insufficient
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapabilityClass {
    Insufficient,
    Sufficient,
}

/// Outcome of the one-shot capability query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Resolved(CapabilityTier),
    /// The probe failed; treated like "unresolved" forever.
    Failed,
}

impl Resolution {
    pub fn tier(self) -> Option<CapabilityTier> {
        match self {
            Resolution::Resolved(t) => Some(t),
            Resolution::Failed => None,
        }
    }
}

/// What the capability query returns. Only `tier` drives decisions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierReport {
    pub tier: u8,
    pub estimated_fps: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceKind {
    Cpu,
    Integrated,
    Discrete,
    Virtual,
    Other,
}

/// Platform-neutral summary of a graphics adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GpuProfile {
    pub name: String,
    pub device_kind: DeviceKind,
    pub max_texture_dimension_2d: u32,
}

const SOFTWARE_RENDERERS: &[&str] = &["swiftshader", "llvmpipe", "softpipe", "basic render"];

/// Classify an adapter into a tier.
pub fn estimate_tier(profile: &GpuProfile) -> TierReport {
    let name = profile.name.to_ascii_lowercase();
    let software = profile.device_kind == DeviceKind::Cpu
        || SOFTWARE_RENDERERS.iter().any(|s| name.contains(s));
    let tier = if software {
        0
    } else if profile.max_texture_dimension_2d < 4096 {
        1
    } else {
        match profile.device_kind {
            DeviceKind::Integrated => 2,
            DeviceKind::Discrete => 3,
            DeviceKind::Virtual | DeviceKind::Other => {
                if profile.max_texture_dimension_2d >= 8192 {
                    2
                } else {
                    1
                }
            }
            DeviceKind::Cpu => 0,
        }
    };
    let estimated_fps = match tier {
        0 => 15.0,
        1 => 30.0,
        _ => 60.0,
    };
    TierReport {
        tier,
        estimated_fps: Some(estimated_fps),
    }
}

/// Session-scoped cache for the capability query.
///
/// Single-flight: while one `resolve` is running its query, later callers
/// wait for that result instead of starting their own.
pub struct CapabilityGate {
    cell: OnceCell<Resolution>,
}

impl CapabilityGate {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    /// The cached resolution, or `None` while unresolved.
    pub fn get(&self) -> Option<Resolution> {
        self.cell.get().copied()
    }

    /// Run `query` unless a resolution is cached or already in flight. Errors
    /// become [`Resolution::Failed`]; they are never retried.
    pub async fn resolve<F, Fut>(&self, query: F) -> Resolution
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TierReport, CapabilityError>>,
    {
        *self
            .cell
            .get_or_init(|| async move {
                match query().await {
                    Ok(report) => {
                        log::info!(
                            "[gate] tier={} fps~{:?}",
                            report.tier,
                            report.estimated_fps
                        );
                        Resolution::Resolved(CapabilityTier::new(report.tier))
                    }
                    Err(e) => {
                        log::warn!("[gate] capability unresolved: {e}");
                        Resolution::Failed
                    }
                }
            })
            .await
    }
}

impl Default for CapabilityGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Page/process-wide gate; queried once, shared by every mount.
pub static SESSION_GATE: CapabilityGate = CapabilityGate::new();
