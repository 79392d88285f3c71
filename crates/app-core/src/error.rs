use thiserror::Error;

/// Why a capability probe could not produce a tier.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("no graphics adapter available")]
    NoAdapter,

    #[error("capability probe failed: {0}")]
    Probe(String),
}

/// Failures at the host/background boundary. None of these reach the page;
/// the bridge keeps its placeholder instead.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("background context could not be created: {0}")]
    ContextCreation(String),

    #[error("render surface transfer failed: {0}")]
    SurfaceTransfer(String),

    #[error("background context is gone")]
    Disconnected,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("malformed color: {0:?}")]
    Malformed(String),
}
