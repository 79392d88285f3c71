// DOM wiring and worker bootstrap settings for the browser host

// Element that receives the animation when the module auto-mounts
pub const HOST_ELEMENT_ID: &str = "hero";

// Module worker shim; it loads the wasm package and calls `worker_main`
pub const WORKER_SCRIPT_URL: &str = "./worker.js";

// Attribute on the host element mirroring the bridge view
pub const SCENE_ATTR: &str = "data-scene";
pub const SCENE_PLACEHOLDER: &str = "placeholder";
pub const SCENE_LIVE: &str = "live";

// Classes applied to generated nodes
pub const CANVAS_CLASS: &str = "hero-canvas";
pub const FALLBACK_CLASS: &str = "hero-fallback";
pub const SR_ONLY_CLASS: &str = "sr-only";

// Message field names shared with the worker
pub const FIELD_KIND: &str = "kind";
pub const FIELD_CANVAS: &str = "canvas";
pub const FIELD_WIDTH: &str = "width";
pub const FIELD_HEIGHT: &str = "height";
pub const FIELD_DPR: &str = "dpr";
pub const FIELD_DATA: &str = "data";
