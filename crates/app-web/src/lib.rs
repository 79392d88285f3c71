#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod bridge;
mod capability;
mod constants;
mod dom;
mod fallback;
mod frame;
mod host;
mod input;
mod worker;

pub use host::HostConfig;
pub use worker::worker_main;

use host::WebHost;

thread_local! {
    // One host per container; remounting replaces (and terminates) the old one.
    static MOUNTED: RefCell<HashMap<String, Rc<WebHost>>> = RefCell::new(HashMap::new());
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    // The same module is loaded by the worker, which has no window.
    let Some(document) = web::window().and_then(|w| w.document()) else {
        return Ok(());
    };
    log::info!("app-web starting");
    if document.get_element_by_id(constants::HOST_ELEMENT_ID).is_some() {
        mount_with(HostConfig::default())?;
    }
    Ok(())
}

/// Handle returned to JS; dropping it does not unmount.
#[wasm_bindgen]
pub struct HeroHandle {
    container_id: String,
}

#[wasm_bindgen]
impl HeroHandle {
    pub fn unmount(&self) {
        let host = MOUNTED.with(|m| m.borrow_mut().remove(&self.container_id));
        if let Some(h) = host {
            h.unmount();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        MOUNTED
            .with(|m| m.borrow().get(&self.container_id).map(|h| h.state()))
            .map(|s| format!("{s:?}").to_lowercase())
            .unwrap_or_else(|| "unmounted".to_string())
    }
}

/// Mount the animation into the element with id `container_id`.
#[wasm_bindgen]
pub fn mount(container_id: &str) -> Result<HeroHandle, JsValue> {
    mount_with(HostConfig {
        container_id: container_id.to_string(),
        ..HostConfig::default()
    })
}

fn mount_with(config: HostConfig) -> Result<HeroHandle, JsValue> {
    let id = config.container_id.clone();
    let previous = MOUNTED.with(|m| m.borrow_mut().remove(&id));
    if let Some(p) = previous {
        log::info!("[host] replacing existing mount in #{}", id);
        p.unmount();
    }
    let host = WebHost::mount(config)?;
    MOUNTED.with(|m| m.borrow_mut().insert(id.clone(), host));
    Ok(HeroHandle { container_id: id })
}
