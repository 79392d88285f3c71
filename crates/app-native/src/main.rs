use std::sync::Arc;

use app_core::{
    clamp_pixel_ratio, BridgeError, BridgeView, HostSlot, HostState, HostView, PointerUpdate,
    Resolution, SurfaceHandoff, WorkerMessage, FALLBACK_IMAGE, SESSION_GATE,
};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

mod bridge;
mod capability;
mod pointer;
mod worker;

use bridge::{NativeSurface, ThreadSpawner};
use pointer::PointerTracker;

const WINDOW_TITLE: &str = "Connectors (native)";

/// Events delivered to the UI thread from background threads.
#[derive(Debug)]
pub enum AppEvent {
    Capability(Resolution),
    /// Tagged with the mount that spawned the thread.
    Worker(u64, WorkerMessage),
}

struct App {
    proxy: EventLoopProxy<AppEvent>,
    window: Option<Arc<Window>>,
    slot: HostSlot<ThreadSpawner>,
    generation: u64,
    pointer: PointerTracker,
}

impl App {
    fn new(proxy: EventLoopProxy<AppEvent>) -> Self {
        Self {
            proxy,
            window: None,
            slot: HostSlot::new(),
            generation: 0,
            pointer: PointerTracker::default(),
        }
    }

    /// Mount a fresh host. A cached capability applies immediately; otherwise
    /// the probe runs once per process on its own thread.
    fn mount(&mut self) {
        self.generation += 1;
        self.slot
            .mount(ThreadSpawner::new(self.proxy.clone(), self.generation));
        match SESSION_GATE.get() {
            Some(resolution) => self.apply_capability(resolution),
            None => capability::spawn_probe(self.proxy.clone()),
        }
    }

    fn apply_capability(&mut self, resolution: Resolution) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let Some(host) = self.slot.current_mut() else {
            return;
        };
        let state = host.on_capability(resolution, || acquire_surface(&window));
        self.sync_title();
        if state == HostState::Insufficient {
            log::info!(
                "[host] fallback {} ({}x{}): {}",
                FALLBACK_IMAGE.src,
                FALLBACK_IMAGE.width,
                FALLBACK_IMAGE.height,
                FALLBACK_IMAGE.description
            );
        }
    }

    fn sync_title(&self) {
        let (Some(window), Some(host)) = (self.window.as_ref(), self.slot.current()) else {
            return;
        };
        let suffix = match host.view() {
            HostView::Nothing => "",
            HostView::Fallback(image) => image.description,
            HostView::Animation(BridgeView::Placeholder(_)) => "loading",
            HostView::Animation(BridgeView::Live) => "live",
        };
        if suffix.is_empty() {
            window.set_title(WINDOW_TITLE);
        } else {
            window.set_title(&format!("{WINDOW_TITLE} - {suffix}"));
        }
    }

    fn forward(&mut self, update: PointerUpdate) {
        if let Some(host) = self.slot.current_mut() {
            host.forward_pointer(update);
        }
    }
}

fn acquire_surface(window: &Arc<Window>) -> Result<SurfaceHandoff<NativeSurface>, BridgeError> {
    let instance = wgpu::Instance::default();
    let surface = instance
        .create_surface(window.clone())
        .map_err(|e| BridgeError::SurfaceTransfer(e.to_string()))?;
    let size = window.inner_size();
    Ok(SurfaceHandoff {
        surface: NativeSurface { instance, surface },
        width: size.width.max(1),
        height: size.height.max(1),
        pixel_ratio: clamp_pixel_ratio(window.scale_factor()),
    })
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_transparent(true)
            .with_inner_size(LogicalSize::new(
                FALLBACK_IMAGE.width as f64,
                FALLBACK_IMAGE.height as f64,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };
        let size = window.inner_size();
        self.pointer = PointerTracker::new(size.width, size.height);
        self.window = Some(window);
        self.mount();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Capability(resolution) => self.apply_capability(resolution),
            AppEvent::Worker(generation, message) => {
                if generation != self.generation {
                    log::debug!("[host] dropping {:?} from a previous mount", message);
                    return;
                }
                if let Some(host) = self.slot.current_mut() {
                    host.on_worker_message(message);
                }
                self.sync_title();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.slot.unmount();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let update = self.pointer.resized(size.width, size.height);
                self.forward(update);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let update = self.pointer.moved(position.x, position.y);
                self.forward(update);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let update = self.pointer.clicked();
                self.forward(update);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key.as_ref() {
                Key::Character("r") | Key::Character("R") => {
                    log::info!("[host] remounting");
                    self.mount();
                }
                Key::Named(NamedKey::Escape) => {
                    self.slot.unmount();
                    event_loop.exit();
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.slot.unmount();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    let mut app = App::new(event_loop.create_proxy());
    event_loop.run_app(&mut app)?;
    Ok(())
}
