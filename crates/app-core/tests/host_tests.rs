// Host mount and render bridge lifecycle tests against an in-process context.
//
// The fake context builds a real WorkerRuntime on rapier3d when it receives the
// surface, so the spawn counts observed here are the ones a worker would see.

use app_core::{
    BackgroundContext, BridgeError, BridgeView, CapabilityTier, ContextSpawner, HostMessage,
    HostMount, HostSlot, HostState, HostView, PhysicsBackend, PhysicsScene, PointerUpdate,
    RapierWorld, Resolution, SurfaceHandoff, WorkerMessage, WorkerRuntime, ACCENT_PALETTE,
    CONNECTOR_COUNT, FALLBACK_IMAGE,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Journal {
    spawned: usize,
    terminated: usize,
    surfaces: usize,
    terminate_messages: usize,
    body_counts: Vec<usize>,
    accents: Vec<usize>,
}

type Shared = Rc<RefCell<Journal>>;

struct FakeContext {
    journal: Shared,
    fail_transfer: bool,
    runtime: Option<WorkerRuntime<RapierWorld, StdRng>>,
}

impl BackgroundContext for FakeContext {
    type Surface = ();

    fn post(&mut self, message: HostMessage<()>) -> Result<(), BridgeError> {
        match message {
            HostMessage::Surface(handoff) => {
                if self.fail_transfer {
                    return Err(BridgeError::SurfaceTransfer("detached".into()));
                }
                self.journal.borrow_mut().surfaces += 1;
                let scene = PhysicsScene::new(RapierWorld::new(), StdRng::seed_from_u64(42));
                let rt = WorkerRuntime::new(scene, handoff.width, handoff.height);
                self.journal
                    .borrow_mut()
                    .body_counts
                    .push(rt.scene().physics().body_count());
                self.runtime = Some(rt);
            }
            HostMessage::Pointer(update) => {
                let rt = self.runtime.as_mut().ok_or(BridgeError::Disconnected)?;
                rt.apply(update);
                rt.tick(1.0 / 60.0);
                let mut j = self.journal.borrow_mut();
                j.accents.push(rt.scene().accent());
                j.body_counts.push(rt.scene().physics().body_count());
            }
            HostMessage::Terminate => {
                self.journal.borrow_mut().terminate_messages += 1;
                if let Some(rt) = self.runtime.as_mut() {
                    rt.stop();
                }
            }
        }
        Ok(())
    }

    fn terminate(&mut self) {
        self.journal.borrow_mut().terminated += 1;
        self.runtime = None;
    }
}

#[derive(Clone, Default)]
struct FakeSpawner {
    journal: Shared,
    fail_spawn: bool,
    fail_transfer: bool,
}

impl ContextSpawner for FakeSpawner {
    type Context = FakeContext;

    fn spawn(&mut self) -> Result<FakeContext, BridgeError> {
        if self.fail_spawn {
            return Err(BridgeError::ContextCreation("blocked".into()));
        }
        self.journal.borrow_mut().spawned += 1;
        Ok(FakeContext {
            journal: self.journal.clone(),
            fail_transfer: self.fail_transfer,
            runtime: None,
        })
    }
}

fn handoff() -> Result<SurfaceHandoff<()>, BridgeError> {
    Ok(SurfaceHandoff {
        surface: (),
        width: 800,
        height: 600,
        pixel_ratio: 1.0,
    })
}

fn tier(t: u8) -> Resolution {
    Resolution::Resolved(CapabilityTier::new(t))
}

fn click() -> PointerUpdate {
    PointerUpdate {
        ndc: Vec2::new(0.1, 0.2),
        clicks: 1,
        width: 800,
        height: 600,
    }
}

#[test]
fn unresolved_host_renders_nothing() {
    let host = HostMount::new(FakeSpawner::default());
    assert_eq!(host.state(), HostState::Unresolved);
    assert_eq!(host.view(), HostView::Nothing);
}

#[test]
fn low_tier_shows_fallback_without_a_worker() {
    let spawner = FakeSpawner::default();
    let journal = spawner.journal.clone();
    let mut host = HostMount::new(spawner);
    let mut acquired = false;
    let state = host.on_capability(tier(0), || {
        acquired = true;
        handoff()
    });
    assert_eq!(state, HostState::Insufficient);
    assert!(!acquired);
    match host.view() {
        HostView::Fallback(img) => {
            assert_eq!(img.src, "/images/hero.webp");
            assert_eq!((img.width, img.height), (924, 768));
            assert_eq!(img.alt, "Hero");
            assert_eq!(img, &FALLBACK_IMAGE);
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    assert!(host.bridge().is_none());
    drop(host);
    assert_eq!(journal.borrow().spawned, 0);
}

#[test]
fn every_resolved_tier_picks_exactly_one_branch() {
    for t in 0..=5u8 {
        let spawner = FakeSpawner::default();
        let journal = spawner.journal.clone();
        let mut host = HostMount::new(spawner);
        host.on_capability(tier(t), handoff);
        let fallback = matches!(host.view(), HostView::Fallback(_));
        let bridged = host.bridge().is_some();
        assert!(fallback != bridged, "tier {t}");
        assert_eq!(fallback, t <= 1);
        assert_eq!(journal.borrow().spawned, usize::from(t >= 2));
    }
}

#[test]
fn high_tier_spawns_the_scene_once() {
    let spawner = FakeSpawner::default();
    let journal = spawner.journal.clone();
    let mut host = HostMount::new(spawner);
    assert_eq!(host.on_capability(tier(3), handoff), HostState::Sufficient);
    {
        let j = journal.borrow();
        assert_eq!(j.spawned, 1);
        assert_eq!(j.surfaces, 1);
        assert_eq!(j.body_counts, vec![CONNECTOR_COUNT + 1]);
    }
    match host.view() {
        HostView::Animation(BridgeView::Placeholder(desc)) => {
            assert_eq!(desc.connectors.len(), CONNECTOR_COUNT);
            let accents: Vec<_> = desc
                .connectors
                .iter()
                .filter(|c| c.is_accent())
                .collect();
            assert_eq!(accents.len(), 3);
            assert!(accents.iter().all(|c| c.color() == ACCENT_PALETTE[0]));
        }
        other => panic!("expected placeholder, got {other:?}"),
    }
    host.on_worker_message(WorkerMessage::Ready);
    assert_eq!(host.view(), HostView::Animation(BridgeView::Live));
}

#[test]
fn repeated_resolutions_are_ignored() {
    let spawner = FakeSpawner::default();
    let journal = spawner.journal.clone();
    let mut host = HostMount::new(spawner);
    host.on_capability(tier(3), handoff);
    assert_eq!(host.on_capability(tier(0), handoff), HostState::Sufficient);
    assert_eq!(host.on_capability(tier(3), handoff), HostState::Sufficient);
    assert_eq!(journal.borrow().spawned, 1);
}

#[test]
fn failed_resolution_keeps_host_unresolved() {
    let mut host = HostMount::new(FakeSpawner::default());
    assert_eq!(host.on_capability(Resolution::Failed, handoff), HostState::Unresolved);
    assert_eq!(host.view(), HostView::Nothing);
}

#[test]
fn three_clicks_reshuffle_to_the_fourth_accent() {
    let spawner = FakeSpawner::default();
    let journal = spawner.journal.clone();
    let mut host = HostMount::new(spawner);
    host.on_capability(tier(3), handoff);
    for _ in 0..3 {
        host.forward_pointer(click());
    }
    let j = journal.borrow();
    assert_eq!(j.accents, vec![1, 2, 3]);
    assert_eq!(ACCENT_PALETTE[*j.accents.last().unwrap()].to_hex(), "#ffcc00");
    assert!(j.body_counts.iter().all(|&n| n == CONNECTOR_COUNT + 1));
}

#[test]
fn unmount_terminates_exactly_once() {
    let spawner = FakeSpawner::default();
    let journal = spawner.journal.clone();
    let mut host = HostMount::new(spawner);
    host.on_capability(tier(3), handoff);
    host.forward_pointer(click());
    host.unmount();
    host.unmount();
    drop(host);
    let j = journal.borrow();
    assert_eq!(j.terminated, 1);
    assert_eq!(j.terminate_messages, 1);
}

#[test]
fn dropping_a_mounted_host_releases_the_worker() {
    let spawner = FakeSpawner::default();
    let journal = spawner.journal.clone();
    {
        let mut host = HostMount::new(spawner);
        host.on_capability(tier(2), handoff);
    }
    assert_eq!(journal.borrow().terminated, 1);
}

#[test]
fn remount_creates_a_fresh_context() {
    let spawner = FakeSpawner::default();
    let journal = spawner.journal.clone();
    let mut slot = HostSlot::new();

    slot.mount(spawner.clone()).on_capability(tier(3), handoff);
    if let Some(m) = slot.current_mut() {
        m.forward_pointer(click());
    }
    slot.mount(spawner.clone()).on_capability(tier(3), handoff);
    {
        let j = journal.borrow();
        assert_eq!(j.spawned, 2);
        assert_eq!(j.terminated, 1);
        // second mount starts over at accent 0 with the same body count
        assert_eq!(j.body_counts.first(), j.body_counts.last());
        assert_eq!(j.body_counts.last(), Some(&(CONNECTOR_COUNT + 1)));
    }
    assert_eq!(slot.current().map(|m| m.state()), Some(HostState::Sufficient));
    slot.unmount();
    assert!(slot.current().is_none());
    assert_eq!(journal.borrow().terminated, 2);
}

#[test]
fn spawn_failure_keeps_the_placeholder() {
    let spawner = FakeSpawner {
        fail_spawn: true,
        ..FakeSpawner::default()
    };
    let mut host = HostMount::new(spawner);
    assert_eq!(host.on_capability(tier(3), handoff), HostState::Sufficient);
    let bridge = host.bridge().unwrap();
    assert!(!bridge.is_running());
    host.on_worker_message(WorkerMessage::Ready);
    host.forward_pointer(click());
    assert!(matches!(
        host.view(),
        HostView::Animation(BridgeView::Placeholder(_))
    ));
}

#[test]
fn transfer_failure_terminates_and_keeps_the_placeholder() {
    let spawner = FakeSpawner {
        fail_transfer: true,
        ..FakeSpawner::default()
    };
    let journal = spawner.journal.clone();
    let mut host = HostMount::new(spawner);
    host.on_capability(tier(3), handoff);
    assert!(!host.bridge().unwrap().is_running());
    host.unmount();
    let j = journal.borrow();
    assert_eq!(j.spawned, 1);
    assert_eq!(j.terminated, 1);
    assert_eq!(j.terminate_messages, 0);
}

#[test]
fn missing_surface_degrades_without_spawning() {
    let spawner = FakeSpawner::default();
    let journal = spawner.journal.clone();
    let mut host = HostMount::new(spawner);
    host.on_capability(tier(3), || {
        Err(BridgeError::SurfaceTransfer("no canvas".into()))
    });
    assert!(matches!(
        host.view(),
        HostView::Animation(BridgeView::Placeholder(_))
    ));
    assert_eq!(journal.borrow().spawned, 0);
}
