// Tests for the physics scene and the background runtime, driven on rapier3d.

use app_core::scene::{clamp_delta, restoring_impulse};
use app_core::{
    BodyDesc, BodyKind, Camera, FrameInput, Material, PhysicsBackend, PhysicsScene, PointerUpdate,
    RapierWorld, Rgb, WorkerRuntime, ACCENT_PALETTE, CONNECTOR_COUNT, MESH_RADIUS,
};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn scene(seed: u64) -> PhysicsScene<RapierWorld, StdRng> {
    PhysicsScene::new(RapierWorld::new(), StdRng::seed_from_u64(seed))
}

fn input(delta: f32, ndc: Vec2) -> FrameInput {
    FrameInput {
        delta,
        pointer_ndc: ndc,
        viewport: Camera::hero(1.0).viewport(),
    }
}

fn mean_distance(s: &PhysicsScene<RapierWorld, StdRng>) -> f32 {
    let total: f32 = s
        .connectors()
        .iter()
        .filter_map(|c| s.physics().translation(c.body))
        .map(Vec3::length)
        .sum();
    total / s.connectors().len() as f32
}

#[test]
fn initial_scene_has_nine_connectors_and_a_pointer() {
    let s = scene(1);
    assert_eq!(s.connectors().len(), CONNECTOR_COUNT);
    assert_eq!(s.physics().body_count(), CONNECTOR_COUNT + 1);
    assert_eq!(s.physics().gravity(), Vec3::ZERO);
    assert_eq!(s.accent(), 0);

    let neutral = s
        .connectors()
        .iter()
        .filter(|c| c.spec.material == Material::Neutral)
        .count();
    assert_eq!(neutral, 6);
    for c in s.connectors().iter().filter(|c| c.spec.is_accent()) {
        assert_eq!(c.spec.color().to_hex(), "#4060ff");
    }
    assert_eq!(
        s.physics().kind(s.pointer().body),
        Some(BodyKind::KinematicPosition)
    );
    for c in s.connectors() {
        assert_eq!(s.physics().kind(c.body), Some(BodyKind::Dynamic));
    }
}

#[test]
fn restoring_impulse_points_at_origin_with_scaled_magnitude() {
    let p = Vec3::new(3.0, -4.0, 0.0);
    let j = restoring_impulse(p);
    assert!((j.length() - 0.08 * 5.0).abs() < 1e-6);
    assert!((j.normalize() + p.normalize()).length() < 1e-6);
    assert_eq!(restoring_impulse(Vec3::ZERO), Vec3::ZERO);
}

#[test]
fn restoring_impulse_sets_velocity_toward_origin() {
    let mut world = RapierWorld::new();
    let p = Vec3::new(2.0, 1.0, -2.0);
    let body = world.spawn(&BodyDesc::connector(p));
    assert_eq!(world.linvel(body), Some(Vec3::ZERO));

    world.apply_impulse(body, restoring_impulse(p));
    world.step(1.0 / 60.0);
    let v = world.linvel(body).unwrap();
    assert!(v.length() > 0.0);
    assert!(v.normalize().dot(-p.normalize()) > 0.999);
    assert!((world.translation(body).unwrap()).length() < p.length());
}

#[test]
fn frame_delta_is_clamped() {
    assert_eq!(clamp_delta(0.016), 0.016);
    assert_eq!(clamp_delta(5.0), 0.1);
    assert_eq!(clamp_delta(-1.0), 0.0);
    assert_eq!(clamp_delta(f32::NAN), 0.0);
}

#[test]
fn zero_delta_leaves_bodies_in_place() {
    let mut s = scene(2);
    let before: Vec<Vec3> = s.connectors().iter().map(|c| c.spec.position).collect();
    s.tick(&input(0.0, Vec2::ZERO));
    for (c, p) in s.connectors().iter().zip(before) {
        let now = s.physics().translation(c.body).unwrap();
        assert!((now - p).length() < 1e-5);
    }
}

#[test]
fn connectors_gather_toward_the_origin() {
    let mut s = scene(3);
    let start = mean_distance(&s);
    for _ in 0..300 {
        s.tick(&input(1.0 / 60.0, Vec2::new(0.9, 0.9)));
    }
    assert!(mean_distance(&s) < start);
}

#[test]
fn pointer_proxy_follows_projected_pointer() {
    let mut s = scene(4);
    let viewport = Camera::hero(1.0).viewport();
    s.tick(&input(1.0 / 60.0, Vec2::new(1.0, -1.0)));
    let p = s.physics().translation(s.pointer().body).unwrap();
    let expected = Vec3::new(viewport.width / 2.0, -viewport.height / 2.0, 0.0);
    assert!((p - expected).length() < 1e-4, "{p:?} vs {expected:?}");
}

#[test]
fn frame_reports_spheres_and_accent_lights() {
    let mut s = scene(5);
    let frame = s.tick(&input(1.0 / 60.0, Vec2::ZERO));
    assert_eq!(frame.clear_color, [0.0, 0.0, 0.0, 0.0]);
    assert_eq!(frame.spheres.len(), CONNECTOR_COUNT);
    assert!(frame.spheres.iter().all(|sp| sp.radius == MESH_RADIUS));
    assert_eq!(frame.point_lights.len(), 3);
    let accent = ACCENT_PALETTE[0].to_linear().to_array();
    assert!(frame
        .point_lights
        .iter()
        .all(|l| l.color == accent && l.intensity == 4.0 && l.distance == 2.5));
}

#[test]
fn advancing_the_accent_replaces_the_whole_set() {
    let mut s = scene(6);
    let old: Vec<_> = s.connectors().iter().map(|c| c.body).collect();
    s.advance_accent();
    assert_eq!(s.accent(), 1);
    assert_eq!(s.generation(), 2);
    assert_eq!(s.connectors().len(), CONNECTOR_COUNT);
    assert_eq!(s.physics().body_count(), CONNECTOR_COUNT + 1);
    for c in s.connectors() {
        assert!(!old.contains(&c.body));
    }
    for h in old {
        assert_eq!(s.physics().translation(h), None);
    }
}

#[test]
fn displayed_colors_ease_from_the_previous_set() {
    let mut s = scene(7);
    for _ in 0..100 {
        s.tick(&input(0.1, Vec2::ZERO));
    }
    let accent_slot = CONNECTOR_COUNT - 1;
    assert_eq!(s.connectors()[accent_slot].displayed.current(), ACCENT_PALETTE[0]);

    s.advance_accent();
    // the new body starts from the old displayed color
    assert_eq!(s.connectors()[accent_slot].displayed.current(), ACCENT_PALETTE[0]);
    s.tick(&input(0.016, Vec2::ZERO));
    let mid = s.connectors()[accent_slot].displayed.current();
    assert_ne!(mid, ACCENT_PALETTE[0]);
    assert_ne!(mid, ACCENT_PALETTE[1]);
    for _ in 0..100 {
        s.tick(&input(0.1, Vec2::ZERO));
    }
    assert_eq!(s.connectors()[accent_slot].displayed.current(), ACCENT_PALETTE[1]);
    assert_eq!(s.connectors()[0].displayed.current(), Rgb::WHITE);
}

#[test]
fn runtime_applies_clicks_on_the_next_tick() {
    let mut rt = WorkerRuntime::new(scene(8), 800, 600);
    rt.apply(PointerUpdate {
        ndc: Vec2::ZERO,
        clicks: 3,
        width: 800,
        height: 600,
    });
    assert_eq!(rt.scene().accent(), 0);
    assert!(rt.tick(1.0 / 60.0).is_some());
    assert_eq!(rt.scene().accent(), 3);
    let targets = rt.scene().target_colors();
    assert_eq!(targets.len(), CONNECTOR_COUNT);
    assert!(targets[6..].iter().all(|c| c.to_hex() == "#ffcc00"));
    assert_eq!(rt.scene().physics().body_count(), CONNECTOR_COUNT + 1);

    rt.apply(PointerUpdate {
        clicks: 2,
        ..PointerUpdate::default()
    });
    rt.tick(1.0 / 60.0);
    assert_eq!(rt.scene().accent(), 1);
}

#[test]
fn runtime_tracks_surface_size() {
    let mut rt = WorkerRuntime::new(scene(9), 100, 100);
    assert!((rt.camera().aspect - 1.0).abs() < 1e-6);
    rt.apply(PointerUpdate {
        ndc: Vec2::ZERO,
        clicks: 0,
        width: 800,
        height: 400,
    });
    assert_eq!(rt.size(), (800, 400));
    assert!((rt.camera().aspect - 2.0).abs() < 1e-6);
    // zero sizes are ignored
    rt.apply(PointerUpdate::default());
    assert_eq!(rt.size(), (800, 400));
}

#[test]
fn stopped_runtime_never_ticks() {
    let mut rt = WorkerRuntime::new(scene(10), 640, 480);
    rt.stop();
    assert!(rt.is_stopped());
    rt.apply(PointerUpdate {
        clicks: 1,
        ..PointerUpdate::default()
    });
    assert!(rt.tick(0.016).is_none());
    assert_eq!(rt.scene().accent(), 0);
}

#[test]
fn hero_viewport_matches_camera_frustum() {
    let v = Camera::hero(2.0).viewport();
    let expected_h = 2.0 * (17.5f32.to_radians() / 2.0).tan() * 15.0;
    assert!((v.height - expected_h).abs() < 1e-4);
    assert!((v.width - expected_h * 2.0).abs() < 1e-4);
    assert_eq!(v.project(Vec2::ZERO), Vec3::ZERO);
}
