// Tests for the connector factory and the accent cycle.

use app_core::{
    materials, shuffle, shuffle_at, AccentCycle, Material, Rgb, ACCENT_PALETTE, CONNECTOR_COUNT,
    SPAWN_HALF_EXTENT,
};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn template_has_six_neutral_then_three_accent() {
    let m = materials(0);
    assert_eq!(m.len(), CONNECTOR_COUNT);
    assert!(m[..6].iter().all(|s| s.material == Material::Neutral));
    assert!(m[6..].iter().all(|s| s.material == Material::Accent(0)));
}

#[test]
fn roughness_follows_slot_order() {
    let r: Vec<f32> = materials(2).iter().map(|s| s.roughness).collect();
    assert_eq!(r, vec![0.1, 0.75, 0.75, 0.1, 0.75, 0.1, 0.1, 0.75, 0.1]);
}

#[test]
fn materials_are_pure_per_accent() {
    for n in 0..4 {
        assert_eq!(materials(n), materials(n));
    }
}

#[test]
fn neutral_entries_do_not_depend_on_accent() {
    let base = materials(0);
    for n in 1..4 {
        let other = materials(n);
        for i in 0..6 {
            assert_eq!(base[i], other[i]);
            assert_eq!(other[i].color(), Rgb::WHITE);
        }
    }
}

#[test]
fn accent_entries_use_the_palette() {
    assert_eq!(ACCENT_PALETTE[0].to_hex(), "#4060ff");
    assert_eq!(ACCENT_PALETTE[3].to_hex(), "#ffcc00");
    for n in 0..4 {
        for s in &materials(n)[6..] {
            assert_eq!(s.color(), ACCENT_PALETTE[n]);
        }
    }
    // indices wrap
    assert_eq!(materials(5), materials(1));
}

#[test]
fn shuffle_spawns_inside_the_cube() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let set = shuffle(1, &mut rng);
        assert_eq!(set.len(), CONNECTOR_COUNT);
        for c in &set {
            assert!(c.position.abs().max_element() <= SPAWN_HALF_EXTENT);
        }
        let colors: Vec<Rgb> = set.iter().map(|c| c.color()).collect();
        let expected: Vec<Rgb> = materials(1).iter().map(|m| m.color()).collect();
        assert_eq!(colors, expected);
    }
}

#[test]
fn shuffle_at_keeps_supplied_positions() {
    let mut positions = [Vec3::ZERO; CONNECTOR_COUNT];
    for (i, p) in positions.iter_mut().enumerate() {
        *p = Vec3::splat(i as f32);
    }
    let set = shuffle_at(0, &positions);
    for (c, p) in set.iter().zip(positions.iter()) {
        assert_eq!(c.position, *p);
    }
}

#[test]
fn accent_cycle_is_clicks_mod_four() {
    let mut cycle = AccentCycle::default();
    assert_eq!(cycle.index(), 0);
    for k in 1..=11 {
        let n = cycle.advance();
        assert_eq!(n, k % 4);
        assert!(n < 4);
    }
}
