//! Entity factory: the fixed nine-slot connector template and the accent
//! cycle that recolors it.

use crate::color::Rgb;
use crate::constants::{
    ACCENT_PALETTE, CONNECTOR_COUNT, NEUTRAL_COLOR, PALETTE_SIZE, SPAWN_HALF_EXTENT,
};
use glam::Vec3;
use rand::Rng;
use smallvec::SmallVec;

/// Material assignment of a connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Material {
    Neutral,
    /// Palette index of the accent color.
    Accent(usize),
}

impl Material {
    pub fn color(self) -> Rgb {
        match self {
            Material::Neutral => NEUTRAL_COLOR,
            Material::Accent(i) => ACCENT_PALETTE[i % PALETTE_SIZE],
        }
    }

    pub fn is_accent(self) -> bool {
        matches!(self, Material::Accent(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialSpec {
    pub material: Material,
    pub roughness: f32,
}

impl MaterialSpec {
    pub fn color(&self) -> Rgb {
        self.material.color()
    }
}

/// Factory output for one connector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorSpec {
    pub position: Vec3,
    pub material: Material,
    pub roughness: f32,
}

impl ConnectorSpec {
    pub fn color(&self) -> Rgb {
        self.material.color()
    }

    pub fn is_accent(&self) -> bool {
        self.material.is_accent()
    }
}

pub type ConnectorSet = SmallVec<[ConnectorSpec; CONNECTOR_COUNT]>;

struct Slot {
    accent: bool,
    roughness: f32,
}

const TEMPLATE: [Slot; CONNECTOR_COUNT] = [
    Slot { accent: false, roughness: 0.1 },
    Slot { accent: false, roughness: 0.75 },
    Slot { accent: false, roughness: 0.75 },
    Slot { accent: false, roughness: 0.1 },
    Slot { accent: false, roughness: 0.75 },
    Slot { accent: false, roughness: 0.1 },
    Slot { accent: true, roughness: 0.1 },
    Slot { accent: true, roughness: 0.75 },
    Slot { accent: true, roughness: 0.1 },
];

/// Deterministic material assignment for an accent index.
pub fn materials(accent: usize) -> [MaterialSpec; CONNECTOR_COUNT] {
    let accent = accent % PALETTE_SIZE;
    TEMPLATE.map(|slot| MaterialSpec {
        material: if slot.accent {
            Material::Accent(accent)
        } else {
            Material::Neutral
        },
        roughness: slot.roughness,
    })
}

/// Materials for `accent` with a fresh random spawn point per connector.
pub fn shuffle<R: Rng + ?Sized>(accent: usize, rng: &mut R) -> ConnectorSet {
    materials(accent)
        .into_iter()
        .map(|m| ConnectorSpec {
            position: random_spawn(rng),
            material: m.material,
            roughness: m.roughness,
        })
        .collect()
}

/// Materials for `accent` placed at caller-supplied positions.
pub fn shuffle_at(accent: usize, positions: &[Vec3; CONNECTOR_COUNT]) -> ConnectorSet {
    materials(accent)
        .into_iter()
        .zip(positions.iter())
        .map(|(m, p)| ConnectorSpec {
            position: *p,
            material: m.material,
            roughness: m.roughness,
        })
        .collect()
}

fn random_spawn<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let h = SPAWN_HALF_EXTENT;
    Vec3::new(
        rng.gen_range(-h..=h),
        rng.gen_range(-h..=h),
        rng.gen_range(-h..=h),
    )
}

/// Rotating palette index advanced by clicks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccentCycle {
    n: usize,
}

impl AccentCycle {
    pub fn index(self) -> usize {
        self.n
    }

    pub fn advance(&mut self) -> usize {
        self.n = (self.n + 1) % PALETTE_SIZE;
        self.n
    }
}
