//! Color values for connector materials.
//!
//! Palette entries are authored as sRGB hex values; lighting happens in linear
//! space, so [`Rgb::to_linear`] is applied before anything reaches the GPU.

use crate::error::ColorError;

/// An sRGB color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::css("white");

    /// Build a color from a packed `0xRRGGBB` value.
    pub const fn hex(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xff) as f32 / 255.0,
            g: ((packed >> 8) & 0xff) as f32 / 255.0,
            b: (packed & 0xff) as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb`, `rrggbb` or the named neutral `white`.
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        let s = s.trim();
        decode(s.as_bytes())
            .map(Self::hex)
            .ok_or_else(|| ColorError::Malformed(s.to_string()))
    }

    /// Compile-time form of [`Rgb::parse`] for palette constants. A malformed
    /// literal fails const evaluation.
    pub(crate) const fn css(s: &str) -> Self {
        match decode(s.as_bytes()) {
            Some(packed) => Self::hex(packed),
            None => panic!("malformed color literal"),
        }
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", q(self.r), q(self.g), q(self.b))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Convert from sRGB encoding to linear light.
    pub fn to_linear(self) -> Self {
        Self {
            r: srgb_to_linear(self.r),
            g: srgb_to_linear(self.g),
            b: srgb_to_linear(self.b),
        }
    }
}

/// Packed `0xRRGGBB` for `#rrggbb`, `rrggbb` or `white` (any case).
const fn decode(s: &[u8]) -> Option<u32> {
    if s.len() == 5 {
        let white = b"white";
        let mut i = 0;
        while i < 5 && s[i].to_ascii_lowercase() == white[i] {
            i += 1;
        }
        if i == 5 {
            return Some(0xffffff);
        }
    }
    let start = if !s.is_empty() && s[0] == b'#' { 1 } else { 0 };
    if s.len() - start != 6 {
        return None;
    }
    let mut packed = 0u32;
    let mut i = start;
    while i < s.len() {
        let digit = match s[i] {
            b'0'..=b'9' => s[i] - b'0',
            b'a'..=b'f' => s[i] - b'a' + 10,
            b'A'..=b'F' => s[i] - b'A' + 10,
            _ => return None,
        };
        packed = (packed << 4) | digit as u32;
        i += 1;
    }
    Some(packed)
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Displayed color that eases toward a target with a critically damped
/// spring, so accent changes blend instead of snapping.
#[derive(Clone, Copy, Debug)]
pub struct DampedColor {
    current: Rgb,
    velocity: [f32; 3],
}

impl DampedColor {
    pub fn new(initial: Rgb) -> Self {
        Self {
            current: initial,
            velocity: [0.0; 3],
        }
    }

    pub fn current(&self) -> Rgb {
        self.current
    }

    /// Advance toward `target`. `smooth_time` is roughly the time to reach it.
    pub fn step(&mut self, target: Rgb, smooth_time: f32, dt: f32) {
        self.current.r = damp(self.current.r, target.r, &mut self.velocity[0], smooth_time, dt);
        self.current.g = damp(self.current.g, target.g, &mut self.velocity[1], smooth_time, dt);
        self.current.b = damp(self.current.b, target.b, &mut self.velocity[2], smooth_time, dt);
    }
}

const DAMP_EPSILON: f32 = 0.001;

/// Smooth-damp a scalar toward `target`, overshoot clamped.
pub fn damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if (current - target).abs() <= DAMP_EPSILON {
        *velocity = 0.0;
        return target;
    }
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;
    // never pass the target
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}
