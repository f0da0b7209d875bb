//! Static per-kind colors and directional face shading for vertex-color meshes.

use crate::face::Face;
use crate::kind::BlockKind;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const CLEAR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Multiplies the color channels, leaving alpha untouched.
    #[inline]
    pub fn scaled(self, k: f32) -> Self {
        Self {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
            a: self.a,
        }
    }

    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        #[inline]
        fn q(c: f32) -> u8 {
            (c.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

const JITTER_AMPLITUDE: f32 = 0.04;

const BASE_COLORS: [Color; BlockKind::COUNT] = [
    Color::CLEAR,                 // air
    Color::rgb(0.40, 0.75, 0.25), // grass
    Color::rgb(0.50, 0.36, 0.22), // dirt
    Color::rgb(0.52, 0.52, 0.55), // stone
    Color::rgb(0.92, 0.87, 0.58), // sand
    Color::rgb(0.95, 0.97, 1.00), // snow
    Color::rgb(0.25, 0.55, 0.90), // water
    Color::rgb(0.48, 0.32, 0.15), // wood
    Color::rgb(0.20, 0.60, 0.18), // leaves
];

#[inline]
pub fn base_color(kind: BlockKind) -> Color {
    BASE_COLORS[kind.id() as usize]
}

/// Stable positional hash mapped to a channel offset in `[-0.02, 0.02]`.
/// Arithmetic is wrapping `i32` with sign-propagating shifts.
#[inline]
pub fn position_jitter(x: i32, y: i32, z: i32) -> f32 {
    let mut h = x
        .wrapping_mul(374_761_393)
        .wrapping_add(y.wrapping_mul(668_265_263))
        .wrapping_add(z.wrapping_mul(1_274_126_177));
    h = (h ^ (h >> 13)).wrapping_mul(1_103_515_245);
    h ^= h >> 16;
    ((h & 0xFF) as f32 / 255.0 - 0.5) * JITTER_AMPLITUDE
}

/// Base color of `kind` with a small deterministic per-position variation.
pub fn color_for(kind: BlockKind, wx: i32, wy: i32, wz: i32) -> Color {
    if kind.is_air() {
        return Color::CLEAR;
    }
    let base = base_color(kind);
    let j = position_jitter(wx, wy, wz);
    Color::rgb(
        (base.r + j).clamp(0.0, 1.0),
        (base.g + j).clamp(0.0, 1.0),
        (base.b + j).clamp(0.0, 1.0),
    )
}

/// Fixed directional brightness: top brightest, bottom darkest, sides split by pair.
#[inline]
pub fn face_shade(face: Face) -> f32 {
    match face {
        Face::PosY => 1.00,
        Face::NegY => 0.75,
        Face::PosX | Face::NegZ => 0.90,
        Face::NegX | Face::PosZ => 0.85,
    }
}

pub fn face_color(kind: BlockKind, face: Face, wx: i32, wy: i32, wz: i32) -> Color {
    let c = color_for(kind, wx, wy, wz);
    Color::rgb(c.r, c.g, c.b).scaled(face_shade(face))
}
