//! Core types for the rasterizer

use super::math::Vector4;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    pub const MAGENTA: Color = Color { r: 255, g: 0, b: 255, a: 255 };
    pub const CYAN: Color = Color { r: 0, g: 255, b: 255, a: 255 };
    pub const CORNFLOWER: Color = Color { r: 100, g: 149, b: 237, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Saturating per-channel sum; the result is always opaque.
impl Add for Color {
    type Output = Color;
    fn add(self, other: Color) -> Color {
        Color::new(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
        )
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, other: Color) {
        *self = *self + other;
    }
}

/// Texture coordinate in texel units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TexCoord {
    pub u: f32,
    pub v: f32,
}

impl TexCoord {
    pub fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

/// A pipeline vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vector4,
    pub normal: Vector4,
    /// Post-lighting color
    pub color: Color,
    /// Carried through untouched
    pub lit: Color,
    pub u: f32,
    pub v: f32,
    pub uv_index: usize,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector4::point(x, y, z),
            normal: Vector4::ZERO,
            color: Color::WHITE,
            lit: Color::WHITE,
            u: 0.0,
            v: 0.0,
            uv_index: 0,
        }
    }

    pub fn with_normal(position: Vector4, normal: Vector4) -> Self {
        Self {
            position,
            normal,
            ..Self::default()
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// A triangle: static topology plus fields the pipeline rewrites every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub indices: [usize; 3],
    pub uv_indices: [usize; 3],
    pub material_color: Color,
    #[serde(skip)]
    pub backfacing: bool,
    #[serde(skip)]
    pub average_z: f32,
    #[serde(skip)]
    pub normal: Vector4,
    #[serde(skip)]
    pub lit_color: Color,
}

impl Polygon {
    pub fn new(indices: [usize; 3], uv_indices: [usize; 3]) -> Self {
        Self {
            indices,
            uv_indices,
            material_color: Color::WHITE,
            backfacing: false,
            average_z: 1.0,
            normal: Vector4::direction(0.0, 0.0, 1.0),
            lit_color: Color::WHITE,
        }
    }

    pub fn with_material(indices: [usize; 3], uv_indices: [usize; 3], material_color: Color) -> Self {
        Self {
            material_color,
            ..Self::new(indices, uv_indices)
        }
    }
}

/// How the rasterizer colors a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RasterMode {
    /// Palette texture modulated by the interpolated vertex color
    #[default]
    Textured,
    /// Interpolated vertex color only
    Solid,
}
