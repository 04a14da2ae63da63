//! Light sources and the two lighting models
//!
//! Gouraud (per-vertex) is the primary model: it writes a color into every
//! vertex of each front-facing face and the rasterizer interpolates it. The
//! flat model writes one color per face instead.

use super::state::PipelineState;
use crate::rasterizer::{Color, Vector4};
use serde::{Deserialize, Serialize};

/// `constant + linear * d + quadratic * d^2`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self { constant, linear, quadratic }
    }

    pub fn at(&self, distance: f32) -> f32 {
        self.constant + self.linear * distance + self.quadratic * distance * distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Light {
    /// Flat contribution, independent of geometry
    Ambient { color: Color },
    /// Parallel light travelling along `direction`
    Directional { color: Color, direction: Vector4 },
    Point {
        color: Color,
        position: Vector4,
        attenuation: Attenuation,
    },
}

impl Light {
    pub fn ambient(r: u8, g: u8, b: u8) -> Self {
        Light::Ambient { color: Color::new(r, g, b) }
    }

    pub fn directional(color: Color, direction: Vector4) -> Self {
        Light::Directional { color, direction }
    }

    pub fn point(color: Color, position: Vector4, attenuation: Attenuation) -> Self {
        Light::Point { color, position, attenuation }
    }

    /// Color this light adds to a surface point with the given material.
    pub fn intensity(&self, material: Color, position: Vector4, normal: Vector4) -> Color {
        match *self {
            Light::Ambient { color } => Color::new(
                (material.r as u32 * color.r as u32 / 256) as u8,
                (material.g as u32 * color.g as u32 / 256) as u8,
                (material.b as u32 * color.b as u32 / 256) as u8,
            ),
            Light::Directional { color, direction } => {
                let dp = direction.normalized().dot(normal);
                if dp <= 0.0 {
                    return Color::BLACK;
                }
                let ch = |m: u8, l: u8| scaled(m as f32 * l as f32 * dp / 256.0);
                Color::new(
                    ch(material.r, color.r),
                    ch(material.g, color.g),
                    ch(material.b, color.b),
                )
            }
            Light::Point { color, position: light_pos, attenuation } => {
                let mut to_vertex = position - light_pos;
                let distance = to_vertex.len();
                to_vertex.normalize();

                let atten = attenuation.at(distance);
                let dp = normal.dot(-to_vertex);
                if dp <= 0.0 || !(atten > 0.0) {
                    return Color::BLACK;
                }
                let ch = |m: u8, l: u8| scaled(m as f32 * l as f32 * dp / atten);
                Color::new(
                    ch(material.r, color.r),
                    ch(material.g, color.g),
                    ch(material.b, color.b),
                )
            }
        }
    }
}

/// Floor and clamp into a channel
fn scaled(v: f32) -> u8 {
    v.floor().clamp(0.0, 255.0) as u8
}

/// Sum every light's contribution with saturation
pub fn accumulate(lights: &[Light], material: Color, position: Vector4, normal: Vector4) -> Color {
    lights
        .iter()
        .fold(Color::BLACK, |acc, light| acc + light.intensity(material, position, normal))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightingModel {
    /// One color per face, evaluated against the face normal
    Flat,
    /// One color per vertex, evaluated against the vertex normal
    #[default]
    Gouraud,
}

impl LightingModel {
    pub fn apply(self, state: &mut PipelineState, lights: &[Light]) {
        match self {
            LightingModel::Flat => light_flat(state, lights),
            LightingModel::Gouraud => light_gouraud(state, lights),
        }
    }
}

/// Per-vertex lighting for every front-facing face
pub fn light_gouraud(state: &mut PipelineState, lights: &[Light]) {
    for face in state.faces.iter().filter(|f| !f.backfacing) {
        for &idx in &face.indices {
            let vert = &mut state.transformed[idx];
            vert.color = accumulate(lights, face.material_color, vert.position, vert.normal);
        }
    }
}

/// Per-face lighting into `lit_color`. Ambient colors are summed as they
/// are, without the material; the other lights are evaluated at the face
/// centroid against the face normal.
pub fn light_flat(state: &mut PipelineState, lights: &[Light]) {
    let verts = &state.transformed;
    for face in state.faces.iter_mut().filter(|f| !f.backfacing) {
        let [a, b, c] = face.indices.map(|i| verts[i].position);
        let centroid = (a + b + c) / 3.0;
        face.lit_color = lights.iter().fold(Color::BLACK, |acc, light| match *light {
            Light::Ambient { color } => acc + color,
            _ => acc + light.intensity(face.material_color, centroid, face.normal),
        });
    }
}
